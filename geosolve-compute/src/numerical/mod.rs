//! Sandboxed numeric evaluation of parsed expressions.
//!
//! Evaluation happens in a [`Namespace`]: a fixed table of builtin functions plus a set of named
//! values. Values are either scalars or vectors of samples; every operation broadcasts scalars
//! against vectors and works element-wise. A NaN or infinite result computed from finite inputs,
//! and any division by zero, is reported as an error rather than propagated.

pub mod builtins;
pub mod error;
pub mod eval;
pub mod namespace;
pub mod trig_mode;
pub mod value;

pub use eval::Eval;
pub use namespace::Namespace;
pub use trig_mode::TrigMode;
pub use value::Value;
