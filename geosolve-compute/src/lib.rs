//! Evaluation back ends for parsed expressions.
//!
//! - [`numerical`] evaluates an expression to a float, or element-wise over a vector of floats,
//! in a fixed namespace of functions and constants. Nothing outside the namespace is reachable.
//! - [`symbolic`] holds a compact algebra engine over exact rationals: simplification,
//! differentiation, integration, factoring and polynomial equation solving.
//! - [`engine`] defines the [`AlgebraEngine`](engine::AlgebraEngine) interface callers program
//! against, with [`SymbolicEngine`](engine::SymbolicEngine) as the built-in implementation.

pub mod engine;
pub mod fmt;
pub mod numerical;
pub mod symbolic;
