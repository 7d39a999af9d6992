//! The query pipeline: free-text math in, structured results with step-by-step explanations out.
//!
//! A query flows through these stages:
//!
//! 1. [`intent::classify`] picks the operation the user wants from keywords in the raw text, and
//! strips the keyword to leave the residual expression.
//! 2. [`normalize::normalize`] rewrites the residual into the strict grammar of the algebra parser
//! (`^` to `**`, angle literals, function-call parentheses, implicit multiplication).
//! 3. [`handler::Solver`] runs the matching operation on an
//! [`AlgebraEngine`](geosolve_compute::engine::AlgebraEngine), or answers trigonometric constants
//! like `sin45` directly with [`trig`].
//! 4. The outcome is a [`SolutionResult`] with an ordered list of explanation steps.
//!
//! [`plot`] is a separate entry point that evaluates an expression over a range of samples for
//! graphing, and [`geometry`] measures triangles and circles.

pub mod error;
pub mod geometry;
pub mod handler;
pub mod intent;
pub mod normalize;
pub mod plot;
pub mod solution;
pub mod trig;

pub use error::{Error, ErrorResponse};
pub use geometry::{evaluate_geometry, GeometryError, GeometryResult};
pub use handler::{Solver, SolverOptions};
pub use intent::{classify, Classification, Intent};
pub use normalize::{normalize, normalize_for_plot, NormalizedExpression};
pub use plot::{evaluate_for_plot, PlotOptions, PlotResult, Samples};
pub use solution::{Solution, SolutionResult};
pub use trig::{evaluate_trig_constant, TrigFunction};
