//! A compact symbolic algebra engine over exact rational numbers.
//!
//! Expressions are converted from the parser's AST into [`SymExpr`], a flattened sum-of-products
//! representation that is kept in a canonical form by the constructors in [`simplify`]. On top of
//! that form sit univariate polynomials ([`poly`]) and the operations the rest of the system
//! needs: [`derivative`], [`integrate`], [`factor`] and [`solve`].

pub mod derivative;
pub mod error;
pub mod expr;
pub mod factor;
pub mod integrate;
pub mod poly;
pub mod simplify;
pub mod solve;

pub use derivative::derivative;
pub use expr::{Primary, SymExpr};
pub use factor::factor;
pub use integrate::integrate;
pub use simplify::simplify;
pub use solve::solve;
