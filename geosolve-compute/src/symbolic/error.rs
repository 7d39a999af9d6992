//! Error kinds produced by symbolic operations.

use ariadne::Fmt;
use geosolve_attrs::ErrorKind;
use geosolve_error::EXPR;

/// The equation is outside the class of equations that can be solved.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot solve this equation: {}", self.reason),
    labels = [""],
    help = format!("only polynomial equations in {} can be solved", (&self.variable).fg(EXPR)),
)]
pub struct UnsupportedEquation {
    /// The variable that was solved for.
    pub variable: String,

    /// Why the equation could not be solved.
    pub reason: String,
}

/// No antiderivative could be found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot find an antiderivative of {} with respect to {}", self.expr, self.variable),
    labels = [""],
)]
pub struct CannotIntegrate {
    /// The integrand, formatted.
    pub expr: String,

    /// The variable of integration.
    pub variable: String,
}

/// The derivative of a function is not known.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot differentiate the unknown function `{}`", self.name),
    labels = [""],
)]
pub struct CannotDifferentiate {
    /// The name of the function.
    pub name: String,
}

/// The expression divides by zero, or raises zero to a negative power.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "division by zero",
    labels = ["this divisor is zero"],
)]
pub struct DivisionByZero;
