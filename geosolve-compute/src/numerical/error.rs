//! Error kinds produced during numeric evaluation.

use ariadne::Fmt;
use geosolve_attrs::ErrorKind;
use geosolve_error::EXPR;

/// The variable is undefined.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("name `{}` is not defined", self.name),
    labels = ["this name"],
    help = format!("only {} and {} are available as constants", "pi".fg(EXPR), "e".fg(EXPR)),
)]
pub struct UndefinedVariable {
    /// The name of the variable that was undefined.
    pub name: String,
}

/// The function is undefined.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` function does not exist", self.name),
    labels = ["this function"],
    help = if self.suggestions.is_empty() {
        "available functions: sin, cos, tan, asin, acos, atan, sinh, cosh, tanh, sqrt, log, exp, abs".to_string()
    } else if self.suggestions.len() == 1 {
        format!("did you mean the `{}` function?", (&*self.suggestions[0]).fg(EXPR))
    } else {
        format!(
            "did you mean one of these functions? {}",
            self.suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
)]
pub struct UndefinedFunction {
    /// The name of the function that was undefined.
    pub name: String,

    /// A list of similarly named functions, if any.
    pub suggestions: Vec<String>,
}

/// A function was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` function takes {} argument(s), but {} were given", self.name, self.expected, self.given),
    labels = ["this function call", ""],
)]
pub struct WrongArgumentCount {
    /// The name of the function that was called.
    pub name: String,

    /// A description of the accepted number of arguments, such as `1` or `1 or 2`.
    pub expected: String,

    /// The number of arguments that were given.
    pub given: usize,
}

/// The result of an operation is not a finite real number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "math domain error",
    labels = ["this operation has no finite real result"],
    help = format!("the failing input was {}", self.input),
)]
pub struct MathDomain {
    /// The input at which the operation failed, formatted for display.
    pub input: String,
}

/// Division by zero.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "division by zero",
    labels = ["this division"],
)]
pub struct DivisionByZero;

/// A numeric literal could not be read as a number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid number `{}`", self.literal),
    labels = ["this number"],
)]
pub struct InvalidNumber {
    /// The literal as written.
    pub literal: String,
}
