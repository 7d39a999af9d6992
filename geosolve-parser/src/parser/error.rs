//! Error kinds produced while parsing.

use ariadne::Fmt;
use geosolve_attrs::ErrorKind;
use geosolve_error::EXPR;
use super::MAX_OPERATORS;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of input",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// A token that cannot begin an operand was found where an operand was expected.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unexpected token `{}`", found),
    labels = ["this token"],
    help = "expected a number, a name, or a parenthesized expression",
)]
pub struct UnexpectedToken {
    /// The lexeme that was found.
    pub found: String,
}

/// `^` was used for exponentiation in the strict grammar.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "`^` is not the exponentiation operator",
    labels = ["this operator"],
    help = format!("write exponents with {}, as in {}", "**".fg(EXPR), "x**2".fg(EXPR)),
)]
pub struct CaretExponent;

/// A function call has an empty argument between commas.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing function argument",
    labels = ["an argument is missing here"],
)]
pub struct MissingArgument;

/// A parenthesis was opened but something other than `)` followed its contents.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing closing parenthesis",
    labels = ["I expected to see `)` here"],
)]
pub struct UnclosedParenthesis;

/// The expression nests parentheses or operators deeper than the parser allows.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expression is too deeply nested",
    labels = ["the nesting limit is reached here"],
    help = "split the expression into smaller parts",
)]
pub struct TooDeeplyNested;

/// The expression has more binary operators than the parser allows.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expression is too long",
    labels = ["the operator limit is reached here"],
    help = format!("an expression may contain at most {} operators", MAX_OPERATORS),
)]
pub struct TooManyOperators;
