use geosolve_error::Error as SourceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::{geometry::GeometryError, intent::Intent};

/// An error produced while answering a query or evaluating a plot.
#[derive(Debug)]
pub enum Error {
    /// The query was empty or only whitespace.
    EmptyQuery,

    /// The expression to plot was empty or only whitespace.
    EmptyExpression,

    /// The operation selected for a query failed.
    Operation {
        /// The operation that failed.
        intent: Intent,

        /// The normalized input the operation was given. The spans of `error` point into it.
        input: String,

        /// What went wrong.
        error: SourceError,
    },

    /// The expression to plot could not be parsed or evaluated.
    Plot {
        /// The normalized expression. The spans of `error` point into it.
        input: String,

        /// What went wrong.
        error: SourceError,
    },

    /// A geometry command was malformed or described an impossible shape.
    Geometry(GeometryError),
}

impl Error {
    /// The prefix placed before the underlying error message.
    fn prefix(&self) -> &'static str {
        match self {
            Self::Operation { intent: Intent::Solve, .. } => "Error solving equation: ",
            Self::Operation { intent: Intent::Integrate, .. } => "Error integrating: ",
            Self::Operation { intent: Intent::Differentiate, .. } => "Error differentiating: ",
            Self::Operation { intent: Intent::Factor, .. } => "Error factoring: ",
            Self::Operation { .. } => "Could not parse expression: ",
            Self::Plot { .. } => "Invalid expression: ",
            Self::EmptyQuery | Self::EmptyExpression | Self::Geometry(_) => "",
        }
    }

    /// The message reported to the caller.
    pub fn message(&self) -> String {
        match self {
            Self::EmptyQuery => "No query provided".to_string(),
            Self::EmptyExpression => "Please enter a mathematical expression.".to_string(),
            Self::Geometry(error) => error.to_string(),
            Self::Operation { error, .. } | Self::Plot { error, .. } => {
                format!("{}{}", self.prefix(), error.message())
            },
        }
    }

    /// Returns the input the error points into, along with the underlying error, if there is one.
    pub fn source_error(&self) -> Option<(&str, &SourceError)> {
        match self {
            Self::Operation { input, error, .. } | Self::Plot { input, error } => Some((input, error)),
            Self::EmptyQuery | Self::EmptyExpression | Self::Geometry(_) => None,
        }
    }

    /// Renders the error as an annotated report of the input it came from, or as the plain
    /// message if there is no input to point into.
    pub fn report_to_string(&self, src_id: &str) -> String {
        match self.source_error() {
            Some((input, error)) => format!("{}{}", self.prefix(), error.report_to_string(src_id, input)),
            None => self.message(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geometry(error) => Some(error),
            _ => self.source_error().map(|(_, error)| error as &(dyn std::error::Error + 'static)),
        }
    }
}

impl From<GeometryError> for Error {
    fn from(error: GeometryError) -> Self {
        Self::Geometry(error)
    }
}

/// The serialized form of an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        Self { error: error.message() }
    }
}
