use geosolve_compute::numerical::trig_mode::ParseTrigModeError;
use geosolve_core::ErrorResponse;
use std::{fmt, io};

/// Utility enum to package errors that can occur while reading and answering input.
#[derive(Debug)]
pub enum Error {
    /// The query or plot could not be answered.
    Query(geosolve_core::Error),

    /// The command line or a REPL command was malformed.
    Usage(String),

    /// The input could not be read.
    Io(io::Error),
}

impl Error {
    /// Report this error to stderr, annotated with the part of the input it points at if there is
    /// one.
    pub fn report_to_stderr(&self) {
        match self {
            Self::Query(err) => eprintln!("{}", err.report_to_string("input")),
            Self::Usage(msg) => eprintln!("{}", msg),
            Self::Io(err) => eprintln!("{}", err),
        }
    }

    /// The serialized form of this error.
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            Self::Query(err) => ErrorResponse::from(err),
            other => ErrorResponse { error: other.to_string() },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(err) => write!(f, "{}", err),
            Self::Usage(msg) => write!(f, "{}", msg),
            Self::Io(err) => write!(f, "{}", err),
        }
    }
}

impl From<geosolve_core::Error> for Error {
    fn from(err: geosolve_core::Error) -> Self {
        Self::Query(err)
    }
}

impl From<ParseTrigModeError> for Error {
    fn from(err: ParseTrigModeError) -> Self {
        Self::Usage(err.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
