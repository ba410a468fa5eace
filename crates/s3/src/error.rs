//! S3 API error kinds
//!
//! Every failure that reaches a client is one of a small set of
//! [`ErrorKind`]s. The kind is carried by value and maps to its wire code
//! and HTTP status through pure functions.

use http::StatusCode;
use thiserror::Error;

/// Result type for request handling
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Kind of error reported to an S3 client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request is malformed or asks for something unsupported
    BadRequest,
    /// The catalog failed in a way the client cannot fix
    InternalError,
}

impl ErrorKind {
    /// S3 error code placed in the `<Code>` element
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::InternalError => "InternalError",
        }
    }

    /// Default human-readable description
    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::InternalError => "We encountered an internal error, please try again.",
        }
    }

    /// HTTP status for this kind
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// An error aborting a request, with detail for the logs and the client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }

    /// Map a catalog failure that is not a "not found" condition
    pub fn from_catalog(err: &lg_core::Error) -> Self {
        if err.is_invalid_input() {
            Self::bad_request(err.to_string())
        } else {
            Self::internal(err.to_string())
        }
    }
}
