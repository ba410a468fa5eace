//! Error types for lg-core
//!
//! Catalog implementations report failures through [`Error`]. The listing
//! engine only cares whether an error is a "not found" condition; every
//! other variant aborts the request.

use thiserror::Error;

/// Result type alias for lg-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by catalogs, configuration loading and key resolution
#[derive(Debug, Error)]
pub enum Error {
    /// Generic "does not exist" condition
    #[error("Not found: {0}")]
    NotFound(String),

    /// The repository is unknown to the catalog
    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    /// The ref does not name a branch in the repository
    #[error("Branch not found: {0}")]
    BranchNotFound(String),

    /// A compound key could not be resolved
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The catalog rejected an argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The catalog backend is temporarily unreachable
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    General(String),
}

impl Error {
    /// Whether this error means the listed thing simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::RepositoryNotFound(_) | Error::BranchNotFound(_)
        )
    }

    /// Whether the failure was caused by the caller's input
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidPath(_) | Error::InvalidArgument(_))
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
