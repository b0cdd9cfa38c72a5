//! Error types for mounter-reader.

use std::path::PathBuf;

use thiserror::Error;

use mounter_core::CoreError;

/// All errors that can cross the reader boundary.
///
/// Content irregularities never show up here: they degrade to absent values
/// inside the mounting point.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// One or more of `uri`, `email`, `password` is missing or blank.
    #[error("one or many API credentials (uri, email, password) are missing")]
    MissingCredentials { missing: Vec<&'static str> },

    /// No site path was configured.
    #[error("the path to the site is missing")]
    MissingPath,

    /// The configured site path does not exist or is not a directory.
    #[error("invalid site path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// The reader list has no site reader.
    #[error("a site reader is required before any other resource")]
    MissingSiteReader,

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path.
    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON decoding error (API payloads).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport or protocol failure reported by an API client.
    #[error("API error on '{resource}': {message}")]
    Api { resource: String, message: String },

    /// Schema decoding error from the core.
    #[error("content error: {0}")]
    Core(#[from] CoreError),
}

impl ReaderError {
    /// Configuration errors are raised before any resource is read.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ReaderError::MissingCredentials { .. }
                | ReaderError::MissingPath
                | ReaderError::InvalidPath { .. }
                | ReaderError::MissingSiteReader
        )
    }
}

/// Convenience constructor for [`ReaderError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ReaderError {
    ReaderError::Io {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`ReaderError::Yaml`].
pub(crate) fn yaml_err(path: impl Into<PathBuf>, source: serde_yaml::Error) -> ReaderError {
    ReaderError::Yaml {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`ReaderError::Api`].
pub fn api_err(resource: impl Into<String>, message: impl Into<String>) -> ReaderError {
    ReaderError::Api {
        resource: resource.into(),
        message: message.into(),
    }
}
