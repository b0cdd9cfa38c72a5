//! Error types for mounter-core.

use thiserror::Error;

/// Errors raised while decoding or addressing the content graph.
///
/// Content irregularities (missing translations, unresolved relationships,
/// attributes without a declared field) are not errors; they read back as
/// absent values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A resource name outside the closed set of resource kinds.
    #[error("unknown resource '{0}'")]
    UnknownResource(String),

    /// A field type the schema does not support.
    #[error("unknown field type '{kind}' for field '{field}'")]
    UnknownFieldKind { field: String, kind: String },

    /// A content type definition could not be decoded.
    #[error("invalid content type '{slug}': {message}")]
    InvalidContentType { slug: String, message: String },

    /// YAML decoding error (file-system schema definitions).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON decoding error (API schema definitions).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
