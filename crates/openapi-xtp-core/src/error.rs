//! Error types for document conversion.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Document root is not a mapping")]
    NotAMapping,

    #[error("Unsupported non-scalar mapping key in input document")]
    UnsupportedKey,

    #[error("Invalid operation filter: {0}")]
    InvalidInclude(#[from] regex::Error),

    #[error("Query parameter reference '{parameter}' not found in components.parameters")]
    Resolution { parameter: String },

    #[error("Schema name collision: {name}")]
    Collision { name: String },

    #[error("Recursion depth exceeded at {path} (max: {max_depth})")]
    RecursionDepthExceeded { path: String, max_depth: usize },
}
