//! Error types for tabstore-core

use thiserror::Error;

/// Core error type for tabstore
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Field type outside the supported vocabulary
    #[error("[E004] Type '{type_name}' is not supported")]
    UnsupportedType { type_name: String },

    /// E005: Schema descriptor violates an invariant
    #[error("[E005] Invalid schema: {message}")]
    InvalidSchema { message: String },

    /// E006: A value could not be converted to the field's logical type
    #[error("[E006] Cannot convert value {value} of field '{field}' to {expected}")]
    TypeCoercion {
        field: String,
        value: String,
        expected: String,
    },

    /// E007: IO error with file path context
    #[error("[E007] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E008: YAML parse error
    #[error("[E008] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
