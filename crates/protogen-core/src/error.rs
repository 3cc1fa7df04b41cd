//! Error types for protocol generation

use crate::kind::KindTag;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generation operations
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Error type for generation operations
///
/// Every variant is fatal for the run that raised it. The variants fall into
/// two classes: configuration errors (a mismatch between the generator, its
/// templates and the schema) and I/O errors (see [`GenerateError::is_io_error`]).
#[derive(Error, Debug)]
pub enum GenerateError {
    /// No emission strategy is registered for a value kind
    #[error("no emission strategy registered for value kind: {0}")]
    UnsupportedKind(KindTag),

    /// Template argument count differs from its placeholder count
    #[error("template {template} has {expected} placeholder(s) but {actual} argument(s) were supplied")]
    PlaceholderMismatch {
        template: String,
        expected: usize,
        actual: usize,
    },

    /// Two messages share a protocol id
    #[error("duplicate protocol id {id}: declared by {first} and {second}")]
    DuplicateProtocolId {
        id: u16,
        first: String,
        second: String,
    },

    /// Two messages share a name
    #[error("duplicate message name: {name}")]
    DuplicateMessageName { name: String },

    /// A protocol id does not fit the signed short used on the wire
    #[error("protocol id {id} is out of range (maximum {max})")]
    ProtocolIdOutOfRange { id: u16, max: u16 },

    /// A nested message kind references a protocol missing from the schema
    #[error("field {message}.{field} references unknown protocol id {id}")]
    UnknownNestedProtocol {
        message: String,
        field: String,
        id: u16,
    },

    /// Two messages would be written to the same artifact path
    #[error("output path collision: {path}")]
    OutputPathCollision { path: String },

    /// Composite nesting exceeded the configured limit
    #[error("field {field} nests composite kinds deeper than {limit} levels")]
    NestingTooDeep { field: String, limit: usize },

    /// A type expression could not be parsed
    #[error("invalid value kind: {0}")]
    InvalidValueKind(String),

    /// Invalid configuration or schema file
    #[error("configuration error: {0}")]
    Config(String),

    /// A driver operation was attempted outside an initialized run
    #[error("generation run is not initialized")]
    NotInitialized,

    /// A template could not be read
    #[error("failed to load template {path:?}: {source}")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file-system operation failed
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    /// Wrap an I/O error with the path it occurred at
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for template-load and file-system failures
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            GenerateError::TemplateLoad { .. } | GenerateError::Io { .. }
        )
    }

    /// Returns true for generator/schema mismatches
    pub fn is_configuration_error(&self) -> bool {
        !self.is_io_error()
    }
}

impl From<toml::de::Error> for GenerateError {
    fn from(err: toml::de::Error) -> Self {
        GenerateError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for GenerateError {
    fn from(err: serde_json::Error) -> Self {
        GenerateError::Config(err.to_string())
    }
}
