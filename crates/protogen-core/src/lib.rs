//! protogen-core - Schema model, configuration and errors
//!
//! This crate provides the inputs every protogen backend consumes:
//! - [`ProtocolSchema`], [`MessageDefinition`], [`FieldDefinition`] and
//!   [`ValueKind`] describing the messages to generate
//! - [`DocumentationSource`] for optional titles and field comments
//! - [`GroupingPath`] policies placing artifacts in sub-directories
//! - [`GenerateConfig`] for run configuration
//! - [`GenerateError`] for error handling
//! - [`SchemaFile`] for loading schemas from TOML

mod config;
mod document;
mod error;
mod kind;
mod path;
mod schema;
mod schema_file;

pub use config::GenerateConfig;
pub use document::{DocumentationRegistry, DocumentationSource, NoDocumentation, ProtocolDocument};
pub use error::{GenerateError, GenerateResult};
pub use kind::{KindTag, ValueKind};
pub use path::{BucketPath, ExplicitPaths, FlatPath, GroupingPath, GroupingPolicy};
pub use schema::{
    FieldDefinition, MAX_PROTOCOL_ID, MessageDefinition, ProtocolSchema, RESERVED_NAMES, is_identifier,
    is_reserved_name,
};
pub use schema_file::{FieldEntry, MessageEntry, ResolvedSchema, SchemaFile};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        DocumentationSource, FieldDefinition, GenerateConfig, GenerateError, GenerateResult,
        GroupingPath, MessageDefinition, ProtocolSchema, ValueKind,
    };
}
