//! protogen-codegen - JavaScript code generation for protocol schemas
//!
//! This crate turns a [`protogen_core::ProtocolSchema`] into a tree of
//! JavaScript modules:
//! - [`DispatchTable`] maps each value kind to an [`EmissionStrategy`]
//! - [`FieldCodeEmitter`] builds the constructor, write and read blocks of a
//!   message from its fields
//! - [`TemplateAssembler`] substitutes those blocks into the message and
//!   registry templates
//! - [`GenerationDriver`] runs the whole pass and writes the output tree
//!
//! # Example
//!
//! ```no_run
//! use protogen_codegen::GenerationDriver;
//! use protogen_core::{FieldDefinition, GenerateConfig, MessageDefinition, NoDocumentation, ProtocolSchema, ValueKind};
//!
//! let schema = ProtocolSchema::new(vec![
//!     MessageDefinition::new(1, "Ping").with_field(FieldDefinition::new("nonce", ValueKind::Long)),
//! ]);
//! let mut driver = GenerationDriver::new(GenerateConfig::with_protocol_path("out"));
//! let report = driver.generate(&schema, &NoDocumentation)?;
//! println!("{} files, digest {}", report.file_count(), report.digest);
//! # Ok::<(), protogen_core::GenerateError>(())
//! ```

mod context;
mod dispatch;
mod driver;
mod emitter;
mod fragment;
mod javascript;
mod runtime;
mod template;

pub use context::EmitContext;
pub use dispatch::{Declaration, DispatchTable, Emission, EmissionStrategy, ReadFragment};
pub use driver::{
    GenerationDriver, GenerationReport, MESSAGE_EXTENSION, REGISTRY_FILE, message_path, plan_outputs,
};
pub use emitter::{FieldCodeEmitter, MessageFragments};
pub use fragment::{CodeFragment, INDENT, comment_lines};
pub use javascript::{MapEntries, NestedMessage, Scalar, Sequence};
pub use runtime::{RUNTIME_FILES, RuntimeFile};
pub use template::{
    MESSAGE_TEMPLATE, PLACEHOLDER, REGISTRY_TEMPLATE, RegistryEntry, Template, TemplateAssembler,
    TemplateSet,
};
