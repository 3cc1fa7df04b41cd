//! TOML schema files
//!
//! The generator proper consumes an already-resolved [`ProtocolSchema`]. This
//! module is the small front end the command line uses to build one:
//!
//! ```toml
//! [[messages]]
//! id = 100
//! name = "Player"
//! title = "A connected player"
//!
//! [[messages.fields]]
//! name = "id"
//! type = "long"
//! doc = "Account id"
//!
//! [[messages.fields]]
//! name = "friends"
//! type = "list<Player>"
//! compatible = true
//! ```

use crate::document::{DocumentationRegistry, ProtocolDocument};
use crate::error::{GenerateError, GenerateResult};
use crate::kind::ValueKind;
use crate::schema::{FieldDefinition, MessageDefinition, ProtocolSchema};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Parsed schema file, before type expressions are resolved
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaFile {
    #[serde(default)]
    pub messages: Vec<MessageEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEntry {
    pub id: u16,
    pub name: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default)]
    pub doc: Option<String>,

    #[serde(default)]
    pub compatible: bool,
}

/// Schema and documentation resolved from a schema file
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    pub schema: ProtocolSchema,
    pub documentation: DocumentationRegistry,
}

impl SchemaFile {
    /// Load a schema file from disk
    pub fn from_file(path: impl AsRef<Path>) -> GenerateResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| GenerateError::io(path, source))?;

        Self::parse(&content)
    }

    /// Parse schema file text
    pub fn parse(content: &str) -> GenerateResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve type expressions and collect documentation.
    ///
    /// Bare message names in type expressions refer to messages declared
    /// anywhere in the same file.
    pub fn resolve(&self) -> GenerateResult<ResolvedSchema> {
        let ids: HashMap<&str, u16> = self
            .messages
            .iter()
            .map(|m| (m.name.as_str(), m.id))
            .collect();

        let mut messages = Vec::with_capacity(self.messages.len());
        let mut documentation = DocumentationRegistry::new();

        for entry in &self.messages {
            let mut message = MessageDefinition::new(entry.id, entry.name.clone());
            let mut document = ProtocolDocument::new(entry.title.clone().unwrap_or_default());

            for field in &entry.fields {
                let description = field.ty.trim();
                let kind = ValueKind::parse_with(description, |name| ids.get(name).copied())
                    .map_err(|err| {
                        GenerateError::InvalidValueKind(format!(
                            "{}.{}: {err}",
                            entry.name, field.name
                        ))
                    })?;

                let mut definition =
                    FieldDefinition::new(field.name.clone(), kind).with_type_description(description);
                if field.compatible {
                    definition = definition.compatible();
                }
                message = message.with_field(definition);

                if let Some(doc) = &field.doc {
                    document = document.with_field(field.name.clone(), doc.clone());
                }
            }

            if !document.title.is_empty() || !document.fields.is_empty() {
                documentation.insert(entry.id, document);
            }
            messages.push(message);
        }

        debug!(
            messages = messages.len(),
            documented = documentation.len(),
            "resolved schema file"
        );

        Ok(ResolvedSchema {
            schema: ProtocolSchema::new(messages),
            documentation,
        })
    }
}

#[cfg(test)]
#[path = "schema_file/schema_file_tests.rs"]
mod schema_file_tests;
