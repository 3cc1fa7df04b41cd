//! Protocol schema model
//!
//! The schema is assembled once per generation run by whatever discovers the
//! message types, and is only read afterwards. Field order is part of the wire
//! contract shared with every other backend, so nothing here reorders or
//! deduplicates fields.

use crate::error::{GenerateError, GenerateResult};
use crate::kind::ValueKind;
use std::collections::{HashMap, HashSet};

/// Largest protocol id; ids travel as a signed short.
pub const MAX_PROTOCOL_ID: u16 = i16::MAX as u16;

/// Names generated modules cannot use for messages or fields: JavaScript
/// reserved words and strict-mode restricted names, the members every
/// message carries, and the bindings the message and registry modules
/// declare or rely on.
pub const RESERVED_NAMES: &[&str] = &[
    // reserved words
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
    // restricted or global values
    "arguments", "eval", "undefined", "NaN", "Infinity", "__proto__",
    // generated members
    "protocolId", "write", "read",
    // module bindings
    "Map", "Set", "Error", "protocols", "buffer", "packet", "ProtocolManager",
];

/// Prefixes of the temporaries declared inside generated read and write code.
const TEMPORARY_PREFIXES: &[&str] = &["result", "size", "index", "element", "key", "value"];

/// A field of a message.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    /// Field name, also the property name in generated code.
    pub name: String,

    /// Declared type as written by the schema author (comments only).
    pub type_description: String,

    /// Resolved kind driving code emission.
    pub kind: ValueKind,

    /// Added after the message's original release; readers must tolerate
    /// buffers that end before it.
    pub compatible: bool,
}

impl FieldDefinition {
    /// Create a field whose type description is the kind's own expression.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            type_description: kind.to_string(),
            kind,
            compatible: false,
        }
    }

    /// Replace the type description. Whitespace runs, line breaks included,
    /// collapse to single spaces.
    pub fn with_type_description(mut self, description: impl AsRef<str>) -> Self {
        self.type_description = description
            .as_ref()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        self
    }

    /// Mark the field as a compatible tail field.
    pub fn compatible(mut self) -> Self {
        self.compatible = true;
        self
    }
}

/// A message type with a stable protocol id.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDefinition {
    pub protocol_id: u16,
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

impl MessageDefinition {
    pub fn new(protocol_id: u16, name: impl Into<String>) -> Self {
        Self {
            protocol_id,
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field after the ones already declared.
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }
}

/// Ordered set of message definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProtocolSchema {
    messages: Vec<MessageDefinition>,
}

impl ProtocolSchema {
    pub fn new(messages: Vec<MessageDefinition>) -> Self {
        Self { messages }
    }

    /// Messages in declaration order.
    pub fn messages(&self) -> &[MessageDefinition] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Look up a message by protocol id.
    pub fn get(&self, protocol_id: u16) -> Option<&MessageDefinition> {
        self.messages.iter().find(|m| m.protocol_id == protocol_id)
    }

    /// Check the invariants generation relies on.
    ///
    /// Rejects out-of-range and duplicate protocol ids, duplicate message
    /// names, names that are not identifiers or are reserved in generated
    /// code, duplicate field names and nested message references to ids
    /// missing from the schema.
    pub fn validate(&self) -> GenerateResult<()> {
        let mut ids: HashMap<u16, &str> = HashMap::new();
        let mut names = HashSet::new();

        for message in &self.messages {
            if message.protocol_id > MAX_PROTOCOL_ID {
                return Err(GenerateError::ProtocolIdOutOfRange {
                    id: message.protocol_id,
                    max: MAX_PROTOCOL_ID,
                });
            }

            if let Some(first) = ids.insert(message.protocol_id, &message.name) {
                return Err(GenerateError::DuplicateProtocolId {
                    id: message.protocol_id,
                    first: first.to_string(),
                    second: message.name.clone(),
                });
            }

            if !names.insert(message.name.as_str()) {
                return Err(GenerateError::DuplicateMessageName {
                    name: message.name.clone(),
                });
            }

            if !is_identifier(&message.name) {
                return Err(GenerateError::Config(format!(
                    "message name '{}' is not a valid identifier",
                    message.name
                )));
            }
            if is_reserved_name(&message.name) || is_temporary_name(&message.name) {
                return Err(GenerateError::Config(format!(
                    "message name '{}' is reserved in generated code",
                    message.name
                )));
            }

            let mut field_names = HashSet::new();
            for field in &message.fields {
                if !is_identifier(&field.name) {
                    return Err(GenerateError::Config(format!(
                        "field name '{}.{}' is not a valid identifier",
                        message.name, field.name
                    )));
                }
                if is_reserved_name(&field.name) {
                    return Err(GenerateError::Config(format!(
                        "field name '{}.{}' is reserved in generated code",
                        message.name, field.name
                    )));
                }
                if !field_names.insert(field.name.as_str()) {
                    return Err(GenerateError::Config(format!(
                        "duplicate field '{}' in message {}",
                        field.name, message.name
                    )));
                }
            }
        }

        for message in &self.messages {
            for field in &message.fields {
                for id in field.kind.nested_protocols() {
                    if !ids.contains_key(&id) {
                        return Err(GenerateError::UnknownNestedProtocol {
                            message: message.name.clone(),
                            field: field.name.clone(),
                            id,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

/// ASCII identifier: a letter, `_` or `$` followed by letters, digits, `_` or `$`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => chars
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$'),
        _ => false,
    }
}

/// Whether `name` is one of [`RESERVED_NAMES`].
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// `result0`, `size12` and the like: a temporary prefix followed by digits.
fn is_temporary_name(name: &str) -> bool {
    TEMPORARY_PREFIXES.iter().any(|prefix| {
        name.strip_prefix(prefix)
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
    })
}
