//! Protocol documentation lookup
//!
//! Documentation is optional everywhere: an unknown protocol id yields an
//! empty [`ProtocolDocument`], never an error.

use std::collections::{BTreeMap, HashMap};

/// Title and per-field comments for one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolDocument {
    pub title: String,
    pub fields: BTreeMap<String, String>,
}

impl ProtocolDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>, comment: impl Into<String>) -> Self {
        self.fields.insert(field.into(), comment.into());
        self
    }

    /// Comment for a field, if any non-blank one exists.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|doc| !doc.trim().is_empty())
    }
}

/// Source of documentation keyed by protocol id.
pub trait DocumentationSource: Send + Sync {
    fn document(&self, protocol_id: u16) -> ProtocolDocument;
}

/// Source with no documentation at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDocumentation;

impl DocumentationSource for NoDocumentation {
    fn document(&self, _protocol_id: u16) -> ProtocolDocument {
        ProtocolDocument::default()
    }
}

/// In-memory documentation table.
#[derive(Debug, Clone, Default)]
pub struct DocumentationRegistry {
    documents: HashMap<u16, ProtocolDocument>,
}

impl DocumentationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, protocol_id: u16, document: ProtocolDocument) {
        self.documents.insert(protocol_id, document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentationSource for DocumentationRegistry {
    fn document(&self, protocol_id: u16) -> ProtocolDocument {
        self.documents
            .get(&protocol_id)
            .cloned()
            .unwrap_or_default()
    }
}
