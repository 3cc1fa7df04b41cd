//! Positional template substitution
//!
//! Templates are plain text with `{}` markers consumed left to right. There
//! are no named, escaped or conditional markers. Rendering with a different
//! number of arguments than markers is a [`GenerateError::PlaceholderMismatch`].

use crate::emitter::MessageFragments;
use crate::fragment::comment_lines;
use protogen_core::{GenerateError, GenerateResult};
use std::fs;
use std::path::Path;

/// Positional marker.
pub const PLACEHOLDER: &str = "{}";

/// File name of the message template.
pub const MESSAGE_TEMPLATE: &str = "ProtocolTemplate.js";

/// File name of the registry template.
pub const REGISTRY_TEMPLATE: &str = "ProtocolManagerTemplate.js";

/// Arguments supplied to the message template.
const MESSAGE_ARGUMENTS: usize = 12;

/// Arguments supplied to the registry template.
const REGISTRY_ARGUMENTS: usize = 2;

mod embedded {
    pub const MESSAGE: &str = include_str!("../templates/javascript/ProtocolTemplate.js");
    pub const REGISTRY: &str = include_str!("../templates/javascript/ProtocolManagerTemplate.js");
}

/// A parsed template: the literal text between markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    segments: Vec<String>,
}

impl Template {
    pub fn parse(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            segments: text.split(PLACEHOLDER).map(str::to_string).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn placeholder_count(&self) -> usize {
        self.segments.len() - 1
    }

    /// Substitute `args` into the markers, in order.
    pub fn render(&self, args: &[&str]) -> GenerateResult<String> {
        self.check_arity(args.len())?;

        let capacity = self.segments.iter().map(String::len).sum::<usize>()
            + args.iter().map(|arg| arg.len()).sum::<usize>();
        let mut out = String::with_capacity(capacity);
        for (segment, arg) in self.segments.iter().zip(args) {
            out.push_str(segment);
            out.push_str(arg);
        }
        if let Some(last) = self.segments.last() {
            out.push_str(last);
        }
        Ok(out)
    }

    fn check_arity(&self, actual: usize) -> GenerateResult<()> {
        let expected = self.placeholder_count();
        if expected != actual {
            return Err(GenerateError::PlaceholderMismatch {
                template: self.name.clone(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

/// The message and registry templates for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    message: Template,
    registry: Template,
}

impl TemplateSet {
    /// Templates compiled into the crate.
    pub fn embedded() -> Self {
        Self {
            message: Template::parse(MESSAGE_TEMPLATE, embedded::MESSAGE),
            registry: Template::parse(REGISTRY_TEMPLATE, embedded::REGISTRY),
        }
    }

    /// Templates read from `dir`, which must contain both template files.
    pub fn load(dir: &Path) -> GenerateResult<Self> {
        let read = |file: &str| {
            let path = dir.join(file);
            fs::read_to_string(&path)
                .map(|text| Template::parse(file, &text))
                .map_err(|source| GenerateError::TemplateLoad { path, source })
        };

        Ok(Self {
            message: read(MESSAGE_TEMPLATE)?,
            registry: read(REGISTRY_TEMPLATE)?,
        })
    }

    /// Check both templates take the arguments the assembler supplies.
    pub fn verify(&self) -> GenerateResult<()> {
        self.message.check_arity(MESSAGE_ARGUMENTS)?;
        self.registry.check_arity(REGISTRY_ARGUMENTS)
    }

    pub fn message(&self) -> &Template {
        &self.message
    }

    pub fn registry(&self) -> &Template {
        &self.registry
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::embedded()
    }
}

/// One registered message in the registry artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub protocol_id: u16,
    pub name: String,
    pub grouping_path: String,
}

impl RegistryEntry {
    /// Import statement relative to the output root.
    pub fn import_statement(&self) -> String {
        if self.grouping_path.trim().is_empty() {
            format!("import {name} from './{name}.js';", name = self.name)
        } else {
            format!(
                "import {name} from './{path}/{name}.js';",
                name = self.name,
                path = self.grouping_path
            )
        }
    }

    pub fn registration_statement(&self) -> String {
        format!("protocols.set({}, {});", self.protocol_id, self.name)
    }
}

/// Produces artifact text from templates and emitted fragments.
#[derive(Debug, Clone, Default)]
pub struct TemplateAssembler {
    templates: TemplateSet,
}

impl TemplateAssembler {
    pub fn new(templates: TemplateSet) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Render a message artifact.
    pub fn render_message(
        &self,
        name: &str,
        protocol_id: u16,
        doc_title: &str,
        fragments: &MessageFragments,
    ) -> GenerateResult<String> {
        let title: String = comment_lines(doc_title)
            .into_iter()
            .map(|line| line + "\n")
            .collect();
        let id = protocol_id.to_string();
        let constructor = fragments.constructor.render();
        let write = fragments.write.render();
        let read = fragments.read.render();

        self.templates.message.render(&[
            &title,
            name,
            &fragments.parameters,
            constructor.trim(),
            name,
            &id,
            name,
            write.trim(),
            name,
            name,
            read.trim(),
            name,
        ])
    }

    /// Render the registry artifact, one import and one registration per
    /// entry in the given order.
    pub fn render_registry(&self, entries: &[RegistryEntry]) -> GenerateResult<String> {
        let imports = entries
            .iter()
            .map(RegistryEntry::import_statement)
            .collect::<Vec<_>>()
            .join("\n");
        let registrations = entries
            .iter()
            .map(RegistryEntry::registration_statement)
            .collect::<Vec<_>>()
            .join("\n");

        self.templates.registry.render(&[&imports, &registrations])
    }
}
