//! Generation run orchestration
//!
//! A run owns everything that used to be process-wide: the dispatch table,
//! the output root, the grouping policy and the per-message counters. It
//! exists between [`GenerationDriver::init`] and [`GenerationDriver::finish`]
//! (or [`GenerationDriver::clear`]); nothing survives into the next run.
//!
//! [`GenerationDriver::generate`] is the all-or-nothing entry point: it
//! validates the schema and plans every output path before touching the file
//! system, so a bad schema leaves any previous output in place.

use crate::context::EmitContext;
use crate::dispatch::DispatchTable;
use crate::emitter::FieldCodeEmitter;
use crate::runtime::RUNTIME_FILES;
use crate::template::{RegistryEntry, TemplateAssembler, TemplateSet};
use protogen_core::{
    DocumentationSource, GenerateConfig, GenerateError, GenerateResult, GroupingPath,
    MessageDefinition, ProtocolSchema,
};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the registry artifact.
pub const REGISTRY_FILE: &str = "ProtocolManager.js";

/// Extension of generated message artifacts.
pub const MESSAGE_EXTENSION: &str = "js";

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub output_root: PathBuf,
    /// Relative `/`-separated paths in write order.
    pub files: Vec<String>,
    /// SHA-256 over every (path, contents) pair in write order, hex encoded.
    pub digest: String,
}

impl GenerationReport {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Relative path of a message artifact.
pub fn message_path(grouping_path: &str, name: &str) -> String {
    let file = format!("{name}.{MESSAGE_EXTENSION}");
    let dir = grouping_path.trim().trim_matches('/');
    if dir.is_empty() {
        file
    } else {
        format!("{dir}/{file}")
    }
}

/// Validate `schema` and compute every message's output path.
///
/// Fails on any schema error, on a field nesting composite kinds deeper than
/// `max_nesting_depth`, and when two artifacts (messages, the registry or
/// runtime files) would share a path. Paths are compared case-insensitively
/// so the tree is safe on case-insensitive file systems.
pub fn plan_outputs(
    schema: &ProtocolSchema,
    grouping: &dyn GroupingPath,
    max_nesting_depth: usize,
) -> GenerateResult<Vec<String>> {
    schema.validate()?;

    for message in schema.messages() {
        for field in &message.fields {
            if field.kind.nesting_depth() > max_nesting_depth {
                return Err(GenerateError::NestingTooDeep {
                    field: format!("{}.{}", message.name, field.name),
                    limit: max_nesting_depth,
                });
            }
        }
    }

    let mut claimed: HashMap<String, String> = HashMap::new();
    let reserved = RUNTIME_FILES
        .iter()
        .map(|file| file.path.to_string())
        .chain(std::iter::once(REGISTRY_FILE.to_string()));
    for path in reserved {
        claimed.insert(path.to_lowercase(), path);
    }

    let mut paths = Vec::with_capacity(schema.len());
    for message in schema.messages() {
        let path = message_path(&grouping.grouping_path(message.protocol_id), &message.name);
        if claimed.insert(path.to_lowercase(), path.clone()).is_some() {
            return Err(GenerateError::OutputPathCollision { path });
        }
        paths.push(path);
    }
    Ok(paths)
}

/// State of one initialized run.
struct Run {
    output_root: PathBuf,
    dispatch: DispatchTable,
    assembler: TemplateAssembler,
    grouping: Box<dyn GroupingPath>,
    context: EmitContext,
    files: Vec<String>,
    hasher: Sha256,
}

impl Run {
    fn write(&mut self, relative: &str, contents: &str) -> GenerateResult<()> {
        let path = self.output_root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| GenerateError::io(parent, e))?;
        }
        fs::write(&path, contents).map_err(|e| GenerateError::io(&path, e))?;

        self.hasher.update(relative.as_bytes());
        self.hasher.update([0u8]);
        self.hasher.update(contents.as_bytes());
        self.hasher.update([0u8]);
        self.files.push(relative.to_string());

        debug!(path = %relative, bytes = contents.len(), "wrote artifact");
        Ok(())
    }
}

/// Drives generation of a JavaScript protocol tree.
pub struct GenerationDriver {
    config: GenerateConfig,
    run: Option<Run>,
}

impl GenerationDriver {
    pub fn new(config: GenerateConfig) -> Self {
        Self { config, run: None }
    }

    pub fn config(&self) -> &GenerateConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.run.is_some()
    }

    /// Output root of the current run.
    pub fn output_root(&self) -> Option<&Path> {
        self.run.as_ref().map(|run| run.output_root.as_path())
    }

    /// Start a run: load templates, then delete and recreate the output root.
    ///
    /// Configuration and template problems are reported before anything is
    /// deleted.
    pub fn init(&mut self) -> GenerateResult<()> {
        self.config.validate()?;
        let templates = match &self.config.template_dir {
            Some(dir) => TemplateSet::load(dir)?,
            None => TemplateSet::embedded(),
        };
        templates.verify()?;
        let grouping = self.config.grouping.build()?;
        let output_root = self.config.output_root();

        reset_directory(&output_root)?;
        info!(output_root = %output_root.display(), "initialized protocol output");

        self.run = Some(Run {
            output_root,
            dispatch: DispatchTable::javascript(),
            assembler: TemplateAssembler::new(templates),
            grouping,
            context: EmitContext::new(self.config.max_nesting_depth),
            files: Vec::new(),
            hasher: Sha256::new(),
        });
        Ok(())
    }

    /// Copy the runtime files and write the registry for every message in
    /// schema order.
    pub fn generate_registry(&mut self, schema: &ProtocolSchema) -> GenerateResult<()> {
        let run = self.run.as_mut().ok_or(GenerateError::NotInitialized)?;

        for file in RUNTIME_FILES {
            run.write(file.path, file.contents)?;
        }

        let entries: Vec<RegistryEntry> = schema
            .messages()
            .iter()
            .map(|message| RegistryEntry {
                protocol_id: message.protocol_id,
                name: message.name.clone(),
                grouping_path: run.grouping.grouping_path(message.protocol_id),
            })
            .collect();
        let text = run.assembler.render_registry(&entries)?;
        run.write(REGISTRY_FILE, &text)
    }

    /// Emit and write one message artifact.
    pub fn generate_message(
        &mut self,
        definition: &MessageDefinition,
        documentation: &dyn DocumentationSource,
    ) -> GenerateResult<()> {
        let run = self.run.as_mut().ok_or(GenerateError::NotInitialized)?;

        let document = documentation.document(definition.protocol_id);
        let fragments = FieldCodeEmitter::new(&run.dispatch).emit_message(
            &mut run.context,
            definition,
            &document,
        )?;
        let text = run.assembler.render_message(
            &definition.name,
            definition.protocol_id,
            &document.title,
            &fragments,
        )?;

        let path = message_path(
            &run.grouping.grouping_path(definition.protocol_id),
            &definition.name,
        );
        run.write(&path, &text)
    }

    /// End the run and report what it wrote.
    pub fn finish(&mut self) -> GenerateResult<GenerationReport> {
        let run = self.run.take().ok_or(GenerateError::NotInitialized)?;
        let report = GenerationReport {
            output_root: run.output_root,
            files: run.files,
            digest: hex::encode(run.hasher.finalize()),
        };
        info!(
            files = report.file_count(),
            digest = %report.digest,
            "generated protocol artifacts"
        );
        Ok(report)
    }

    /// Drop all run state without reporting.
    pub fn clear(&mut self) {
        self.run = None;
    }

    /// Full run: plan, init, registry, every message, finish.
    ///
    /// Any failure aborts the run and clears its state; a tree left behind by
    /// a failure after `init` is incomplete and is replaced by the next run.
    pub fn generate(
        &mut self,
        schema: &ProtocolSchema,
        documentation: &dyn DocumentationSource,
    ) -> GenerateResult<GenerationReport> {
        self.config.validate()?;
        let grouping = self.config.grouping.build()?;
        let planned = plan_outputs(schema, grouping.as_ref(), self.config.max_nesting_depth)?;
        debug!(messages = planned.len(), "planned message artifacts");

        let result = self.run_all(schema, documentation);
        if result.is_err() {
            self.clear();
        }
        result
    }

    fn run_all(
        &mut self,
        schema: &ProtocolSchema,
        documentation: &dyn DocumentationSource,
    ) -> GenerateResult<GenerationReport> {
        self.init()?;
        self.generate_registry(schema)?;
        for message in schema.messages() {
            self.generate_message(message, documentation)?;
        }
        self.finish()
    }
}

impl std::fmt::Debug for GenerationDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationDriver")
            .field("config", &self.config)
            .field("output_root", &self.output_root())
            .finish()
    }
}

fn reset_directory(path: &Path) -> GenerateResult<()> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| GenerateError::io(path, e))?;
    }
    fs::create_dir_all(path).map_err(|e| GenerateError::io(path, e))
}

#[cfg(test)]
#[path = "driver/driver_tests.rs"]
mod driver_tests;
