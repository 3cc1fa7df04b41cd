//! Check command implementation

use anyhow::{Context, Result};
use protogen_codegen::plan_outputs;
use protogen_core::{FlatPath, GenerateConfig, SchemaFile};

/// Validate a schema file: parse, resolve names and check every invariant
/// generation relies on.
pub fn run(schema_path: &str) -> Result<()> {
    println!("Checking schema: {schema_path}");

    let resolved = SchemaFile::from_file(schema_path)
        .and_then(|file| file.resolve())
        .with_context(|| format!("Failed to load schema: {schema_path}"))?;
    let max_nesting_depth = GenerateConfig::default().max_nesting_depth;
    plan_outputs(&resolved.schema, &FlatPath, max_nesting_depth)
        .context("Schema is not valid for generation")?;

    let fields: usize = resolved
        .schema
        .messages()
        .iter()
        .map(|message| message.fields.len())
        .sum();
    println!("✓ Messages: {}", resolved.schema.len());
    println!("✓ Fields: {fields}");
    println!("✓ Documented messages: {}", resolved.documentation.len());
    println!("\nSchema is valid!");

    Ok(())
}
