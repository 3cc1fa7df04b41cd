//! Generate command implementation

use anyhow::{Context, Result};
use protogen_codegen::{GenerationDriver, GenerationReport};
use protogen_core::{GenerateConfig, GroupingPolicy, SchemaFile};
use std::path::PathBuf;
use tracing::info;

/// Arguments of `protogen generate`.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub schema: String,
    pub output: Option<String>,
    pub config: Option<String>,
    pub grouping: Option<String>,
    pub templates: Option<String>,
}

/// Run the generate command.
pub fn run(options: &GenerateOptions) -> Result<GenerationReport> {
    let config = build_config(options)?;

    let resolved = SchemaFile::from_file(&options.schema)
        .and_then(|file| file.resolve())
        .with_context(|| format!("Failed to load schema: {}", options.schema))?;
    info!(
        schema = %options.schema,
        messages = resolved.schema.len(),
        "loaded schema"
    );

    let output_root = config.output_root();
    let report = GenerationDriver::new(config)
        .generate(&resolved.schema, &resolved.documentation)
        .with_context(|| format!("Failed to generate protocol into {}", output_root.display()))?;

    println!(
        "✓ Generated {} files in {}",
        report.file_count(),
        report.output_root.display()
    );
    println!("✓ Digest: {}", report.digest);

    Ok(report)
}

/// Merge the optional config file with command-line overrides.
pub fn build_config(options: &GenerateOptions) -> Result<GenerateConfig> {
    let mut config = match &options.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {path}"))?;
            GenerateConfig::from_toml(&text)
                .with_context(|| format!("Failed to parse config: {path}"))?
        }
        None => GenerateConfig::default(),
    };

    if let Some(output) = &options.output {
        config.protocol_path = PathBuf::from(output);
    }
    if let Some(grouping) = &options.grouping {
        config.grouping = grouping
            .parse::<GroupingPolicy>()
            .context("Invalid --grouping value")?;
    }
    if let Some(templates) = &options.templates {
        config.template_dir = Some(PathBuf::from(templates));
    }

    config.validate().context("Invalid generation config")?;
    Ok(config)
}
