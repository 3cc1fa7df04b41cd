//! protogen CLI - JavaScript protocol generator
//!
//! Commands:
//! - `protogen generate` - Generate message modules and the protocol registry
//! - `protogen check` - Validate a schema file without writing anything

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod check;
mod generate;

#[derive(Parser)]
#[command(name = "protogen")]
#[command(author, version, about = "Protocol code generator for JavaScript", long_about = None)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate message modules and ProtocolManager.js
    Generate {
        /// Path to the schema file (TOML)
        #[arg(short, long)]
        schema: String,

        /// Directory the output tree is created in (default: current directory)
        #[arg(short, long)]
        output: Option<String>,

        /// Generation config file (TOML); command-line flags take precedence
        #[arg(short, long)]
        config: Option<String>,

        /// Grouping policy: `flat` or `bucket:N`
        #[arg(short, long)]
        grouping: Option<String>,

        /// Directory with template overrides
        #[arg(short, long)]
        templates: Option<String>,
    },

    /// Validate a schema file
    Check {
        /// Path to the schema file (TOML)
        #[arg(short, long)]
        schema: String,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            schema,
            output,
            config,
            grouping,
            templates,
        } => {
            let options = generate::GenerateOptions {
                schema,
                output,
                config,
                grouping,
                templates,
            };
            generate::run(&options)?;
        }
        Commands::Check { schema } => {
            check::run(&schema)?;
        }
    }

    Ok(())
}
