//! Rendition CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rendition")]
#[command(version)]
#[command(about = "Run document transformations over block trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run transformations over a JSON document and print the result
    Transform {
        /// Input JSON document ('-' for stdin)
        input: String,

        /// Pipeline configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Transformation to run, replacing the configured list (repeatable)
        #[arg(short = 't', long = "transformation")]
        transformations: Vec<String>,

        /// Source syntax of the document (NAME/VERSION)
        #[arg(long)]
        syntax: Option<String>,

        /// Target syntax of the rendering (NAME/VERSION)
        #[arg(long)]
        target_syntax: Option<String>,

        /// Identifier of this execution
        #[arg(long)]
        id: Option<String>,

        /// Run in restricted mode
        #[arg(long)]
        restricted: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Events)]
        output: OutputFormat,
    },

    /// Print the traversal events of a JSON document
    Events {
        /// Input JSON document ('-' for stdin)
        input: String,
    },
}

/// How a document is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One traversal event per line
    Events,
    /// The document as JSON
    Json,
}

fn main() -> Result<()> {
    // Initialize logging; stdout carries the document
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rendition=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Transform {
            input,
            config,
            transformations,
            syntax,
            target_syntax,
            id,
            restricted,
            output,
        } => commands::transform::execute(commands::transform::TransformArgs {
            input,
            config,
            transformations,
            syntax,
            target_syntax,
            id,
            restricted,
            output,
        }),
        Commands::Events { input } => commands::events::execute(&input),
    }
}
