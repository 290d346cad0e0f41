//! TAT CLI - runs the CAC TAT scenario suite.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "tat")]
#[command(about = "Declarative UI scenarios against the CAC TAT contact form", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenario suite
    Run {
        /// Only run scenarios whose name contains this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
        /// Skip scenarios that need network access
        #[arg(long)]
        offline: bool,
        /// Config file (default: ./tat.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Site fixture to load instead of the embedded CAC TAT site
        #[arg(long)]
        site: Option<PathBuf>,
        /// Directory upload fixtures are resolved against
        #[arg(long)]
        fixtures: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the scenarios of the suite
    List {
        /// Only list scenarios whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            filter,
            offline,
            config,
            site,
            fixtures,
            format,
        } => commands::run::run(commands::run::RunArgs {
            filter,
            offline,
            config,
            site,
            fixtures,
            format,
        }),
        Commands::List { filter } => commands::list::run(filter),
    }
}
