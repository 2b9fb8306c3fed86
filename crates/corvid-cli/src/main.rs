//! corvid CLI - admin tool for corvid graph databases.
//!
//! A focused admin CLI for operators: inspection and snapshot management.
//! Query execution is the library's job, not the CLI's.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// corvid database administration tool.
#[derive(Parser)]
#[command(name = "corvid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Suppress progress and info messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Output format options.
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable key/value format (default)
    #[default]
    Table,
    /// Machine-readable JSON format
    Json,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Display database information (counts, mode, path)
    Info {
        /// Path to the database directory
        path: PathBuf,
    },

    /// Show detailed statistics
    Stats {
        /// Path to the database directory
        path: PathBuf,
    },

    /// Take a snapshot and truncate superseded WAL segments
    Snapshot {
        /// Path to the database directory
        path: PathBuf,
    },

    /// Show Write-Ahead Log status
    Wal {
        /// Path to the database directory
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();
    } else if !cli.quiet {
        tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
    }

    let result = match cli.command {
        Commands::Info { path } => commands::info::run(&path, cli.format, cli.quiet),
        Commands::Stats { path } => commands::stats::run(&path, cli.format, cli.quiet),
        Commands::Snapshot { path } => commands::snapshot::run(&path, cli.format, cli.quiet),
        Commands::Wal { path } => commands::wal::run(&path, cli.format, cli.quiet),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
