//! Lsifnav CLI - Command-line interface for lsifnav
//!
//! Reads an LSIF dump and writes per-document navigation data: for every
//! range, where its symbol is defined and where it is referenced.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod documents;
mod dump;

#[derive(Parser)]
#[command(name = "lsifnav")]
#[command(author = "Lsifnav Contributors")]
#[command(version)]
#[command(about = "Code navigation data from LSIF dumps", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default store config to .lsifnav/config.json
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Write one navigation file per document of a dump
    Export {
        /// LSIF dump (newline-delimited JSON)
        dump: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "lsif")]
        output: PathBuf,

        /// Store config file (defaults to .lsifnav/config.json if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show entry counts for a dump
    Stats {
        /// LSIF dump (newline-delimited JSON)
        dump: PathBuf,

        /// Store config file (defaults to .lsifnav/config.json if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Export {
            dump,
            output,
            config,
        } => commands::export(&dump, &output, config.as_deref()),
        Commands::Stats { dump, config, json } => {
            commands::stats(&dump, config.as_deref(), json)
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
