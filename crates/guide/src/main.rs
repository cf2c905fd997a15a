//! Guide CLI - Repair guide server.
//!
//! Provides commands for:
//! - `serve`: Start the guide server
//! - `check`: Resolve one guide and report every decision

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use commands::{CheckArgs, ServeArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Guide - Repair guide server.
#[derive(Parser)]
#[command(name = "guide", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the guide server.
    Serve(ServeArgs),
    /// Resolve one guide and print the resolved path, title, and images.
    Check(CheckArgs),
}

impl Commands {
    /// Log level requested with `--verbose`.
    fn verbose_level(&self) -> Option<LevelFilter> {
        match self {
            Self::Serve(args) if args.verbose => Some(LevelFilter::INFO),
            Self::Check(args) if args.verbose => Some(LevelFilter::DEBUG),
            _ => None,
        }
    }
}

/// `--verbose` overrides `RUST_LOG`; with neither, only warnings are shown.
fn log_filter(verbose: Option<LevelFilter>) -> EnvFilter {
    let builder = EnvFilter::builder();
    match verbose {
        Some(level) => builder.with_default_directive(level.into()).parse_lossy(""),
        None => builder
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy(),
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.command.verbose_level()))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(args.execute(VERSION)),
            Err(e) => Err(e.into()),
        },
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
