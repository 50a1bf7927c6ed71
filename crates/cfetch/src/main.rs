//! cfetch CLI - read Confluence content as JSON.
//!
//! Provides commands for:
//! - `inline-comments` / `comments`: comments on a page
//! - `page` / `children` / `space-pages`: page content
//! - `spaces`, `labels`, `user`, `search`: everything else
//! - `add-comment` / `add-label`: small writes

mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::{Command, GlobalArgs};
use output::Output;

/// cfetch - Confluence fetch tool.
#[derive(Parser)]
#[command(name = "cfetch", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    if let Err(err) = cli.command.execute(&cli.global, &output) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
