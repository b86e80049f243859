//! Mod manager entry point.
//!
//! Run with: `modctl <command>`; see `modctl --help`.
mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use client_bootstrap::{BootstrapConfig, LoaderBuilder};
use commands::Command;

/// Inspect and manage installed mods
#[derive(Parser)]
#[command(name = "modctl")]
#[command(about = "Resolve, enable and reorder mods", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding one sub-directory per mod (overrides MODS_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    mods_dir: Option<PathBuf>,

    /// Saved enable/order state (overrides MOD_STATE_FILE)
    #[arg(long, global = true, value_name = "FILE")]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let cli = Cli::parse();

    let mut config = BootstrapConfig::from_env();
    if let Some(dir) = cli.mods_dir {
        config = config.with_mods_dir(dir);
    }
    if let Some(file) = cli.state_file {
        config = config.with_state_file(file);
    }

    let setup = LoaderBuilder::new(config).build()?;
    cli.command.execute(&setup.orchestrator).await
}

/// Log to stderr so command output stays clean on stdout.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
