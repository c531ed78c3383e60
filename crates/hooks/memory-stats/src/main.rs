//! Print per-category memory statistics as JSON.
//!
//! Backs the `/ferridyn-memory:status` skill. An unreachable memory CLI
//! yields an empty report rather than an error.

use anyhow::Result;
use clap::Parser;
use hook_common::logging;
use hook_common::prelude::*;
use hook_memory::{build_stats, HookError, MemoryCli, MemoryConfig};
use tracing::info_span;

#[derive(Parser, Debug)]
#[command(name = "memory-stats", version, about = "Per-category memory statistics")]
struct Args {
    /// Memory CLI binary
    #[arg(long = "cli", env = "FERRIDYN_MEMORY_CLI")]
    cli: Option<String>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();
    let _span = info_span!("memory-stats").entered();

    let mut config = MemoryConfig::from_env();
    if let Some(bin) = args.cli.filter(|b| !b.is_empty()) {
        config = config.with_cli_bin(bin);
    }

    let report = build_stats(&MemoryCli::from_config(&config));
    write_json(&report, !args.compact)
        .context("failed to write stats report")
        .map_err(HookError::output)?;
    Ok(())
}
