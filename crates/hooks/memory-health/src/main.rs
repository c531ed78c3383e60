//! Print a memory health report as JSON.
//!
//! Checks schema coverage and flags empty, oversized, or unreadable
//! categories. Problems with the store are findings in the report; only a
//! failure to write the report ends with a non-zero exit.

use anyhow::Result;
use clap::Parser;
use hook_common::logging;
use hook_common::prelude::*;
use hook_memory::{build_health, HookError, MemoryCli, MemoryConfig};
use tracing::{debug, info_span};

#[derive(Parser, Debug)]
#[command(name = "memory-health", version, about = "Memory health report")]
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
    let _span = info_span!("memory-health").entered();

    let mut config = MemoryConfig::from_env();
    if let Some(bin) = args.cli.filter(|b| !b.is_empty()) {
        config = config.with_cli_bin(bin);
    }

    let report = build_health(&MemoryCli::from_config(&config));
    debug!(
        categories = report.total_categories,
        issues = report.issues.len(),
        "health check finished"
    );
    write_json(&report, !args.compact)
        .context("failed to write health report")
        .map_err(HookError::output)?;
    Ok(())
}
