//! PreCompact hook: commit memories before the context is compacted.
//!
//! Reads the tail of the session transcript, asks the model which facts are
//! worth keeping, and stores each one through the memory CLI. Any failure is
//! logged and swallowed so compaction is never blocked.

use anyhow::Result;
use hook_common::logging;
use hook_common::prelude::*;
use hook_memory::{run_extraction, HookError, Inference, MemoryCli, MemoryConfig, COMMIT};
use tracing::{debug, info_span, warn};

fn main() -> Result<()> {
    logging::init();
    let _span = info_span!("memory-commit").entered();

    if let Err(err) = run() {
        warn!(severity = ?err.severity(), "{}", err);
    }
    Ok(())
}

fn run() -> hook_memory::Result<()> {
    let input = HookInput::from_stdin().map_err(HookError::invalid_input)?;

    let config = MemoryConfig::from_env();
    let store = MemoryCli::from_config(&config);
    let inference = Inference::from_config(&config);

    let outcome = run_extraction(&COMMIT, &input, &store, &inference);
    debug!(?outcome, "commit finished");
    Ok(())
}
