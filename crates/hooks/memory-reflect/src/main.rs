//! Stop hook: reflect on the session before it ends.
//!
//! Same flow as the commit hook over a longer transcript window, but asks
//! for a handful of high-level learnings instead of granular facts.

use anyhow::Result;
use hook_common::logging;
use hook_common::prelude::*;
use hook_memory::{run_extraction, HookError, Inference, MemoryCli, MemoryConfig, REFLECT};
use tracing::{debug, info_span, warn};

fn main() -> Result<()> {
    logging::init();
    let _span = info_span!("memory-reflect").entered();

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

    let outcome = run_extraction(&REFLECT, &input, &store, &inference);
    debug!(?outcome, "reflect finished");
    Ok(())
}
