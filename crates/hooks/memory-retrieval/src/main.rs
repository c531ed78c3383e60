//! UserPromptSubmit hook: inject relevant memories into the context.
//!
//! Picks the categories that matter for the prompt, recalls them, and
//! always appends the memory protocol so the assistant knows how to use
//! the CLI itself.

use anyhow::Result;
use hook_common::logging;
use hook_common::prelude::*;
use hook_memory::{run_retrieval, HookError, Inference, MemoryCli, MemoryConfig};
use tracing::{info_span, warn};

fn main() -> Result<()> {
    logging::init();
    let _span = info_span!("memory-retrieval").entered();

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

    if let Some(output) = run_retrieval(&input, &store, &inference) {
        output.write_stdout().map_err(HookError::output)?;
    }
    Ok(())
}
