//! The hook runners.
//!
//! Every runner follows the same shape: read the trigger, gather context,
//! discover categories, ask the model, then store or recall through the
//! memory CLI. Each step can end the run early; none of them can make the
//! host fail.

pub mod extraction;
pub mod report;
pub mod retrieval;

pub use extraction::{run_extraction, ExtractionOutcome, ExtractionPlan, SkipReason};
pub use report::{build_health, build_stats, schema_coverage};
pub use retrieval::run_retrieval;

use crate::cli::MemoryStore;
use tracing::debug;

/// Names of existing categories; empty if discovery fails.
pub fn category_names(store: &dyn MemoryStore) -> Vec<String> {
    match store.discover() {
        Ok(categories) => categories.into_iter().map(|c| c.name).collect(),
        Err(err) => {
            debug!(error = %err, "category discovery failed");
            Vec::new()
        }
    }
}
