//! Memory pipeline for Claude Code hooks.
//!
//! Provides:
//! - Memory CLI client (discover, recall, remember)
//! - Two-tier inference (Messages API, local `claude` binary)
//! - JSON extraction from free-form model output
//! - Transcript tail reader
//! - The commit, reflect, retrieval, stats and health runners

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod inference;
pub mod pipeline;
pub mod prompts;
pub mod schema;
pub mod transcript;

pub use cli::{MemoryCli, MemoryStore};
pub use config::MemoryConfig;
pub use error::{HookError, Result, Severity};
pub use inference::{Inference, InferenceStrategy};
pub use pipeline::extraction::{COMMIT, REFLECT};
pub use pipeline::{
    build_health, build_stats, run_extraction, run_retrieval, ExtractionOutcome, SkipReason,
};
pub use schema::{HealthReport, StatsReport};
