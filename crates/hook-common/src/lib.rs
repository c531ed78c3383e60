//! Common utilities for Claude Code hooks.
//!
//! This crate provides shared functionality for all Rust-based hooks:
//! - JSON input/output parsing
//! - Subprocess execution with timeouts
//! - Logging to stderr

pub mod input;
pub mod logging;
pub mod output;
pub mod subprocess;

pub use input::HookInput;
pub use output::{write_json, HookOutput};
pub use subprocess::{run_with_timeout, CommandResult, SubprocessError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::input::HookInput;
    pub use crate::output::{write_json, HookOutput};
    pub use crate::subprocess::{run_with_timeout, CommandResult, SubprocessError};
    pub use anyhow::{Context, Result};
    pub use serde::{Deserialize, Serialize};
}
