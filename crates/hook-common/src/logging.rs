//! Logging setup for hooks.
//!
//! Hooks talk to Claude Code over stdout, so all diagnostics go to stderr.
//! Each hook enters a span named after itself, which tags every line with
//! the component that wrote it.

use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init() {
    let level = if is_debug_enabled() {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .try_init();
}

/// Check if debug mode is enabled
pub fn is_debug_enabled() -> bool {
    // Enable via environment variable
    if std::env::var_os("CLAUDE_HOOK_DEBUG").is_some() {
        return true;
    }

    // Or check for debug marker file
    debug_marker_path().exists()
}

/// Marker file that turns on debug output for a project.
pub fn debug_marker_path() -> PathBuf {
    let project_dir = std::env::var("CLAUDE_PROJECT_DIR").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(project_dir).join(".claude").join(".hook-debug")
}
