//! Runtime configuration, read from the environment.

use std::time::Duration;

/// Memory CLI binary name when `FERRIDYN_MEMORY_CLI` is unset.
pub const DEFAULT_CLI_BIN: &str = "fmemory";

/// Messages API endpoint.
pub const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Messages API version header value.
pub const API_VERSION: &str = "2023-06-01";

/// Model used for remote inference.
pub const API_MODEL: &str = "claude-haiku-4-5";

/// Output token cap for remote inference.
pub const API_MAX_TOKENS: u32 = 2048;

/// Local inference binary and model alias.
pub const LOCAL_BIN: &str = "claude";
pub const LOCAL_MODEL: &str = "haiku";

/// Default timeout for memory CLI calls.
pub const CLI_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the local inference fallback.
pub const LOCAL_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by every memory hook.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Memory CLI binary (name on PATH or absolute path)
    pub cli_bin: String,
    /// Default timeout for memory CLI calls
    pub cli_timeout: Duration,
    /// API key for remote inference; `None` skips the remote tier
    pub api_key: Option<String>,
    pub api_url: String,
    pub api_model: String,
    pub api_max_tokens: u32,
    /// Local inference binary
    pub local_bin: String,
    pub local_model: String,
    pub local_timeout: Duration,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            cli_bin: DEFAULT_CLI_BIN.to_string(),
            cli_timeout: CLI_TIMEOUT,
            api_key: None,
            api_url: API_URL.to_string(),
            api_model: API_MODEL.to_string(),
            api_max_tokens: API_MAX_TOKENS,
            local_bin: LOCAL_BIN.to_string(),
            local_model: LOCAL_MODEL.to_string(),
            local_timeout: LOCAL_TIMEOUT,
        }
    }
}

impl MemoryConfig {
    /// Build configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(bin) = get("FERRIDYN_MEMORY_CLI") {
            config.cli_bin = bin;
        }
        config.api_key = get("ANTHROPIC_API_KEY");
        config
    }

    /// Override the memory CLI binary.
    pub fn with_cli_bin(mut self, bin: impl Into<String>) -> Self {
        self.cli_bin = bin.into();
        self
    }
}
