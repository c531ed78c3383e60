//! Two-tier model inference.
//!
//! The Messages API is tried first when a key is configured, then the local
//! `claude` binary. Running out of strategies is a normal outcome: callers
//! get `None` and carry on without the model.

use crate::config::MemoryConfig;
use crate::error::{HookError, Result};
use hook_common::run_with_timeout;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// One way of getting a completion for a (system, user) prompt pair.
pub trait InferenceStrategy {
    /// Name for logging.
    fn name(&self) -> &str;

    /// Produce a completion. `Ok(None)` means the call worked but returned
    /// no usable text.
    fn complete(&self, system_prompt: &str, user_message: &str) -> Result<Option<String>>;
}

/// Ordered list of strategies, tried until one yields text.
pub struct Inference {
    strategies: Vec<Box<dyn InferenceStrategy>>,
}

impl Inference {
    pub fn new(strategies: Vec<Box<dyn InferenceStrategy>>) -> Self {
        Self { strategies }
    }

    /// API first (only with a key), local binary second.
    pub fn from_config(config: &MemoryConfig) -> Self {
        let mut strategies: Vec<Box<dyn InferenceStrategy>> = Vec::new();
        if let Some(api) = AnthropicApi::from_config(config) {
            strategies.push(Box::new(api));
        }
        strategies.push(Box::new(ClaudeCli::from_config(config)));
        Self::new(strategies)
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// First non-empty completion, or `None` when every strategy fails.
    pub fn infer(&self, system_prompt: &str, user_message: &str) -> Option<String> {
        for strategy in &self.strategies {
            match strategy.complete(system_prompt, user_message) {
                Ok(Some(text)) if !text.trim().is_empty() => {
                    debug!(strategy = strategy.name(), len = text.len(), "inference succeeded");
                    return Some(text);
                }
                Ok(_) => debug!(strategy = strategy.name(), "inference returned no text"),
                Err(err) => debug!(strategy = strategy.name(), error = %err, "inference failed"),
            }
        }
        debug!("all inference strategies exhausted");
        None
    }
}

/// Remote inference through the Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicApi {
    api_key: String,
    url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicApi {
    /// `None` when no API key is configured.
    pub fn from_config(config: &MemoryConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(Self {
            api_key,
            url: config.api_url.clone(),
            model: config.api_model.clone(),
            max_tokens: config.api_max_tokens,
        })
    }

    fn payload(&self, system_prompt: &str, user_message: &str) -> Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": system_prompt,
            "messages": [
                {
                    "role": "user",
                    "content": user_message
                }
            ]
        })
    }
}

impl InferenceStrategy for AnthropicApi {
    fn name(&self) -> &str {
        "anthropic-api"
    }

    fn complete(&self, system_prompt: &str, user_message: &str) -> Result<Option<String>> {
        let client = Client::new();
        let response = client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", crate::config::API_VERSION)
            .json(&self.payload(system_prompt, user_message))
            .send()
            .map_err(|e| HookError::Inference(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HookError::Inference(format!(
                "messages API returned status {}",
                response.status()
            )));
        }

        let json: Value = response
            .json()
            .map_err(|e| HookError::Inference(e.to_string()))?;
        Ok(response_text(&json))
    }
}

/// Text of the first content block of a Messages API response.
pub fn response_text(json: &Value) -> Option<String> {
    json.get("content")?
        .as_array()?
        .first()?
        .get("text")?
        .as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Local inference through the `claude` binary in print mode.
#[derive(Debug, Clone)]
pub struct ClaudeCli {
    bin: String,
    model: String,
    timeout: Duration,
}

impl ClaudeCli {
    pub fn new(bin: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            model: model.into(),
            timeout,
        }
    }

    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::new(
            config.local_bin.clone(),
            config.local_model.clone(),
            config.local_timeout,
        )
    }
}

impl InferenceStrategy for ClaudeCli {
    fn name(&self) -> &str {
        "claude-cli"
    }

    fn complete(&self, system_prompt: &str, user_message: &str) -> Result<Option<String>> {
        let prompt = format!("{}\n\n{}", system_prompt, user_message);
        let args = ["-p", "--model", self.model.as_str(), "--no-input"];

        let result = run_with_timeout(&self.bin, args, Some(&prompt), self.timeout)
            .map_err(|err| HookError::Inference(err.to_string()))?;

        if !result.success {
            return Err(HookError::Inference(format!(
                "{} exited with status {:?}: {}",
                self.bin,
                result.exit_code,
                result.stderr.trim()
            )));
        }

        let text = result.stdout.trim();
        Ok((!text.is_empty()).then(|| text.to_string()))
    }
}
