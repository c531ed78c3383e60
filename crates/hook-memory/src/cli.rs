//! Client for the `fmemory` CLI.

use crate::config::MemoryConfig;
use crate::error::{HookError, Result};
use crate::schema::{CategoryDescriptor, CategoryDetail, MemoryItem};
use hook_common::run_with_timeout;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Output of a CLI call: JSON when stdout parses, trimmed text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum CliOutput {
    Json(Value),
    Text(String),
}

impl CliOutput {
    /// Decode captured stdout.
    pub fn parse(stdout: &str) -> Self {
        match serde_json::from_str(stdout) {
            Ok(value) => CliOutput::Json(value),
            Err(_) => CliOutput::Text(stdout.trim().to_string()),
        }
    }

    /// Elements of a JSON array; anything else is empty.
    pub fn into_array(self) -> Vec<Value> {
        match self {
            CliOutput::Json(Value::Array(items)) => items,
            _ => Vec::new(),
        }
    }
}

/// Operations the hooks need from the memory store.
pub trait MemoryStore {
    /// List categories with their metadata.
    fn discover(&self) -> Result<Vec<CategoryDescriptor>>;

    /// Keys, schema, and indexes for one category.
    fn describe(&self, category: &str) -> Result<CategoryDetail>;

    /// Fetch up to `limit` items from a category.
    fn recall(&self, category: &str, limit: usize) -> Result<Vec<MemoryItem>>;

    /// Store a natural language memory in a category.
    fn remember(&self, category: &str, text: &str) -> Result<()>;
}

/// `MemoryStore` backed by the memory CLI binary.
#[derive(Debug, Clone)]
pub struct MemoryCli {
    bin: String,
    timeout: Duration,
}

impl MemoryCli {
    pub fn new(bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            timeout,
        }
    }

    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::new(config.cli_bin.clone(), config.cli_timeout)
    }

    pub fn bin(&self) -> &str {
        &self.bin
    }

    /// Run `<bin> --json <args...>`.
    pub fn invoke(&self, args: &[&str], timeout: Duration) -> Result<CliOutput> {
        debug!(bin = %self.bin, ?args, "invoking memory CLI");

        let mut full_args = Vec::with_capacity(args.len() + 1);
        full_args.push("--json");
        full_args.extend_from_slice(args);

        let result = run_with_timeout(&self.bin, full_args, None, timeout)
            .map_err(|err| HookError::from_subprocess(&self.bin, err))?;

        if !result.success {
            let message = match result.exit_code {
                Some(code) => format!("exited with status {}", code),
                None => "terminated by signal".to_string(),
            };
            return Err(HookError::ExternalTool {
                program: self.bin.clone(),
                message,
                stderr: result.stderr.trim().to_string(),
            });
        }

        Ok(CliOutput::parse(&result.stdout))
    }

    fn run(&self, args: &[&str]) -> Result<CliOutput> {
        self.invoke(args, self.timeout)
    }
}

impl MemoryStore for MemoryCli {
    fn discover(&self) -> Result<Vec<CategoryDescriptor>> {
        let items = self.run(&["discover"])?.into_array();
        Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect())
    }

    fn describe(&self, category: &str) -> Result<CategoryDetail> {
        let detail = match self.run(&["discover", "--category", category])? {
            CliOutput::Json(value) => serde_json::from_value(value).unwrap_or_default(),
            CliOutput::Text(_) => CategoryDetail::default(),
        };
        Ok(detail)
    }

    fn recall(&self, category: &str, limit: usize) -> Result<Vec<MemoryItem>> {
        let limit = limit.to_string();
        let items = self
            .run(&["recall", "--category", category, "--limit", &limit])?
            .into_array();
        // Non-object entries still count; they come back as bare items
        Ok(items
            .into_iter()
            .map(|item| MemoryItem::from_value(item).unwrap_or_default())
            .collect())
    }

    fn remember(&self, category: &str, text: &str) -> Result<()> {
        self.run(&["remember", "--category", category, text])?;
        Ok(())
    }
}
