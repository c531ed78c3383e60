//! Pull JSON out of free-form model output.
//!
//! Models wrap JSON in prose and code fences often enough that a plain
//! `serde_json::from_str` is not enough. Strategies run in order and the
//! first one that parses wins.

use crate::schema::{ExtractedMemory, MemorySelection};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

fn fence_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*\n?(.*?)\n?```").ok())
        .as_ref()
}

fn span_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)[\[{].*[}\]]").ok())
        .as_ref()
}

/// Extract a JSON value from text.
///
/// Tries the whole text, then the first fenced block, then the widest
/// bracketed span. Returns `None` if nothing parses.
pub fn extract_json(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }

    if let Some(captures) = fence_regex().and_then(|re| re.captures(text)) {
        if let Some(inner) = captures.get(1) {
            if let Ok(value) = serde_json::from_str(inner.as_str()) {
                return Some(value);
            }
        }
    }

    if let Some(span) = span_regex().and_then(|re| re.find(text)) {
        if let Ok(value) = serde_json::from_str(span.as_str()) {
            return Some(value);
        }
    }

    debug!(len = text.len(), "no JSON found in model output");
    None
}

/// Memories to store from model output.
///
/// Only the first `cap` array elements are considered; elements without a
/// non-empty `category` and `input` are dropped.
pub fn extract_memories(text: &str, cap: usize) -> Vec<ExtractedMemory> {
    candidates(text, cap)
        .iter()
        .filter_map(ExtractedMemory::from_value)
        .collect()
}

/// Category selections from model output, bounded and validated like
/// [`extract_memories`].
pub fn extract_selections(text: &str, cap: usize) -> Vec<MemorySelection> {
    candidates(text, cap)
        .iter()
        .filter_map(MemorySelection::from_value)
        .collect()
}

fn candidates(text: &str, cap: usize) -> Vec<Value> {
    match extract_json(text) {
        Some(Value::Array(items)) => items.into_iter().take(cap).collect(),
        _ => Vec::new(),
    }
}
