//! Memory schema: the values that flow between the memory CLI, the model,
//! and the hooks.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// A memory the model wants persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMemory {
    /// Category label (existing or new)
    pub category: String,
    /// Natural language description of the memory
    pub input: String,
}

impl ExtractedMemory {
    /// Build from a loosely-typed JSON value.
    ///
    /// Returns `None` unless both fields are non-empty strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        let category = non_empty_str(value.get("category")?)?;
        let input = non_empty_str(value.get("input")?)?;
        Some(Self {
            category: category.to_string(),
            input: input.to_string(),
        })
    }
}

/// A category judged relevant to a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySelection {
    pub category: String,
}

impl MemorySelection {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        let category = non_empty_str(value.get("category")?)?;
        Some(Self::new(category))
    }
}

/// Scalar attribute value on a recalled memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => AttrValue::Null,
            Value::Bool(b) => AttrValue::Bool(b),
            Value::Number(n) => AttrValue::Number(n),
            Value::String(s) => AttrValue::Text(s),
            // Nested values are kept as their compact JSON text
            nested => AttrValue::Text(nested.to_string()),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Null => write!(f, "null"),
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Number(n) => write!(f, "{}", n),
            AttrValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A record returned by `recall`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryItem {
    pub category: String,
    pub key: String,
    /// Remaining attributes, in the order the CLI emitted them
    pub attributes: Vec<(String, AttrValue)>,
}

impl MemoryItem {
    /// Build from a JSON object; anything else yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };

        let mut category = String::new();
        let mut key = String::new();
        let mut attributes = Vec::with_capacity(map.len());
        for (name, value) in map {
            match name.as_str() {
                "category" => category = scalar_text(value),
                "key" => key = scalar_text(value),
                _ => attributes.push((name, AttrValue::from(value))),
            }
        }

        Some(Self {
            category,
            key,
            attributes,
        })
    }

    /// Key for display; `?` when the CLI gave none.
    pub fn display_key(&self) -> &str {
        if self.key.is_empty() { "?" } else { &self.key }
    }
}

/// Items recalled for one selected category.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryGroup {
    pub category: String,
    pub items: Vec<MemoryItem>,
}

/// Category metadata from `discover`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attribute_count: Option<u64>,
    #[serde(default)]
    pub index_count: Option<u64>,
}

/// Category details from `discover --category`.
///
/// Each field is read on its own: a field with an unexpected shape falls
/// back to its default without discarding the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryDetail {
    #[serde(default, deserialize_with = "lenient")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient")]
    pub keys: Vec<String>,
    #[serde(default)]
    pub schema: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub indexes: Option<Vec<Value>>,
}

impl CategoryDetail {
    pub fn has_schema(&self) -> bool {
        self.schema.as_ref().is_some_and(is_truthy)
    }

    pub fn has_indexes(&self) -> bool {
        self.indexes.as_ref().is_some_and(|i| !i.is_empty())
    }
}

/// Health finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
    Info,
}

/// One health finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthIssue {
    pub severity: IssueSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub issue: String,
}

impl HealthIssue {
    pub fn new(severity: IssueSeverity, issue: impl Into<String>) -> Self {
        Self {
            severity,
            category: None,
            issue: issue.into(),
        }
    }

    pub fn for_category(
        severity: IssueSeverity,
        category: impl Into<String>,
        issue: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: Some(category.into()),
            issue: issue.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryHealth {
    pub name: String,
    pub entries: usize,
    pub has_schema: bool,
    pub has_indexes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub total_categories: usize,
    pub total_entries: usize,
    pub schema_coverage: String,
    pub issues: Vec<HealthIssue>,
    pub categories: Vec<CategoryHealth>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub name: String,
    pub description: String,
    pub attribute_count: u64,
    pub index_count: u64,
    pub entry_count: usize,
    pub sample_keys: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub total_categories: usize,
    pub total_entries: usize,
    pub categories: Vec<CategoryStats>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

fn scalar_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// JSON truthiness: null, false, 0 and "" are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracted_memory_requires_both_fields() {
        assert!(ExtractedMemory::from_value(&json!({"category": "a", "input": "b"})).is_some());
        assert!(ExtractedMemory::from_value(&json!({"category": "a"})).is_none());
        assert!(ExtractedMemory::from_value(&json!({"category": "", "input": "b"})).is_none());
        assert!(ExtractedMemory::from_value(&json!({"category": 3, "input": "b"})).is_none());
        assert!(ExtractedMemory::from_value(&json!("a string")).is_none());
    }

    #[test]
    fn test_memory_item_keeps_attribute_order() {
        let item = MemoryItem::from_value(json!({
            "category": "prefs",
            "key": "editor",
            "tool": "helix",
            "since": 2023,
            "active": true,
            "tags": ["a", "b"]
        }))
        .unwrap();

        assert_eq!(item.category, "prefs");
        assert_eq!(item.key, "editor");
        let names: Vec<&str> = item.attributes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["tool", "since", "active", "tags"]);
        assert_eq!(item.attributes[3].1, AttrValue::Text(r#"["a","b"]"#.into()));
    }

    #[test]
    fn test_memory_item_missing_key() {
        let item = MemoryItem::from_value(json!({"category": "c"})).unwrap();
        assert_eq!(item.display_key(), "?");
        assert!(MemoryItem::from_value(json!([1, 2])).is_none());
    }

    #[test]
    fn test_attr_value_display() {
        assert_eq!(AttrValue::Text("x".into()).to_string(), "x");
        assert_eq!(AttrValue::Bool(false).to_string(), "false");
        assert_eq!(AttrValue::Null.to_string(), "null");
        assert_eq!(AttrValue::from(json!(42)).to_string(), "42");
    }

    #[test]
    fn test_category_detail_flags() {
        let detail: CategoryDetail =
            serde_json::from_value(json!({"category": "c", "keys": [], "schema": {"a": "string"}, "indexes": []}))
                .unwrap();
        assert!(detail.has_schema());
        assert!(!detail.has_indexes());

        let bare: CategoryDetail = serde_json::from_value(json!({"category": "c"})).unwrap();
        assert!(!bare.has_schema());
    }

    #[test]
    fn test_category_detail_odd_siblings_keep_schema() {
        let null_keys: CategoryDetail =
            serde_json::from_value(json!({"category": "c", "keys": null, "schema": {"a": "string"}}))
                .unwrap();
        assert!(null_keys.has_schema());
        assert!(null_keys.keys.is_empty());

        let numeric_keys: CategoryDetail =
            serde_json::from_value(json!({"keys": [1, 2], "schema": {"a": "string"}})).unwrap();
        assert!(numeric_keys.has_schema());

        let object_indexes: CategoryDetail = serde_json::from_value(
            json!({"category": "c", "schema": {"a": "string"}, "indexes": {"by_a": {}}}),
        )
        .unwrap();
        assert!(object_indexes.has_schema());
        assert!(!object_indexes.has_indexes());

        let null_category: CategoryDetail =
            serde_json::from_value(json!({"category": null, "indexes": [{"name": "by_a"}]})).unwrap();
        assert!(null_category.has_indexes());
        assert!(!null_category.has_schema());
    }

    #[test]
    fn test_health_issue_omits_missing_category() {
        let json = serde_json::to_string(&HealthIssue::new(IssueSeverity::Info, "No memories stored yet")).unwrap();
        assert_eq!(json, r#"{"severity":"info","issue":"No memories stored yet"}"#);
    }
}
