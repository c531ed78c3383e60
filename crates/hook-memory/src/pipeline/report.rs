//! Stats and health reports over the whole store.

use crate::cli::MemoryStore;
use crate::schema::{
    CategoryHealth, CategoryStats, HealthIssue, HealthReport, IssueSeverity, StatsReport,
};
use tracing::debug;

/// Upper bound on items recalled when counting a category.
pub const COUNT_LIMIT: usize = 1000;

/// Keys listed per category in the stats report.
pub const SAMPLE_KEYS: usize = 5;

/// Entry count above which a category is reported as large.
pub const LARGE_CATEGORY: usize = 100;

/// Per-category counts and sample keys.
///
/// A store that cannot be reached yields an empty report.
pub fn build_stats(store: &dyn MemoryStore) -> StatsReport {
    let categories = match store.discover() {
        Ok(categories) => categories,
        Err(err) => {
            debug!(error = %err, "discovery failed");
            return StatsReport::default();
        }
    };

    let mut report = StatsReport {
        total_categories: categories.len(),
        ..StatsReport::default()
    };

    for category in categories {
        let (entry_count, sample_keys) = match store.recall(&category.name, COUNT_LIMIT) {
            Ok(items) => {
                let keys = items
                    .iter()
                    .take(SAMPLE_KEYS)
                    .filter(|item| !item.key.is_empty())
                    .map(|item| item.key.clone())
                    .collect();
                (items.len(), keys)
            }
            Err(err) => {
                debug!(category = %category.name, error = %err, "count failed");
                (0, Vec::new())
            }
        };

        report.total_entries += entry_count;
        report.categories.push(CategoryStats {
            name: category.name,
            description: category.description.unwrap_or_default(),
            attribute_count: category.attribute_count.unwrap_or(0),
            index_count: category.index_count.unwrap_or(0),
            entry_count,
            sample_keys,
        });
    }

    report
}

/// Schema coverage, counts and findings for every category.
pub fn build_health(store: &dyn MemoryStore) -> HealthReport {
    let categories = match store.discover() {
        Ok(categories) => categories,
        Err(err) => {
            debug!(error = %err, "discovery failed");
            return empty_health(HealthIssue::new(
                IssueSeverity::Error,
                "Cannot connect to memory system (CLI unavailable)",
            ));
        }
    };

    if categories.is_empty() {
        return empty_health(HealthIssue::new(
            IssueSeverity::Info,
            "No memories stored yet",
        ));
    }

    let mut issues = Vec::new();
    let mut details = Vec::with_capacity(categories.len());
    let mut total_entries = 0;
    let mut schemas_found = 0;

    for category in &categories {
        let name = category.name.as_str();

        let (has_schema, has_indexes) = match store.describe(name) {
            Ok(detail) => (detail.has_schema(), detail.has_indexes()),
            Err(_) => {
                issues.push(HealthIssue::for_category(
                    IssueSeverity::Warning,
                    name,
                    "Failed to discover category details",
                ));
                (false, false)
            }
        };
        if has_schema {
            schemas_found += 1;
        }

        let entries = match store.recall(name, COUNT_LIMIT) {
            Ok(items) => items.len(),
            Err(_) => {
                issues.push(HealthIssue::for_category(
                    IssueSeverity::Warning,
                    name,
                    "Failed to count entries",
                ));
                0
            }
        };
        total_entries += entries;

        if !has_schema {
            issues.push(HealthIssue::for_category(
                IssueSeverity::Warning,
                name,
                "No schema defined",
            ));
        }
        if entries == 0 {
            issues.push(HealthIssue::for_category(
                IssueSeverity::Info,
                name,
                "Empty category (no entries)",
            ));
        }
        if entries > LARGE_CATEGORY {
            issues.push(HealthIssue::for_category(
                IssueSeverity::Info,
                name,
                format!("Large category: {} entries", entries),
            ));
        }

        details.push(CategoryHealth {
            name: name.to_string(),
            entries,
            has_schema,
            has_indexes,
        });
    }

    HealthReport {
        total_categories: categories.len(),
        total_entries,
        schema_coverage: schema_coverage(schemas_found, categories.len()),
        issues,
        categories: details,
    }
}

fn empty_health(issue: HealthIssue) -> HealthReport {
    HealthReport {
        total_categories: 0,
        total_entries: 0,
        schema_coverage: "0/0".to_string(),
        issues: vec![issue],
        categories: Vec::new(),
    }
}

/// `found/total (pct%)`, or `0/0` when there is nothing to cover.
pub fn schema_coverage(found: usize, total: usize) -> String {
    if total == 0 {
        return "0/0".to_string();
    }
    let percent = (found as f64 / total as f64 * 100.0).round() as u64;
    format!("{}/{} ({}%)", found, total, percent)
}
