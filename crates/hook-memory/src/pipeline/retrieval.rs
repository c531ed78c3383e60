//! Prompt → relevant memories (UserPromptSubmit).

use crate::cli::MemoryStore;
use crate::extract::extract_selections;
use crate::inference::Inference;
use crate::prompts::{MEMORY_PROTOCOL, RETRIEVAL_PROMPT};
use crate::schema::{CategoryDescriptor, MemoryGroup, MemoryItem, MemorySelection};
use hook_common::{HookInput, HookOutput};
use tracing::debug;

/// Categories recalled per prompt.
pub const MAX_SELECTIONS: usize = 5;

/// Items recalled per selected category.
pub const RECALL_LIMIT: usize = 10;

/// Build the context injection for a prompt.
///
/// `None` when there is no prompt. Otherwise the output always carries the
/// memory protocol, preceded by any memories that could be recalled.
pub fn run_retrieval(
    input: &HookInput,
    store: &dyn MemoryStore,
    inference: &Inference,
) -> Option<HookOutput> {
    let prompt = input.get_prompt()?;

    let groups = match store.discover() {
        Ok(categories) if !categories.is_empty() => {
            let selections = select_categories(prompt, &categories, inference);
            fetch_groups(store, &selections)
        }
        Ok(_) => Vec::new(),
        Err(err) => {
            debug!(error = %err, "memory CLI unavailable, protocol only");
            Vec::new()
        }
    };

    debug!(groups = groups.len(), "retrieval finished");
    Some(HookOutput::user_prompt_submit().with_context(build_context(&groups)))
}

/// One line per category: `- name: description`.
pub fn memory_index(categories: &[CategoryDescriptor]) -> String {
    categories
        .iter()
        .map(|c| {
            let description = c
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or("(no description)");
            format!("- {}: {}", c.name, description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ask the model which categories matter; fall back to the first few.
pub fn select_categories(
    prompt: &str,
    categories: &[CategoryDescriptor],
    inference: &Inference,
) -> Vec<MemorySelection> {
    let user_message = format!(
        "Memory index:\n{}\n\nUser prompt:\n{}",
        memory_index(categories),
        prompt
    );

    let response = inference
        .infer(RETRIEVAL_PROMPT, &user_message)
        .unwrap_or_default();
    let selections = extract_selections(&response, MAX_SELECTIONS);

    if selections.is_empty() {
        debug!("no selections from model, using first categories");
        return categories
            .iter()
            .take(MAX_SELECTIONS)
            .map(|c| MemorySelection::new(c.name.clone()))
            .collect();
    }
    selections
}

/// Recall each selection, skipping failures and empty results.
pub fn fetch_groups(store: &dyn MemoryStore, selections: &[MemorySelection]) -> Vec<MemoryGroup> {
    selections
        .iter()
        .take(MAX_SELECTIONS)
        .filter_map(|selection| match store.recall(&selection.category, RECALL_LIMIT) {
            Ok(items) if !items.is_empty() => Some(MemoryGroup {
                category: selection.category.clone(),
                items,
            }),
            Ok(_) => None,
            Err(err) => {
                debug!(category = %selection.category, error = %err, "recall failed");
                None
            }
        })
        .collect()
}

fn render_item(item: &MemoryItem) -> String {
    let attrs = item
        .attributes
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join(", ");
    let attrs = if attrs.is_empty() { "(empty)".to_string() } else { attrs };
    format!("  - [{}]: {}", item.display_key(), attrs)
}

/// `## category` followed by one line per item.
pub fn render_group(group: &MemoryGroup) -> String {
    let entries = group
        .items
        .iter()
        .map(render_item)
        .collect::<Vec<_>>()
        .join("\n");
    format!("## {}\n{}", group.category, entries)
}

/// Recalled memories (if any) followed by the protocol.
pub fn build_context(groups: &[MemoryGroup]) -> String {
    if groups.is_empty() {
        return MEMORY_PROTOCOL.to_string();
    }
    let parts = groups.iter().map(render_group).collect::<Vec<_>>();
    format!(
        "# Recalled Memories\n\n{}\n\n{}",
        parts.join("\n\n"),
        MEMORY_PROTOCOL
    )
}
