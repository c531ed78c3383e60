//! Transcript → memories: the commit (PreCompact) and reflect (Stop) runners.

use super::category_names;
use crate::cli::MemoryStore;
use crate::extract::extract_memories;
use crate::inference::Inference;
use crate::prompts::{PromptTemplate, COMMIT_TEMPLATE, REFLECT_TEMPLATE};
use crate::transcript::{conversation_text, read_tail};
use camino::Utf8Path;
use hook_common::HookInput;
use tracing::{info, warn};

/// How one extraction hook reads, prompts, and bounds its results.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionPlan {
    /// Transcript lines to read from the end
    pub tail_entries: usize,
    pub template: PromptTemplate,
    /// Heading placed before the transcript in the user message
    pub transcript_label: &'static str,
    /// Candidates considered from the model's answer
    pub max_candidates: usize,
    /// Skip the run when another Stop hook is already active
    pub honors_stop_guard: bool,
    /// Plural noun used in log lines
    pub noun: &'static str,
}

/// Before compaction: granular facts from the recent transcript.
pub const COMMIT: ExtractionPlan = ExtractionPlan {
    tail_entries: 50,
    template: COMMIT_TEMPLATE,
    transcript_label: "Conversation transcript",
    max_candidates: 10,
    honors_stop_guard: false,
    noun: "memories",
};

/// At session end: fewer, higher-level learnings from a longer window.
pub const REFLECT: ExtractionPlan = ExtractionPlan {
    tail_entries: 100,
    template: REFLECT_TEMPLATE,
    transcript_label: "Session transcript",
    max_candidates: 5,
    honors_stop_guard: true,
    noun: "reflections",
};

/// Why a run ended before asking the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    StopHookActive,
    NoTranscriptPath,
    EmptyTranscript,
    NoConversationText,
}

/// How an extraction run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Skipped(SkipReason),
    /// The model was unavailable or returned no usable candidates
    NothingExtracted,
    Stored { stored: usize, attempted: usize },
}

/// Run one extraction hook end to end.
///
/// Never fails: store errors are logged per candidate and the rest carry on.
pub fn run_extraction(
    plan: &ExtractionPlan,
    input: &HookInput,
    store: &dyn MemoryStore,
    inference: &Inference,
) -> ExtractionOutcome {
    if plan.honors_stop_guard && input.stop_hook_active {
        return ExtractionOutcome::Skipped(SkipReason::StopHookActive);
    }

    let Some(transcript_path) = input.get_transcript_path() else {
        return ExtractionOutcome::Skipped(SkipReason::NoTranscriptPath);
    };

    let entries = read_tail(Utf8Path::new(transcript_path), plan.tail_entries);
    if entries.is_empty() {
        return ExtractionOutcome::Skipped(SkipReason::EmptyTranscript);
    }

    let categories = category_names(store);

    let conversation = conversation_text(&entries);
    if conversation.trim().is_empty() {
        return ExtractionOutcome::Skipped(SkipReason::NoConversationText);
    }

    let system_prompt = plan.template.render(&categories);
    let user_message = format!("{}:\n{}", plan.transcript_label, conversation);

    let response = inference
        .infer(&system_prompt, &user_message)
        .unwrap_or_default();
    let memories = extract_memories(&response, plan.max_candidates);

    if memories.is_empty() {
        info!("no {} extracted", plan.noun);
        return ExtractionOutcome::NothingExtracted;
    }

    let mut stored = 0;
    for memory in &memories {
        match store.remember(&memory.category, &memory.input) {
            Ok(()) => stored += 1,
            Err(err) => warn!("failed to store in {}: {}", memory.category, err),
        }
    }

    info!("stored {} {}", stored, plan.noun);
    ExtractionOutcome::Stored {
        stored,
        attempted: memories.len(),
    }
}
