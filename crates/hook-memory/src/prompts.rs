//! Prompt templates and the static memory protocol text.

/// A system prompt with a placeholder for the known category names.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub system: &'static str,
    pub placeholder: &'static str,
}

impl PromptTemplate {
    /// Substitute the category list into the template.
    pub fn render(&self, categories: &[String]) -> String {
        let list = if categories.is_empty() {
            "(none yet)".to_string()
        } else {
            categories.join(", ")
        };
        self.system.replacen(self.placeholder, &list, 1)
    }
}

pub const CATEGORY_PLACEHOLDER: &str = "{categories}";

pub const COMMIT_TEMPLATE: PromptTemplate = PromptTemplate {
    system: COMMIT_PROMPT,
    placeholder: CATEGORY_PLACEHOLDER,
};

pub const REFLECT_TEMPLATE: PromptTemplate = PromptTemplate {
    system: REFLECT_PROMPT,
    placeholder: CATEGORY_PLACEHOLDER,
};

const COMMIT_PROMPT: &str = r#"You are a memory extraction assistant. Given a conversation transcript, extract the most important learnings, decisions, and facts that should be remembered for future sessions.

Existing memory categories: {categories}

Return a JSON array of memory entries to store:
[
  {
    "category": "category-name",
    "input": "Natural language description of the memory"
  }
]

Guidelines:
- Use existing categories when appropriate, or let the system infer one.
- "input" should be a natural language sentence describing the memory.
- The system will automatically extract structured attributes and generate a key.
- Focus on: architecture decisions, user preferences, bug fixes, learned patterns, project-specific knowledge.
- Skip: trivial exchanges, greetings, status updates.
- Return an empty array [] if nothing worth remembering.
- Maximum 10 entries."#;

const REFLECT_PROMPT: &str = r#"You are a session reflection assistant. Given a conversation transcript, extract the most important HIGH-LEVEL learnings that should be remembered for future sessions.

Focus on:
- Architectural and design decisions made (with rationale)
- User preferences and workflow patterns revealed
- Project conventions discovered or established
- Non-obvious gotchas or patterns that future sessions should know
- Bug patterns and their root causes

Do NOT extract:
- Granular facts (those are handled by the commit hook)
- Step-by-step task progress
- Trivial exchanges or status updates
- Information that's already in CLAUDE.md or AGENTS.md

Existing memory categories: {categories}

Return a JSON array of memory entries to store:
[
  {
    "category": "category-name",
    "input": "Natural language description — include the WHY, not just the WHAT"
  }
]

Maximum 5 entries. Quality over quantity. Return [] if nothing worth reflecting on."#;

pub const RETRIEVAL_PROMPT: &str = r#"You are a memory retrieval assistant. Given a user prompt and a memory index, select which memory categories are most relevant to the prompt.

Return a JSON array of objects: [{"category": "..."}]
- Return an empty array [] if no memories are relevant.
- Be selective: only return categories that are clearly related to the prompt.
- Maximum 5 entries."#;

/// Usage instructions appended to every retrieval context.
pub const MEMORY_PROTOCOL: &str = r#"# Memory Protocol

You have access to persistent memory via the fmemory CLI. Use it proactively:

**COMMIT** — Run `fmemory remember` when:
- You make or discuss a significant decision (architecture, technology, design)
- You learn something important about the project, codebase, or user preferences
- The user says "remember that...", "note that...", "keep in mind...", or "from now on..."
- You fix a tricky bug (store the pattern and fix)
- You discover a convention, gotcha, or non-obvious behavior
- Syntax: `fmemory remember --category <cat> "Natural language description"`
- Or let the system infer the category: `fmemory remember "Natural language description"`
- Or use `fmemory -p "Natural language"` for intent-classified prompt mode

**RETRIEVE** — Run `fmemory recall --query "..."` when:
- You're starting complex work and need background context
- You need to know project conventions, architecture decisions, or user preferences
- The user asks about something that might be stored in memory
- You're making a decision that might conflict with a previous one

**ASK & STORE** — When you expect information to be in memory but it's missing:
- Ask the user for the information
- Store their answer so future sessions have it

**CORRECT** — Run `fmemory forget` then `fmemory remember` when:
- Stored information contradicts what you now know
- The user corrects previously stored information
- Project structure has changed (after refactors, renames, upgrades)

Available skills: /ferridyn-memory:teach, /ferridyn-memory:reflect, /ferridyn-memory:context, /ferridyn-memory:update, /ferridyn-memory:decide, /ferridyn-memory:status"#;
