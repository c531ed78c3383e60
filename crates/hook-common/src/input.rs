//! Hook input parsing from stdin.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::io::{self, Read};

/// Trigger payload received from Claude Code.
///
/// Every field is optional; each hook only looks at the ones its event
/// carries. Unknown fields land in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookInput {
    /// Session ID
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,

    /// Path to the session transcript (JSONL)
    #[serde(default, alias = "transcriptPath")]
    pub transcript_path: Option<String>,

    /// Working directory of the session
    #[serde(default)]
    pub cwd: Option<String>,

    /// Permission mode the session runs under
    #[serde(default, alias = "permissionMode")]
    pub permission_mode: Option<String>,

    /// Hook event name (e.g., "PreCompact", "Stop", "UserPromptSubmit")
    #[serde(default, alias = "hookEventName")]
    pub hook_event_name: Option<String>,

    /// User prompt (for UserPromptSubmit hooks)
    #[serde(default)]
    pub prompt: Option<String>,

    /// Set when another Stop hook is already running
    #[serde(default, alias = "stopHookActive", deserialize_with = "truthy_flag")]
    pub stop_hook_active: bool,

    /// Additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl HookInput {
    /// Read and parse hook input from stdin.
    ///
    /// Empty stdin yields the default input, so a hook run by hand with no
    /// payload simply finds nothing to do.
    pub fn from_stdin() -> anyhow::Result<Self> {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        Self::parse(&input)
    }

    /// Parse hook input from a JSON string.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let parsed: HookInput = serde_json::from_str(raw)?;
        Ok(parsed)
    }

    /// Get the transcript path, ignoring empty strings.
    pub fn get_transcript_path(&self) -> Option<&str> {
        self.transcript_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Get the user prompt, ignoring empty strings.
    pub fn get_prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.is_empty())
    }
}

/// Read a flag the way the host's JSON is meant: null, false, 0 and ""
/// are off, anything else is on.
fn truthy_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}
