//! Reading the tail of a session transcript (JSONL).

use camino::Utf8Path;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use tracing::debug;

/// Characters of each message kept when rendering a transcript for a prompt.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEntry {
    /// A line that parsed as a JSON object
    Record(TranscriptRecord),
    /// A line that did not, kept verbatim
    Raw(String),
}

/// Fields of a transcript record the hooks care about.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TranscriptRecord {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<TranscriptMessage>,
}

/// Wrapped message inside a `{"type": "message", "message": {...}}` record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TranscriptMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
}

impl TranscriptEntry {
    /// Parse one line; anything that is not a record becomes `Raw`.
    pub fn parse(line: &str) -> Self {
        match serde_json::from_str::<TranscriptRecord>(line) {
            Ok(record) => TranscriptEntry::Record(record),
            Err(_) => TranscriptEntry::Raw(line.to_string()),
        }
    }

    /// Render as `[role]: text` for a prompt, or `None` when the entry
    /// carries no conversation text.
    pub fn render(&self) -> Option<String> {
        let TranscriptEntry::Record(record) = self else {
            return None;
        };

        if let (Some(role), Some(content)) = (&record.role, &record.content) {
            if !role.is_empty() && crate::schema::is_truthy(content) {
                return Some(format!("[{}]: {}", role, content_text(content)));
            }
        }

        let wrapped = matches!(
            record.kind.as_deref(),
            Some("message") | Some("user") | Some("assistant")
        );
        if wrapped {
            if let Some(message) = &record.message {
                let role = message
                    .role
                    .as_deref()
                    .filter(|r| !r.is_empty())
                    .unwrap_or("unknown");
                let content = message.content.as_ref()?;
                return Some(format!("[{}]: {}", role, content_text(content)));
            }
        }

        None
    }
}

/// Content as text: strings as-is, anything else as compact JSON, cut to
/// [`MAX_MESSAGE_CHARS`] characters.
fn content_text(content: &Value) -> String {
    let text = match content {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    text.chars().take(MAX_MESSAGE_CHARS).collect()
}

/// Read the last `max_entries` non-blank lines of a transcript.
///
/// An unreadable file is treated as an empty transcript.
pub fn read_tail(path: &Utf8Path, max_entries: usize) -> Vec<TranscriptEntry> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!(path = %path, error = %e, "transcript not readable");
            return Vec::new();
        }
    };

    let lines: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    let start = lines.len().saturating_sub(max_entries);

    lines[start..]
        .iter()
        .map(|line| TranscriptEntry::parse(line))
        .collect()
}

/// Conversation text for a prompt: one rendered line per entry.
pub fn conversation_text(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .filter_map(TranscriptEntry::render)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_transcript(dir: &TempDir, lines: &[&str]) -> Utf8PathBuf {
        let path = dir.path().join("transcript.jsonl");
        let mut file = fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        Utf8PathBuf::from_path_buf(path).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("nope.jsonl")).unwrap();
        assert!(read_tail(&path, 50).is_empty());
    }

    #[test]
    fn test_malformed_line_becomes_raw() {
        let dir = TempDir::new().unwrap();
        let path = write_transcript(&dir, &[r#"{"role": "user", "content": "hi"}"#, "not json {"]);

        let entries = read_tail(&path, 50);
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[0], TranscriptEntry::Record(_)));
        assert_eq!(entries[1], TranscriptEntry::Raw("not json {".into()));
    }

    #[test]
    fn test_keeps_last_n_in_order() {
        let dir = TempDir::new().unwrap();
        let lines: Vec<String> = (0..10)
            .map(|i| format!(r#"{{"role": "user", "content": "m{}"}}"#, i))
            .collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let path = write_transcript(&dir, &refs);

        let entries = read_tail(&path, 3);
        let rendered: Vec<String> = entries.iter().filter_map(TranscriptEntry::render).collect();
        assert_eq!(rendered, ["[user]: m7", "[user]: m8", "[user]: m9"]);

        assert!(read_tail(&path, 0).is_empty());
        assert_eq!(read_tail(&path, 100).len(), 10);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_transcript(&dir, &["", "  ", r#"{"role": "user", "content": "x"}"#, ""]);
        assert_eq!(read_tail(&path, 50).len(), 1);
    }

    #[test]
    fn test_non_object_json_is_raw() {
        assert_eq!(TranscriptEntry::parse("42"), TranscriptEntry::Raw("42".into()));
    }

    #[test]
    fn test_render_wrapped_message() {
        let entry = TranscriptEntry::parse(
            r#"{"type": "message", "message": {"role": "assistant", "content": [{"type": "text", "text": "done"}]}}"#,
        );
        assert_eq!(
            entry.render().as_deref(),
            Some(r#"[assistant]: [{"type":"text","text":"done"}]"#)
        );

        let host_shape =
            TranscriptEntry::parse(r#"{"type": "user", "message": {"content": "fix the build"}}"#);
        assert_eq!(host_shape.render().as_deref(), Some("[unknown]: fix the build"));
    }

    #[test]
    fn test_render_skips_non_conversation() {
        assert_eq!(TranscriptEntry::Raw("x".into()).render(), None);
        assert_eq!(TranscriptEntry::parse(r#"{"type": "summary"}"#).render(), None);
        assert_eq!(TranscriptEntry::parse(r#"{"role": "user", "content": ""}"#).render(), None);
        assert_eq!(
            TranscriptEntry::parse(r#"{"type": "message", "message": {"role": "user"}}"#).render(),
            None
        );
    }

    #[test]
    fn test_render_truncates_long_content() {
        let long = "é".repeat(MAX_MESSAGE_CHARS + 50);
        let line = serde_json::json!({"role": "user", "content": long}).to_string();
        let rendered = TranscriptEntry::parse(&line).render().unwrap();
        assert_eq!(rendered.chars().count(), "[user]: ".len() + MAX_MESSAGE_CHARS);
    }

    #[test]
    fn test_conversation_text_joins_lines() {
        let entries = vec![
            TranscriptEntry::parse(r#"{"role": "user", "content": "a"}"#),
            TranscriptEntry::Raw("junk".into()),
            TranscriptEntry::parse(r#"{"role": "assistant", "content": "b"}"#),
        ];
        assert_eq!(conversation_text(&entries), "[user]: a\n[assistant]: b");
    }
}
