use assert_cmd::Command;
use predicates::prelude::*;

fn hook() -> Command {
    let mut cmd = Command::cargo_bin("memory-retrieval").unwrap();
    cmd.env("FERRIDYN_MEMORY_CLI", "nonexistent_fmemory_12345")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("CLAUDE_HOOK_DEBUG");
    cmd
}

#[test]
fn unreachable_store_injects_protocol_only() {
    let output = hook()
        .write_stdin(r#"{"prompt": "how do we deploy?"}"#)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let specific = &json["hookSpecificOutput"];
    assert_eq!(specific["hookEventName"], "UserPromptSubmit");

    let context = specific["additionalContext"].as_str().unwrap();
    assert!(context.starts_with("# Memory Protocol"));
    assert!(!context.contains("# Recalled Memories"));
}

#[test]
fn no_prompt_no_output() {
    hook()
        .write_stdin(r#"{"session_id": "s1"}"#)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[cfg(unix)]
mod with_fake_tools {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const PROMPT: &str = "how should I indent this file?";

    fn script(path: &Path, body: &str) {
        fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Fake `fmemory` with two categories that logs its argv to
    /// `calls.log`, plus a fake `claude` that saves the prompt and answers
    /// with `answer`.
    fn tools(dir: &TempDir, answer: &str) -> (PathBuf, PathBuf) {
        let log = dir.path().join("calls.log");
        let fmemory = dir.path().join("fmemory");
        script(
            &fmemory,
            &format!(
                r#"printf '%s\n' "$*" >> '{log}'
case "$2" in
  discover)
    echo '[{{"name": "prefs", "description": "User preferences"}}, {{"name": "arch"}}]'
    ;;
  recall)
    if [ "$4" = "prefs" ]; then
      echo '[{{"category": "prefs", "key": "indent", "style": "tabs", "width": 4}}]'
    else
      echo '[]'
    fi
    ;;
  *) exit 1 ;;
esac"#,
                log = log.display()
            ),
        );

        let bin_dir = dir.path().join("bin");
        fs::create_dir(&bin_dir).unwrap();
        script(
            &bin_dir.join("claude"),
            &format!(
                "cat > '{}'\necho '{}'",
                dir.path().join("prompt.txt").display(),
                answer
            ),
        );
        (fmemory, bin_dir)
    }

    fn path_with(bin_dir: &Path) -> std::ffi::OsString {
        let mut paths = vec![bin_dir.to_path_buf()];
        if let Some(existing) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&existing));
        }
        std::env::join_paths(paths).unwrap()
    }

    fn context(dir: &TempDir, answer: &str) -> String {
        let (fmemory, bin_dir) = tools(dir, answer);
        let output = hook()
            .env("FERRIDYN_MEMORY_CLI", &fmemory)
            .env("PATH", path_with(&bin_dir))
            .write_stdin(serde_json::json!({"prompt": PROMPT}).to_string())
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        json["hookSpecificOutput"]["additionalContext"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn recalled_memories_precede_the_protocol() {
        let dir = TempDir::new().unwrap();
        let context = context(&dir, r#"[{"category": "prefs"}]"#);

        assert!(context.starts_with(
            "# Recalled Memories\n\n## prefs\n  - [indent]: style: tabs, width: 4\n\n# Memory Protocol\n"
        ));

        let calls = fs::read_to_string(dir.path().join("calls.log")).unwrap();
        assert_eq!(
            calls,
            "--json discover\n--json recall --category prefs --limit 10\n"
        );

        let prompt = fs::read_to_string(dir.path().join("prompt.txt")).unwrap();
        assert!(prompt.contains(&format!(
            "Memory index:\n- prefs: User preferences\n- arch: (no description)\n\nUser prompt:\n{}",
            PROMPT
        )));
    }

    #[test]
    fn unusable_selection_falls_back_to_every_category() {
        let dir = TempDir::new().unwrap();
        let context = context(&dir, "nothing relevant here");

        assert!(context.starts_with("# Recalled Memories\n\n## prefs\n"));
        assert!(!context.contains("## arch"));

        let calls = fs::read_to_string(dir.path().join("calls.log")).unwrap();
        assert_eq!(
            calls,
            concat!(
                "--json discover\n",
                "--json recall --category prefs --limit 10\n",
                "--json recall --category arch --limit 10\n",
            )
        );
    }
}
