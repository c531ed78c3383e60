//! Subprocess execution utilities.

use std::ffi::OsString;
use std::process::Output;
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Errors from running an external program.
#[derive(Debug, thiserror::Error)]
pub enum SubprocessError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },
    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal)
    pub exit_code: Option<i32>,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
}

impl CommandResult {
    /// Create from std::process::Output.
    pub fn from_output(output: &Output) -> Self {
        Self {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        }
    }
}

/// Run a program with arguments, optional stdin, and a timeout.
///
/// Non-zero exits are not errors here; callers inspect `success`. The child
/// is killed when the timeout expires.
pub fn run_with_timeout<I, S>(
    program: &str,
    args: I,
    stdin: Option<&str>,
    timeout: Duration,
) -> Result<CommandResult, SubprocessError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut expression = duct::cmd(program, args)
        .stdout_capture()
        .stderr_capture()
        .unchecked();
    expression = match stdin {
        Some(text) => expression.stdin_bytes(text.as_bytes().to_vec()),
        None => expression.stdin_null(),
    };

    let handle = expression.start().map_err(|source| SubprocessError::Spawn {
        program: program.to_string(),
        source,
    })?;

    let start = Instant::now();
    loop {
        match handle.try_wait() {
            Ok(Some(output)) => return Ok(CommandResult::from_output(output)),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = handle.kill();
                    return Err(SubprocessError::Timeout {
                        program: program.to_string(),
                        timeout,
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                return Err(SubprocessError::Wait {
                    program: program.to_string(),
                    source,
                });
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_run_success() {
        let result = run_with_timeout("sh", ["-c", "echo hello"], None, TIMEOUT).unwrap();
        assert!(result.success);
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn test_run_failure_is_not_error() {
        let result =
            run_with_timeout("sh", ["-c", "echo oops >&2; exit 3"], None, TIMEOUT).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.stderr.trim(), "oops");
    }

    #[test]
    fn test_stdin_is_forwarded() {
        let result = run_with_timeout("cat", Vec::<String>::new(), Some("piped"), TIMEOUT).unwrap();
        assert_eq!(result.stdout, "piped");
    }

    #[test]
    fn test_timeout_kills_child() {
        let err = run_with_timeout("sleep", ["5"], None, Duration::from_millis(100)).unwrap_err();
        assert!(matches!(err, SubprocessError::Timeout { .. }));
    }

    #[test]
    fn test_missing_program() {
        let err = run_with_timeout("nonexistent_command_12345", ["x"], None, TIMEOUT).unwrap_err();
        assert!(matches!(err, SubprocessError::Spawn { .. }));
    }
}
