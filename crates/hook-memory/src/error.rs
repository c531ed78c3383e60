//! Error taxonomy for the memory pipeline.

use hook_common::SubprocessError;
use std::fmt;

/// How a failure should be treated by a hook's top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Log it and carry on with an empty or default result.
    Recoverable,
    /// Propagate to the process exit status (report hooks only).
    Fatal,
}

/// Errors raised inside the memory pipeline.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// An external program failed to spawn, exited non-zero, or timed out.
    #[error("{program} error: {message}\nstderr: {stderr}")]
    ExternalTool {
        program: String,
        message: String,
        stderr: String,
    },

    /// One inference tier failed.
    #[error("inference failed: {0}")]
    Inference(String),

    /// The trigger payload could not be parsed.
    #[error("invalid hook input: {0}")]
    InvalidInput(String),

    /// A result could not be written to stdout.
    #[error("failed to write output: {0}")]
    Output(String),
}

impl HookError {
    pub fn severity(&self) -> Severity {
        match self {
            HookError::ExternalTool { .. } | HookError::Inference(_) => Severity::Recoverable,
            HookError::InvalidInput(_) | HookError::Output(_) => Severity::Fatal,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.severity() == Severity::Recoverable
    }

    /// Wrap a trigger payload read or parse failure.
    pub fn invalid_input(err: impl fmt::Display) -> Self {
        HookError::InvalidInput(format!("{:#}", err))
    }

    /// Wrap a stdout write or serialization failure.
    pub fn output(err: impl fmt::Display) -> Self {
        HookError::Output(format!("{:#}", err))
    }

    /// Build an `ExternalTool` error from a subprocess failure.
    pub fn from_subprocess(program: &str, err: SubprocessError) -> Self {
        HookError::ExternalTool {
            program: program.to_string(),
            message: err.to_string(),
            stderr: String::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_split() {
        let tool = HookError::ExternalTool {
            program: "fmemory".into(),
            message: "exit status 2".into(),
            stderr: "no such category".into(),
        };
        assert!(tool.is_recoverable());
        assert!(HookError::Inference("503".into()).is_recoverable());
        assert_eq!(
            HookError::InvalidInput("eof".into()).severity(),
            Severity::Fatal
        );
    }

    #[test]
    fn test_wrapping_constructors() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = HookError::invalid_input(parse_err);
        assert!(matches!(err, HookError::InvalidInput(_)));
        assert!(err.to_string().starts_with("invalid hook input: EOF"));

        let err = HookError::output(anyhow::anyhow!("broken pipe").context("write failed"));
        assert_eq!(err.to_string(), "failed to write output: write failed: broken pipe");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_external_tool_message_carries_stderr() {
        let err = HookError::ExternalTool {
            program: "fmemory".into(),
            message: "exited with status 1".into(),
            stderr: "db locked".into(),
        };
        let text = err.to_string();
        assert!(text.starts_with("fmemory error: exited with status 1"));
        assert!(text.ends_with("stderr: db locked"));
    }
}
