use std::borrow::Cow;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::FailureKind;

/// One fully resolved process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub timeout: Duration,
    /// Cap on captured bytes per stream.
    pub max_output: usize,
}

impl CommandSpec {
    /// Shell-quoted command line, suitable for copy/paste reproduction.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote_arg)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote_arg(arg: &str) -> Cow<'_, str> {
    let is_plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if is_plain {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    #[error("Command not found: {0}")]
    NotFound(String),
    #[error("Failed to start command: {0}")]
    Spawn(String),
    #[error("Command timed out after {0:?}")]
    Timeout(Duration),
    #[error("Command output exceeded {limit} bytes")]
    OutputTooLarge { limit: usize },
    #[error("IO error: {0}")]
    Io(String),
}

impl ExecError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::NotFound(_) | Self::Spawn(_) => FailureKind::Spawn,
            Self::Timeout(_) => FailureKind::Timeout,
            Self::OutputTooLarge { .. } => FailureKind::OutputTooLarge,
            Self::Io(_) => FailureKind::Io,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, command: &CommandSpec) -> Result<CommandOutput, ExecError>;
}
