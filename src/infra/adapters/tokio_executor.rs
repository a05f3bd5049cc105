use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;

use crate::app::ports::{CommandExecutor, CommandOutput, CommandSpec, ExecError};

/// Runs commands as child processes on the tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandExecutor;

impl TokioCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for TokioCommandExecutor {
    async fn execute(&self, command: &CommandSpec) -> Result<CommandOutput, ExecError> {
        debug!("spawning: {}", command.command_line());

        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true); // an abandoned or timed-out child must not outlive us
        if let Some(cwd) = &command.cwd {
            process.current_dir(cwd);
        }

        let mut child = process
            .spawn()
            .map_err(|e| spawn_error(&command.program, &e))?;

        // Drain both pipes before wait() so a chatty child cannot block on a full pipe
        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();
        let limit = command.max_output;

        timeout(command.timeout, async {
            let (stdout, stderr) = tokio::try_join!(
                read_capped(stdout_handle, limit),
                read_capped(stderr_handle, limit)
            )?;
            let status = child
                .wait()
                .await
                .map_err(|e| ExecError::Io(e.to_string()))?;

            Ok::<_, ExecError>(CommandOutput {
                status: status.code(),
                stdout,
                stderr,
            })
        })
        .await
        .map_err(|_| ExecError::Timeout(command.timeout))?
    }
}

fn spawn_error(program: &str, error: &io::Error) -> ExecError {
    if error.kind() == io::ErrorKind::NotFound {
        ExecError::NotFound(program.to_string())
    } else {
        ExecError::Spawn(format!("{}: {}", program, error))
    }
}

async fn read_capped<R>(stream: Option<R>, limit: usize) -> Result<String, ExecError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(stream) = stream {
        let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
        stream
            .take(cap)
            .read_to_end(&mut buf)
            .await
            .map_err(|e| ExecError::Io(e.to_string()))?;
    }

    if buf.len() > limit {
        return Err(ExecError::OutputTooLarge { limit });
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
