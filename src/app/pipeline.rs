//! Two-step renderer invocation: stdout first, then an output file.
//!
//! A primary attempt that yields no SVG on stdout is retried with the output
//! pointed at a temporary file. On the retry, file contents win over stdout.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::io::AsyncReadExt;

use crate::args::rewrite_output_target;
use crate::domain::{FailureKind, RenderConfig, RenderFailure, RenderResult, extract_svg};
use crate::ports::{CommandExecutor, CommandOutput, CommandSpec};
use crate::scratch::FallbackOutput;

/// Why an attempt produced no image.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttemptError {
    kind: FailureKind,
    message: String,
}

pub struct RenderPipeline {
    executor: Arc<dyn CommandExecutor>,
    temp_dir: PathBuf,
}

impl RenderPipeline {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self::with_temp_dir(executor, std::env::temp_dir())
    }

    pub fn with_temp_dir(executor: Arc<dyn CommandExecutor>, temp_dir: PathBuf) -> Self {
        Self { executor, temp_dir }
    }

    /// Runs `runner [runner_args] <args>` in `cwd`. `args` is the builder's
    /// vector (subcommand onward).
    pub async fn run(&self, config: &RenderConfig, args: &[String], cwd: Option<&Path>) -> RenderResult {
        let primary = command(config, args.to_vec(), cwd);
        debug!("render: {}", primary.command_line());

        let primary_error = match self.executor.execute(&primary).await {
            Ok(output) => match extract_svg(&output.stdout) {
                Some(svg) => {
                    return RenderResult::Success {
                        svg: svg.to_string(),
                    };
                }
                None => AttemptError {
                    kind: FailureKind::ToolFailed,
                    message: describe_missing_svg(&output),
                },
            },
            Err(e) => AttemptError {
                kind: e.failure_kind(),
                message: e.to_string(),
            },
        };

        info!(
            "no SVG on stdout ({}), retrying with an output file",
            primary_error.message
        );
        self.run_fallback(config, args, cwd, primary_error).await
    }

    async fn run_fallback(
        &self,
        config: &RenderConfig,
        args: &[String],
        cwd: Option<&Path>,
        primary_error: AttemptError,
    ) -> RenderResult {
        let output_dir = match FallbackOutput::create_in(&self.temp_dir) {
            Ok(dir) => dir,
            Err(e) => {
                let message = format!(
                    "Could not create output directory in {}: {}",
                    self.temp_dir.display(),
                    e
                );
                warn!("render failed: {}", message);
                return failure(FailureKind::Io, message, String::new());
            }
        };
        let output_path = output_dir.path();
        let fallback = command(config, rewrite_output_target(args, &output_path), cwd);
        let command_line = fallback.command_line();
        debug!("render fallback: {}", command_line);

        let result = self.executor.execute(&fallback).await;

        if output_path.exists() {
            return match read_capped(&output_path, config.max_buffer).await {
                Ok(Some(svg)) => RenderResult::Success { svg },
                Ok(None) => {
                    warn!("renderer output exceeded {} bytes", config.max_buffer);
                    failure(
                        FailureKind::OutputTooLarge,
                        format!("Renderer output exceeded {} bytes", config.max_buffer),
                        command_line,
                    )
                }
                Err(e) => failure(
                    FailureKind::Io,
                    format!("Could not read renderer output: {}", e),
                    command_line,
                ),
            };
        }

        let error = match result {
            Ok(output) => {
                if let Some(svg) = extract_svg(&output.stdout) {
                    return RenderResult::Success {
                        svg: svg.to_string(),
                    };
                }
                let stderr = output.stderr.trim();
                AttemptError {
                    kind: FailureKind::ToolFailed,
                    message: if stderr.is_empty() {
                        primary_error.message
                    } else {
                        stderr.to_string()
                    },
                }
            }
            Err(e) => AttemptError {
                kind: e.failure_kind(),
                message: e.to_string(),
            },
        };

        warn!("render failed: {} ({})", error.message, command_line);
        failure(error.kind, error.message, command_line)
    }
}

/// Reads at most `limit` bytes; `None` when the file holds more.
async fn read_capped(path: &Path, limit: usize) -> std::io::Result<Option<String>> {
    let file = tokio::fs::File::open(path).await?;
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut bytes = Vec::new();
    file.take(cap).read_to_end(&mut bytes).await?;
    if bytes.len() > limit {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

fn command(config: &RenderConfig, args: Vec<String>, cwd: Option<&Path>) -> CommandSpec {
    let mut full_args = config.runner_args.clone();
    full_args.extend(args);
    CommandSpec {
        program: config.runner.clone(),
        args: full_args,
        cwd: cwd.map(Path::to_path_buf),
        timeout: config.timeout,
        max_output: config.max_buffer,
    }
}

fn describe_missing_svg(output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match output.status {
        Some(code) => format!("No SVG found in renderer output (exit code {})", code),
        None => "No SVG found in renderer output (terminated by signal)".to_string(),
    }
}

fn failure(kind: FailureKind, message: String, command_line: String) -> RenderResult {
    RenderResult::Failure(RenderFailure {
        kind,
        message,
        command_line,
    })
}
