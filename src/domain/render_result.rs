use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The tool ran but produced no usable image.
    ToolFailed,
    Timeout,
    OutputTooLarge,
    /// The runner could not be started at all.
    Spawn,
    /// Scratch or temporary file handling failed.
    Io,
}

impl FailureKind {
    pub fn summary(self) -> &'static str {
        match self {
            FailureKind::ToolFailed => "Schematic rendering failed",
            FailureKind::Timeout => "Schematic rendering timed out",
            FailureKind::OutputTooLarge => "Renderer output exceeded the buffer limit",
            FailureKind::Spawn => "Renderer could not be started",
            FailureKind::Io => "Could not prepare files for rendering",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    pub kind: FailureKind,
    pub message: String,
    /// Literal command line of the last attempt, for reproduction.
    pub command_line: String,
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.summary(), self.message)?;
        if !self.command_line.is_empty() {
            write!(f, "\n\nCommand: {}", self.command_line)?;
        }
        Ok(())
    }
}

impl std::error::Error for RenderFailure {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderResult {
    Success { svg: String },
    Failure(RenderFailure),
}

impl RenderResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RenderResult::Success { .. })
    }

    pub fn svg(&self) -> Option<&str> {
        match self {
            RenderResult::Success { svg } => Some(svg),
            RenderResult::Failure(_) => None,
        }
    }
}
