use std::path::PathBuf;

use serde_json::Value;

use crate::orchestrator::RenderOutcome;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A preview was opened for `path`.
    Open { path: PathBuf, trusted: bool },
    Saved { path: PathBuf },
    /// Unsaved editor content changed.
    Changed { path: PathBuf, content: String },
    /// Raw message posted by the preview document.
    ViewMessage { path: PathBuf, message: Value },
    DebounceElapsed,
    RenderFinished {
        path: PathBuf,
        generation: u64,
        outcome: RenderOutcome,
    },
    Close { path: PathBuf },
    Quit,
}
