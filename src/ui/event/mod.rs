//! JSON-lines protocol between `svschem serve` and the editor extension.

pub mod handler;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::orchestrator::RenderOutcome;
use crate::domain::{RenderOptions, RenderResult};
use crate::preview::render_document;

/// One line read from the editor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostRequest {
    Open {
        path: PathBuf,
        /// Omitted means untrusted; the renderer never runs for an untrusted workspace.
        #[serde(default)]
        trusted: bool,
    },
    Save {
        path: PathBuf,
    },
    Change {
        path: PathBuf,
        content: String,
    },
    /// A message posted by the preview document, passed through verbatim.
    Message {
        path: PathBuf,
        message: Value,
    },
    Close {
        path: PathBuf,
    },
    Shutdown,
}

/// One line written to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    Document {
        path: PathBuf,
        generation: u64,
        success: bool,
        html: String,
    },
    Notice {
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
        message: String,
    },
}

impl HostEvent {
    pub fn document(
        path: &Path,
        generation: u64,
        outcome: &RenderOutcome,
        options: &RenderOptions,
    ) -> Self {
        Self::Document {
            path: path.to_path_buf(),
            generation,
            success: matches!(outcome, RenderOutcome::Rendered(RenderResult::Success { .. })),
            html: render_document(outcome, options, path),
        }
    }

    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
