//! Side effects returned by the controller, executed by the host loop.

use std::path::PathBuf;

use crate::domain::RenderOptions;
use crate::orchestrator::RenderOutcome;
use crate::session::RenderTicket;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run in the background; completion comes back as `Action::RenderFinished`.
    Render(RenderTicket),
    /// Replace the preview document with a freshly rendered one.
    ShowDocument {
        path: PathBuf,
        generation: u64,
        outcome: RenderOutcome,
        options: RenderOptions,
    },
    Notify {
        path: Option<PathBuf>,
        message: String,
    },
    Exit,
}
