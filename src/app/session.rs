//! State of one open preview. Each preview owns its own session; nothing is shared.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::debounce::Debouncer;
use crate::domain::{PreviewSettings, RenderOptions, RenderTarget};
use crate::orchestrator::{RenderOutcome, RenderRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTicket {
    pub path: PathBuf,
    pub generation: u64,
    pub request: RenderRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Displayed {
    pub generation: u64,
    pub outcome: RenderOutcome,
}

#[derive(Debug)]
pub struct PreviewSession {
    path: PathBuf,
    workspace: PathBuf,
    trusted: bool,
    options: RenderOptions,
    /// Latest editor content not yet saved; re-used when options change.
    unsaved: Option<String>,
    pending_edit: Debouncer<String>,
    next_generation: u64,
    displayed: Option<Displayed>,
}

impl PreviewSession {
    pub fn new(
        path: PathBuf,
        workspace: PathBuf,
        trusted: bool,
        options: RenderOptions,
        debounce: Duration,
    ) -> Self {
        Self {
            path,
            workspace,
            trusted,
            options,
            unsaved: None,
            pending_edit: Debouncer::new(debounce),
            next_generation: 1,
            displayed: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    pub fn set_trusted(&mut self, trusted: bool) {
        self.trusted = trusted;
    }

    pub fn displayed(&self) -> Option<&Displayed> {
        self.displayed.as_ref()
    }

    pub fn pending_edit_mut(&mut self) -> &mut Debouncer<String> {
        &mut self.pending_edit
    }

    pub fn pending_edit(&self) -> &Debouncer<String> {
        &self.pending_edit
    }

    pub fn mark_saved(&mut self) {
        self.unsaved = None;
        self.pending_edit.cancel();
    }

    /// What to render now: the latest unsaved content, else the file on disk.
    pub fn current_target(&self) -> RenderTarget {
        match &self.unsaved {
            Some(content) => RenderTarget::Unsaved {
                path: self.path.clone(),
                content: content.clone(),
            },
            None => RenderTarget::File(self.path.clone()),
        }
    }

    /// Issues a ticket for a new render of `target` with the current options.
    pub fn begin_render(&mut self, settings: PreviewSettings, target: RenderTarget) -> RenderTicket {
        if let RenderTarget::Unsaved { content, .. } = &target {
            self.unsaved = Some(content.clone());
        }
        let generation = self.next_generation;
        self.next_generation += 1;

        RenderTicket {
            path: self.path.clone(),
            generation,
            request: RenderRequest {
                settings,
                options: self.options,
                target: Some(target),
                trusted: self.trusted,
            },
        }
    }

    /// Shows `outcome` unless a newer render is already displayed.
    /// Returns whether the displayed slot changed.
    pub fn complete(&mut self, generation: u64, outcome: RenderOutcome) -> bool {
        if self
            .displayed
            .as_ref()
            .is_some_and(|shown| shown.generation > generation)
        {
            return false;
        }
        self.displayed = Some(Displayed {
            generation,
            outcome,
        });
        true
    }
}
