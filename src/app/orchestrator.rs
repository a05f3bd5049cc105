//! Sequences one render: preconditions, scratch copy, arguments, process.
//!
//! Nothing here returns `Err`. Every failure becomes a [`RenderResult::Failure`]
//! or a [`Notice`], so the host can always show something.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::args::build_args;
use crate::domain::{
    FailureKind, PreviewSettings, RenderFailure, RenderOptions, RenderResult, RenderTarget,
};
use crate::pipeline::RenderPipeline;
use crate::precondition::{Notice, check_preconditions};
use crate::scratch::write_scratch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(RenderResult),
    Skipped(Notice),
}

/// Snapshot of everything one render needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub settings: PreviewSettings,
    pub options: RenderOptions,
    pub target: Option<RenderTarget>,
    pub trusted: bool,
}

pub struct Renderer {
    pipeline: RenderPipeline,
}

impl Renderer {
    pub fn new(pipeline: RenderPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn render(&self, request: &RenderRequest) -> RenderOutcome {
        let target = match check_preconditions(
            &request.settings,
            request.target.as_ref(),
            request.trusted,
        ) {
            Ok(target) => target,
            Err(notice) => {
                info!("render skipped: {}", notice);
                return RenderOutcome::Skipped(notice);
            }
        };

        RenderOutcome::Rendered(
            self.render_target(&request.settings, &request.options, target)
                .await,
        )
    }

    async fn render_target(
        &self,
        settings: &PreviewSettings,
        options: &RenderOptions,
        target: &RenderTarget,
    ) -> RenderResult {
        let scratch = match target {
            RenderTarget::File(_) => None,
            RenderTarget::Unsaved { path, content } => match write_scratch(path, content) {
                Ok(scratch) => Some(scratch),
                Err(e) => {
                    return RenderResult::Failure(RenderFailure {
                        kind: FailureKind::Io,
                        message: format!("Could not write scratch copy: {}", e),
                        command_line: String::new(),
                    });
                }
            },
        };

        let input = scratch.as_ref().map_or(target.path(), |s| s.path());
        let cwd = target.working_dir();
        let args = build_args(&settings.render, &path_argument(input, cwd), options);
        debug!("rendering {} ({} args)", target.path().display(), args.len());

        // `scratch` lives until the pipeline has finished with it.
        let result = self.pipeline.run(&settings.render, &args, cwd).await;
        drop(scratch);
        result
    }
}

/// The renderer runs inside `cwd`, so a file directly in it is passed by name.
fn path_argument(input: &Path, cwd: Option<&Path>) -> PathBuf {
    match (input.parent(), input.file_name(), cwd) {
        (Some(parent), Some(name), Some(cwd)) if parent == cwd => PathBuf::from(name),
        _ => input.to_path_buf(),
    }
}
