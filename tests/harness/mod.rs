#![allow(dead_code, reason = "each integration test binary uses a subset")]

pub mod fixtures;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use svschem::app::orchestrator::Renderer;
use svschem::app::pipeline::RenderPipeline;
use svschem::domain::{PreviewSettings, RenderConfig};
use svschem::infra::adapters::TokioCommandExecutor;
use tempfile::TempDir;

/// A workspace with a fake renderer script and a separate temp dir for fallback output.
pub struct Workspace {
    pub root: TempDir,
    pub temp: TempDir,
    pub tool: PathBuf,
}

impl Workspace {
    pub fn with_tool(script: &str) -> Self {
        let root = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        let tool = root.path().join("fake-sv2svg.sh");
        fs::write(&tool, script).unwrap();
        Self { root, temp, tool }
    }

    pub fn write_source(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Runs the script through `sh`, so it never needs the executable bit.
    pub fn config(&self) -> RenderConfig {
        RenderConfig {
            runner: "sh".to_string(),
            subcommand: String::new(),
            runner_args: vec![self.tool.to_string_lossy().into_owned()],
            timeout: Duration::from_secs(10),
            ..RenderConfig::default()
        }
    }

    pub fn settings(&self) -> PreviewSettings {
        PreviewSettings {
            render: self.config(),
            ..PreviewSettings::default()
        }
    }

    pub fn pipeline(&self) -> RenderPipeline {
        RenderPipeline::with_temp_dir(
            Arc::new(TokioCommandExecutor::new()),
            self.temp.path().to_path_buf(),
        )
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.pipeline())
    }

    pub fn temp_entries(&self) -> Vec<PathBuf> {
        entries(self.temp.path())
    }

    pub fn root_entries(&self) -> Vec<PathBuf> {
        entries(self.root.path())
    }
}

fn entries(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    paths.sort();
    paths
}
