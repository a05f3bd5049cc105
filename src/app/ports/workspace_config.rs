use std::path::{Path, PathBuf};

use crate::domain::PreviewSettings;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("Invalid settings in {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

#[cfg_attr(test, mockall::automock)]
pub trait WorkspaceConfig: Send + Sync {
    /// Root directory that scopes settings and persisted options for `file`.
    fn workspace_root(&self, file: &Path) -> PathBuf;

    /// Reads settings from disk. Called before every render, never cached.
    fn load_settings(&self, workspace: &Path) -> Result<PreviewSettings, ConfigError>;
}
