use std::path::{Path, PathBuf};

use crate::domain::RenderOptions;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsStoreError {
    #[error("Options file version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
    #[error("Read error: {0}")]
    ReadError(String),
    #[error("Write error: {0}")]
    WriteError(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("IO error: {0}")]
    IoError(String),
}

/// Persists render options across sessions, one entry per workspace root.
#[cfg_attr(test, mockall::automock)]
pub trait OptionsStore: Send + Sync {
    fn load(&self, workspace: &Path) -> Result<Option<RenderOptions>, OptionsStoreError>;

    fn save(&self, workspace: &Path, options: &RenderOptions) -> Result<(), OptionsStoreError>;

    fn storage_path(&self) -> PathBuf;
}
