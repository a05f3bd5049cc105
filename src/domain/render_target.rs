use std::path::{Path, PathBuf};

/// What to render: a file on disk, or editor content that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderTarget {
    File(PathBuf),
    /// Materialised as a scratch copy next to `path` for the duration of one render.
    Unsaved { path: PathBuf, content: String },
}

impl RenderTarget {
    pub fn path(&self) -> &Path {
        match self {
            RenderTarget::File(path) => path,
            RenderTarget::Unsaved { path, .. } => path,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path().file_name().and_then(|name| name.to_str())
    }

    /// Directory the renderer runs in, so relative includes resolve.
    pub fn working_dir(&self) -> Option<&Path> {
        self.path()
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
    }
}
