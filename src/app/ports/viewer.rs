use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("Failed to open viewer: {0}")]
    LaunchFailed(#[source] std::io::Error),
}

pub trait ViewerLauncher: Send + Sync {
    fn open_file(&self, path: &Path) -> Result<(), ViewerError>;
}
