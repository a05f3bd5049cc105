use std::path::Path;
use std::process::Command;

use log::info;

use crate::app::ports::{ViewerError, ViewerLauncher};

/// Opens files with the platform's default application.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemViewer;

impl SystemViewer {
    pub fn new() -> Self {
        Self
    }
}

impl ViewerLauncher for SystemViewer {
    fn open_file(&self, path: &Path) -> Result<(), ViewerError> {
        info!("opening {}", path.display());

        #[cfg(target_os = "macos")]
        {
            Command::new("open")
                .arg(path)
                .spawn()
                .map_err(ViewerError::LaunchFailed)?;
        }
        #[cfg(target_os = "linux")]
        {
            Command::new("xdg-open")
                .arg(path)
                .spawn()
                .map_err(ViewerError::LaunchFailed)?;
        }
        #[cfg(target_os = "windows")]
        {
            Command::new("cmd")
                .args(["/C", "start", ""])
                .arg(path)
                .spawn()
                .map_err(ViewerError::LaunchFailed)?;
        }

        Ok(())
    }
}
