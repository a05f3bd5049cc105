//! Per-invocation files: scratch copies of unsaved content and fallback outputs.
//!
//! Both are `tempfile` handles owned by the render that created them. The
//! fallback output lives in its own directory, so a renderer that keeps writing
//! after the directory is gone fails instead of leaving a file behind.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::{Builder, NamedTempFile, TempDir};

const FALLBACK_OUTPUT_NAME: &str = "out.svg";

/// Directory that receives one fallback attempt's output.
#[derive(Debug)]
pub struct FallbackOutput {
    dir: TempDir,
}

impl FallbackOutput {
    pub fn create_in(temp_dir: &Path) -> io::Result<Self> {
        let dir = Builder::new().prefix("svschem-").tempdir_in(temp_dir)?;
        debug!("fallback output dir {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Path handed to the renderer. Not created until the renderer writes it.
    pub fn path(&self) -> PathBuf {
        self.dir.path().join(FALLBACK_OUTPUT_NAME)
    }
}

/// Writes `content` to a hidden sibling of `original` so relative includes
/// still resolve, or to the system temp dir when that directory is not writable.
pub fn write_scratch(original: &Path, content: &str) -> io::Result<NamedTempFile> {
    let stem = original
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");
    let extension = original
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("sv");
    let prefix = format!(".{}.svschem-", stem);
    let suffix = format!(".{}", extension);
    let mut builder = Builder::new();
    builder.prefix(&prefix).suffix(&suffix);

    let sibling_dir = original
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut file = match builder.tempfile_in(sibling_dir) {
        Ok(file) => file,
        Err(e) => {
            debug!(
                "scratch copy next to {} failed ({}), using temp dir",
                original.display(),
                e
            );
            builder.tempfile_in(std::env::temp_dir())?
        }
    };
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}
