use std::fs;
use std::path::PathBuf;

use color_eyre::eyre::{Result, eyre};

pub fn get_cache_dir() -> Result<PathBuf> {
    let cache_base = dirs::cache_dir().ok_or_else(|| eyre!("Could not find cache directory"))?;
    let cache_dir = cache_base.join("svschem");

    if !cache_dir.exists() {
        fs::create_dir_all(&cache_dir)?;
    }

    Ok(cache_dir)
}

/// Stable file name for the HTML preview of `source`.
pub fn preview_file_name(source: &std::path::Path) -> String {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("preview");
    format!("{}.preview.html", stem)
}
