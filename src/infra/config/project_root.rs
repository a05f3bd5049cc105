use std::path::{Path, PathBuf};

pub const PROJECT_CONFIG_FILE: &str = ".svschem.toml";

const ROOT_MARKERS: [&str; 2] = [PROJECT_CONFIG_FILE, ".git"];

/// Nearest ancestor of `file` holding a project config or a `.git` entry,
/// else the file's own directory.
pub fn find_workspace_root(file: &Path) -> PathBuf {
    let start = file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    find_marker_upward(start).unwrap_or_else(|| start.to_path_buf())
}

fn find_marker_upward(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if ROOT_MARKERS
            .iter()
            .any(|marker| current.join(marker).exists())
        {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}
