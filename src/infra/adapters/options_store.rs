use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::app::ports::{OptionsStore, OptionsStoreError};
use crate::domain::{OPTIONS_VERSION, RenderOptions};

const OPTIONS_FILE_NAME: &str = "options.toml";

#[derive(Debug, Serialize, Deserialize)]
struct OptionsFile {
    version: u32,
    #[serde(default)]
    workspaces: BTreeMap<String, RenderOptions>,
}

impl OptionsFile {
    fn empty() -> Self {
        Self {
            version: OPTIONS_VERSION,
            workspaces: BTreeMap::new(),
        }
    }
}

/// Render options per workspace root, in `~/.config/svschem/options.toml`.
pub struct TomlOptionsStore {
    config_dir: PathBuf,
}

impl TomlOptionsStore {
    pub fn new() -> Result<Self, OptionsStoreError> {
        let config_dir = get_config_dir()?;
        Ok(Self { config_dir })
    }

    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    fn options_file_path(&self) -> PathBuf {
        self.config_dir.join(OPTIONS_FILE_NAME)
    }

    fn read_file(&self) -> Result<Option<OptionsFile>, OptionsStoreError> {
        let path = self.options_file_path();

        if !path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&path).map_err(|e| OptionsStoreError::ReadError(e.to_string()))?;

        let file: OptionsFile = toml::from_str(&content)
            .map_err(|e| OptionsStoreError::InvalidFormat(e.to_string()))?;

        if file.version != OPTIONS_VERSION {
            return Err(OptionsStoreError::VersionMismatch {
                found: file.version,
                expected: OPTIONS_VERSION,
            });
        }

        Ok(Some(file))
    }
}

fn workspace_key(workspace: &Path) -> String {
    workspace.to_string_lossy().into_owned()
}

impl OptionsStore for TomlOptionsStore {
    fn load(&self, workspace: &Path) -> Result<Option<RenderOptions>, OptionsStoreError> {
        Ok(self
            .read_file()?
            .and_then(|mut file| file.workspaces.remove(&workspace_key(workspace))))
    }

    fn save(&self, workspace: &Path, options: &RenderOptions) -> Result<(), OptionsStoreError> {
        let mut file = self.read_file()?.unwrap_or_else(OptionsFile::empty);

        // Default options are stored as an absent entry
        if options.is_default() {
            file.workspaces.remove(&workspace_key(workspace));
        } else {
            file.workspaces.insert(workspace_key(workspace), *options);
        }

        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)
                .map_err(|e| OptionsStoreError::IoError(e.to_string()))?;
        }

        let content = toml::to_string_pretty(&file)
            .map_err(|e| OptionsStoreError::WriteError(e.to_string()))?;
        let content_with_header = format!("# svschem render options\n\n{}", content);

        let path = self.options_file_path();
        fs::write(&path, content_with_header)
            .map_err(|e| OptionsStoreError::WriteError(e.to_string()))?;
        debug!("saved options for {} to {}", workspace.display(), path.display());

        Ok(())
    }

    fn storage_path(&self) -> PathBuf {
        self.options_file_path()
    }
}

fn get_config_dir() -> Result<PathBuf, OptionsStoreError> {
    let config_base = dirs::config_dir()
        .ok_or_else(|| OptionsStoreError::IoError("Could not find config directory".into()))?;
    Ok(config_base.join("svschem"))
}
