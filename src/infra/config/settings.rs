use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::Deserialize;

use super::project_root::{PROJECT_CONFIG_FILE, find_workspace_root};
use crate::app::ports::{ConfigError, WorkspaceConfig};
use crate::domain::{PreviewSettings, RenderConfig};

const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// On-disk settings; every key is optional and absent keys fall through.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub runner: Option<String>,
    pub subcommand: Option<String>,
    pub runner_args: Option<Vec<String>>,
    pub extra_args: Option<Vec<String>>,
    pub args_before_path: Option<bool>,
    pub timeout_ms: Option<u64>,
    pub max_buffer: Option<usize>,
    pub exclude_pattern: Option<String>,
    pub render_on_save: Option<bool>,
    pub render_on_change: Option<bool>,
    pub debounce_ms: Option<u64>,
}

impl SettingsFile {
    /// `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let file = toml::from_str(&content).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        debug!("loaded settings from {}", path.display());
        Ok(Some(file))
    }

    /// Keys set in `other` replace ours.
    #[must_use]
    pub fn overlay(self, other: Self) -> Self {
        Self {
            runner: other.runner.or(self.runner),
            subcommand: other.subcommand.or(self.subcommand),
            runner_args: other.runner_args.or(self.runner_args),
            extra_args: other.extra_args.or(self.extra_args),
            args_before_path: other.args_before_path.or(self.args_before_path),
            timeout_ms: other.timeout_ms.or(self.timeout_ms),
            max_buffer: other.max_buffer.or(self.max_buffer),
            exclude_pattern: other.exclude_pattern.or(self.exclude_pattern),
            render_on_save: other.render_on_save.or(self.render_on_save),
            render_on_change: other.render_on_change.or(self.render_on_change),
            debounce_ms: other.debounce_ms.or(self.debounce_ms),
        }
    }

    pub fn into_settings(self) -> PreviewSettings {
        let defaults = PreviewSettings::default();
        let render = RenderConfig {
            runner: self.runner.unwrap_or(defaults.render.runner),
            subcommand: self.subcommand.unwrap_or(defaults.render.subcommand),
            runner_args: self.runner_args.unwrap_or(defaults.render.runner_args),
            extra_args: self.extra_args.unwrap_or(defaults.render.extra_args),
            args_before_path: self
                .args_before_path
                .unwrap_or(defaults.render.args_before_path),
            timeout: self
                .timeout_ms
                .map_or(defaults.render.timeout, Duration::from_millis),
            max_buffer: self.max_buffer.unwrap_or(defaults.render.max_buffer),
        };

        PreviewSettings {
            render,
            exclude_pattern: self
                .exclude_pattern
                .filter(|pattern| !pattern.is_empty())
                .or(defaults.exclude_pattern),
            render_on_save: self.render_on_save.unwrap_or(defaults.render_on_save),
            render_on_change: self.render_on_change.unwrap_or(defaults.render_on_change),
            debounce: self
                .debounce_ms
                .map_or(defaults.debounce, Duration::from_millis),
        }
    }
}

/// Global `~/.config/svschem/config.toml` overridden by the workspace's
/// `.svschem.toml`. Both files are re-read on every call.
pub struct FileWorkspaceConfig {
    global_file: Option<PathBuf>,
}

impl FileWorkspaceConfig {
    pub fn new() -> Self {
        let global_file = dirs::config_dir().map(|dir| dir.join("svschem").join(GLOBAL_CONFIG_FILE));
        Self { global_file }
    }

    pub fn with_global_file(global_file: Option<PathBuf>) -> Self {
        Self { global_file }
    }
}

impl Default for FileWorkspaceConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceConfig for FileWorkspaceConfig {
    fn workspace_root(&self, file: &Path) -> PathBuf {
        find_workspace_root(file)
    }

    fn load_settings(&self, workspace: &Path) -> Result<PreviewSettings, ConfigError> {
        let global = match &self.global_file {
            Some(path) => SettingsFile::load(path)?.unwrap_or_default(),
            None => SettingsFile::default(),
        };
        let project = SettingsFile::load(&workspace.join(PROJECT_CONFIG_FILE))?.unwrap_or_default();

        Ok(global.overlay(project).into_settings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    mod settings_file {
        use super::*;

        #[test]
        fn empty_file_yields_defaults() {
            let settings = SettingsFile::default().into_settings();

            assert_eq!(settings, PreviewSettings::default());
        }

        #[test]
        fn converts_millisecond_keys() {
            let file = SettingsFile {
                timeout_ms: Some(1500),
                debounce_ms: Some(250),
                ..Default::default()
            };

            let settings = file.into_settings();

            assert_eq!(settings.render.timeout, Duration::from_millis(1500));
            assert_eq!(settings.debounce, Duration::from_millis(250));
        }

        #[test]
        fn empty_exclude_pattern_is_none() {
            let file = SettingsFile {
                exclude_pattern: Some(String::new()),
                ..Default::default()
            };

            assert_eq!(file.into_settings().exclude_pattern, None);
        }

        #[rstest]
        #[case(Some("a"), None, Some("a"))]
        #[case(None, Some("b"), Some("b"))]
        #[case(Some("a"), Some("b"), Some("b"))]
        #[case(None, None, None)]
        fn overlay_prefers_later_file(
            #[case] base: Option<&str>,
            #[case] top: Option<&str>,
            #[case] expected: Option<&str>,
        ) {
            let base = SettingsFile {
                runner: base.map(str::to_string),
                ..Default::default()
            };
            let top = SettingsFile {
                runner: top.map(str::to_string),
                ..Default::default()
            };

            assert_eq!(base.overlay(top).runner.as_deref(), expected);
        }

        #[test]
        fn missing_file_is_none() {
            let temp_dir = TempDir::new().unwrap();

            let result = SettingsFile::load(&temp_dir.path().join("absent.toml")).unwrap();

            assert!(result.is_none());
        }

        #[test]
        fn unknown_key_is_invalid() {
            let temp_dir = TempDir::new().unwrap();
            let path = write(temp_dir.path(), "config.toml", "runer = \"sv2svg\"\n");

            let result = SettingsFile::load(&path);

            assert!(matches!(result, Err(ConfigError::Invalid { .. })));
        }
    }

    mod file_workspace_config {
        use super::*;

        #[test]
        fn project_file_overrides_global_file() {
            let temp_dir = TempDir::new().unwrap();
            let global = write(
                temp_dir.path(),
                "config.toml",
                "runner = \"pipx\"\nsubcommand = \"run\"\nrender_on_change = true\n",
            );
            let workspace = temp_dir.path().join("chip");
            fs::create_dir_all(&workspace).unwrap();
            write(
                &workspace,
                PROJECT_CONFIG_FILE,
                "subcommand = \"\"\nextra_args = [\"--verbose\"]\nexclude_pattern = \"_tb\\\\.sv$\"\n",
            );
            let config = FileWorkspaceConfig::with_global_file(Some(global));

            let settings = config.load_settings(&workspace).unwrap();

            assert_eq!(settings.render.runner, "pipx");
            assert_eq!(settings.render.subcommand, "");
            assert_eq!(settings.render.extra_args, vec!["--verbose"]);
            assert_eq!(settings.exclude_pattern.as_deref(), Some("_tb\\.sv$"));
            assert!(settings.render_on_change);
        }

        #[test]
        fn no_files_yield_defaults() {
            let temp_dir = TempDir::new().unwrap();
            let config = FileWorkspaceConfig::with_global_file(None);

            let settings = config.load_settings(temp_dir.path()).unwrap();

            assert_eq!(settings, PreviewSettings::default());
        }

        #[test]
        fn settings_are_reread_on_every_call() {
            let temp_dir = TempDir::new().unwrap();
            let config = FileWorkspaceConfig::with_global_file(None);
            write(temp_dir.path(), PROJECT_CONFIG_FILE, "timeout_ms = 1000\n");
            let first = config.load_settings(temp_dir.path()).unwrap();

            write(temp_dir.path(), PROJECT_CONFIG_FILE, "timeout_ms = 2000\n");
            let second = config.load_settings(temp_dir.path()).unwrap();

            assert_eq!(first.render.timeout, Duration::from_secs(1));
            assert_eq!(second.render.timeout, Duration::from_secs(2));
        }

        #[test]
        fn invalid_project_file_is_reported_with_path() {
            let temp_dir = TempDir::new().unwrap();
            let path = write(temp_dir.path(), PROJECT_CONFIG_FILE, "render_on_save = \"yes\"\n");
            let config = FileWorkspaceConfig::with_global_file(None);

            let result = config.load_settings(temp_dir.path());

            assert!(matches!(result, Err(ConfigError::Invalid { path: p, .. }) if p == path));
        }
    }
}
