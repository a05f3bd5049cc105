use std::time::Duration;

pub const DEFAULT_RUNNER: &str = "uvx";
pub const DEFAULT_SUBCOMMAND: &str = "sv2svg";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_BUFFER: usize = 10 * 1024 * 1024;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// How to invoke the external renderer. Read fresh before every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub runner: String,
    /// Empty when the runner is the renderer itself.
    pub subcommand: String,
    pub runner_args: Vec<String>,
    pub extra_args: Vec<String>,
    /// `true`: options precede the target path; `false`: they follow it.
    pub args_before_path: bool,
    pub timeout: Duration,
    pub max_buffer: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            runner: DEFAULT_RUNNER.to_string(),
            subcommand: DEFAULT_SUBCOMMAND.to_string(),
            runner_args: Vec::new(),
            extra_args: Vec::new(),
            args_before_path: true,
            timeout: DEFAULT_TIMEOUT,
            max_buffer: DEFAULT_MAX_BUFFER,
        }
    }
}

/// Everything the host reads from configuration for one preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSettings {
    pub render: RenderConfig,
    /// Regex matched against the file name; matching files are never rendered.
    pub exclude_pattern: Option<String>,
    pub render_on_save: bool,
    pub render_on_change: bool,
    pub debounce: Duration,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            exclude_pattern: None,
            render_on_save: true,
            render_on_change: false,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}
