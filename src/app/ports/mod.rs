pub mod command_executor;
pub mod options_store;
pub mod viewer;
pub mod workspace_config;

pub use command_executor::{CommandExecutor, CommandOutput, CommandSpec, ExecError};
pub use options_store::{OptionsStore, OptionsStoreError};
pub use viewer::{ViewerError, ViewerLauncher};
pub use workspace_config::{ConfigError, WorkspaceConfig};
