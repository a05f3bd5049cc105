pub mod cache;
pub mod project_root;
pub mod settings;

pub use settings::FileWorkspaceConfig;
