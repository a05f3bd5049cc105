pub mod options_store;
pub mod tokio_executor;
pub mod viewer;

pub use options_store::TomlOptionsStore;
pub use tokio_executor::TokioCommandExecutor;
pub use viewer::SystemViewer;
