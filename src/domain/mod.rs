pub mod options;
pub mod render_config;
pub mod render_result;
pub mod render_target;
pub mod svg;
pub mod viewport;

pub use options::{InputOrder, OPTIONS_VERSION, Orientation, RenderOptions, Theme};
pub use render_config::{PreviewSettings, RenderConfig};
pub use render_result::{FailureKind, RenderFailure, RenderResult};
pub use render_target::RenderTarget;
pub use svg::extract_svg;
pub use viewport::{CssTransform, ViewBox, ViewState};
