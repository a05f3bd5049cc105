mod input_order;
mod orientation;
mod render_options;
mod theme;

pub use input_order::InputOrder;
pub use orientation::Orientation;
pub use render_options::{OPTIONS_VERSION, RenderOptions};
pub use theme::Theme;
