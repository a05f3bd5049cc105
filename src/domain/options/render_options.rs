use serde::{Deserialize, Serialize};

use super::{InputOrder, Orientation, Theme};

/// Bumped whenever a field is added, removed or changes meaning.
pub const OPTIONS_VERSION: u32 = 1;

/// Rendering knobs exposed in the settings form.
///
/// Every field's default matches the renderer's own default, so a default
/// value never needs to be spelled out on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    pub input_order: InputOrder,
    pub theme: Theme,
    pub orientation: Orientation,
    pub grid_x: u32,
    pub grid_y: u32,
    pub no_symmetry: bool,
    pub fanout_wires: bool,
    pub no_clock_triangle: bool,
    pub no_caption: bool,
    pub show_types: bool,
    pub table: bool,
}

impl RenderOptions {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
