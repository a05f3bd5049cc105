use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction in which signals flow across the schematic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn all_variants() -> &'static [Orientation] {
        &[Orientation::Horizontal, Orientation::Vertical]
    }

    pub fn label(self) -> &'static str {
        match self {
            Orientation::Horizontal => "Left to right",
            Orientation::Vertical => "Top to bottom",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            _ => Err(format!("Unknown orientation: {}", s)),
        }
    }
}
