use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the renderer orders module inputs along the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputOrder {
    #[default]
    Alpha,
    Ports,
    Auto,
}

impl InputOrder {
    pub fn all_variants() -> &'static [InputOrder] {
        &[InputOrder::Alpha, InputOrder::Ports, InputOrder::Auto]
    }

    pub fn label(self) -> &'static str {
        match self {
            InputOrder::Alpha => "Alphabetical",
            InputOrder::Ports => "Port declaration order",
            InputOrder::Auto => "Automatic",
        }
    }
}

impl fmt::Display for InputOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputOrder::Alpha => write!(f, "alpha"),
            InputOrder::Ports => write!(f, "ports"),
            InputOrder::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for InputOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alpha" => Ok(InputOrder::Alpha),
            "ports" => Ok(InputOrder::Ports),
            "auto" => Ok(InputOrder::Auto),
            _ => Err(format!("Unknown input order: {}", s)),
        }
    }
}
