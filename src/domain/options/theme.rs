use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visual style passed to the renderer as `--style`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Classic,
    Blueprint,
    Midnight,
    Mono,
    Vibrant,
}

impl Theme {
    pub fn all_variants() -> &'static [Theme] {
        &[
            Theme::Classic,
            Theme::Blueprint,
            Theme::Midnight,
            Theme::Mono,
            Theme::Vibrant,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Classic => "Classic",
            Theme::Blueprint => "Blueprint",
            Theme::Midnight => "Midnight",
            Theme::Mono => "Monochrome",
            Theme::Vibrant => "Vibrant",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Classic => write!(f, "classic"),
            Theme::Blueprint => write!(f, "blueprint"),
            Theme::Midnight => write!(f, "midnight"),
            Theme::Mono => write!(f, "mono"),
            Theme::Vibrant => write!(f, "vibrant"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(Theme::Classic),
            "blueprint" => Ok(Theme::Blueprint),
            "midnight" => Ok(Theme::Midnight),
            "mono" => Ok(Theme::Mono),
            "vibrant" => Ok(Theme::Vibrant),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}
