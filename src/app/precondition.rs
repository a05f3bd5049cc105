use std::fmt;

use log::warn;
use regex::Regex;

use crate::domain::{PreviewSettings, RenderTarget};

/// Reason a render was skipped before any process was spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Untrusted,
    Excluded { file_name: String, pattern: String },
    NoTarget,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Untrusted => write!(
                f,
                "Schematic preview is disabled in untrusted workspaces"
            ),
            Self::Excluded { file_name, pattern } => write!(
                f,
                "{} matches the exclusion pattern '{}' and was not rendered",
                file_name, pattern
            ),
            Self::NoTarget => write!(f, "No SystemVerilog file to render"),
        }
    }
}

pub fn check_preconditions<'a>(
    settings: &PreviewSettings,
    target: Option<&'a RenderTarget>,
    trusted: bool,
) -> Result<&'a RenderTarget, Notice> {
    if !trusted {
        return Err(Notice::Untrusted);
    }
    let target = target.ok_or(Notice::NoTarget)?;

    if let (Some(pattern), Some(file_name)) = (&settings.exclude_pattern, target.file_name())
        && is_excluded(pattern, file_name)
    {
        return Err(Notice::Excluded {
            file_name: file_name.to_string(),
            pattern: pattern.clone(),
        });
    }

    Ok(target)
}

/// An invalid pattern excludes nothing.
fn is_excluded(pattern: &str, file_name: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }
    match Regex::new(pattern) {
        Ok(regex) => regex.is_match(file_name),
        Err(e) => {
            warn!("ignoring invalid exclude pattern '{}': {}", pattern, e);
            false
        }
    }
}
