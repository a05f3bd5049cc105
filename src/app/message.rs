//! Messages posted by the preview document back to the host.
//!
//! The document is untrusted input: settings are coerced field by field into a
//! [`RenderOptions`], never deserialized wholesale.

use std::str::FromStr;

use log::warn;
use serde_json::{Map, Value};

use crate::domain::RenderOptions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMessage {
    UpdateSettings(RenderOptions),
    ResetSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("Message must be a JSON object")]
    NotAnObject,
    #[error("Message has no command")]
    MissingCommand,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("updateSettings requires a settings object")]
    MissingSettings,
}

pub fn parse_view_message(value: &Value) -> Result<ViewMessage, MessageError> {
    let object = value.as_object().ok_or(MessageError::NotAnObject)?;
    let command = object
        .get("command")
        .and_then(Value::as_str)
        .ok_or(MessageError::MissingCommand)?;

    match command {
        "updateSettings" => {
            let settings = object
                .get("settings")
                .and_then(Value::as_object)
                .ok_or(MessageError::MissingSettings)?;
            Ok(ViewMessage::UpdateSettings(coerce_options(settings)))
        }
        "resetSettings" => Ok(ViewMessage::ResetSettings),
        other => Err(MessageError::UnknownCommand(other.to_string())),
    }
}

/// Builds options from loosely typed input. Missing, ill-typed or unknown
/// values fall back to defaults; keys match case-insensitively ignoring `-`/`_`.
pub fn coerce_options(settings: &Map<String, Value>) -> RenderOptions {
    overlay_options(RenderOptions::default(), settings)
}

/// Like [`coerce_options`], but keys absent from `settings` keep their value in `base`.
pub fn overlay_options(base: RenderOptions, settings: &Map<String, Value>) -> RenderOptions {
    let mut options = base;

    for (key, value) in settings {
        match normalize_key(key).as_str() {
            "inputorder" => options.input_order = coerce_choice(key, value),
            "theme" | "style" => options.theme = coerce_choice(key, value),
            "orientation" => options.orientation = coerce_choice(key, value),
            "gridx" => options.grid_x = coerce_count(key, value),
            "gridy" => options.grid_y = coerce_count(key, value),
            "nosymmetry" => options.no_symmetry = coerce_switch(key, value),
            "fanoutwires" => options.fanout_wires = coerce_switch(key, value),
            "noclocktriangle" => options.no_clock_triangle = coerce_switch(key, value),
            "nocaption" => options.no_caption = coerce_switch(key, value),
            "showtypes" => options.show_types = coerce_switch(key, value),
            "table" => options.table = coerce_switch(key, value),
            _ => warn!("ignoring unknown setting '{}'", key),
        }
    }

    options
}

/// Applies `key=value` pairs from the command line on top of `base`.
pub fn options_from_pairs<'a, I>(base: RenderOptions, pairs: I) -> RenderOptions
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let map = pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
        .collect();
    overlay_options(base, &map)
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn coerce_choice<T: FromStr + Default>(key: &str, value: &Value) -> T {
    match value.as_str().map(str::parse) {
        Some(Ok(choice)) => choice,
        _ => {
            warn!("invalid value {} for '{}', using default", value, key);
            T::default()
        }
    }
}

fn coerce_count(key: &str, value: &Value) -> u32 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => n.clamp(0.0, f64::from(u32::MAX)) as u32,
        _ => {
            warn!("invalid value {} for '{}', using 0", value, key);
            0
        }
    }
}

fn coerce_switch(key: &str, value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) if s.eq_ignore_ascii_case("true") => true,
        Value::String(s) if s.eq_ignore_ascii_case("false") => false,
        _ => {
            warn!("invalid value {} for '{}', using false", value, key);
            false
        }
    }
}
