//! Self-contained HTML document shown in the preview panel.

mod form;

use std::path::Path;

use log::debug;
use roxmltree::{Document, ParsingOptions};
use serde_json::json;

use crate::app::orchestrator::RenderOutcome;
use crate::domain::viewport::{
    MAX_SCALE, MIN_SCALE, WHEEL_SENSITIVITY, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};
use crate::domain::{RenderOptions, RenderResult, ViewBox};

pub use form::settings_form;

const SCRIPT: &str = include_str!("../assets/preview.js");
const STYLE: &str = include_str!("../assets/preview.css");

pub fn render_document(outcome: &RenderOutcome, options: &RenderOptions, source: &Path) -> String {
    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (body, view_box) = match outcome {
        RenderOutcome::Rendered(RenderResult::Success { svg }) => (
            format!("<div id=\"image\" class=\"image\">{}</div>", svg),
            initial_view_box(svg),
        ),
        RenderOutcome::Rendered(RenderResult::Failure(failure)) => (
            format!(
                "<pre class=\"diagnostic\">{}</pre>",
                escape_html(&failure.to_string())
            ),
            None,
        ),
        RenderOutcome::Skipped(notice) => (
            format!("<p class=\"notice\">{}</p>", escape_html(&notice.to_string())),
            None,
        ),
    };

    let title = escape_html(&file_name);
    let form = settings_form(options);
    let state = embedded_state(options, view_box);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Schematic: {title}</title>
<style>
{STYLE}</style>
</head>
<body>
<div class="toolbar">
<button type="button" id="zoom-in" title="Zoom in (+)">+</button>
<button type="button" id="zoom-out" title="Zoom out (-)">&minus;</button>
<button type="button" id="zoom-reset" title="Reset view (0)">Reset</button>
<button type="button" id="settings-toggle" title="Settings (s)">Settings</button>
<span class="source">{title}</span>
</div>
{form}
<main id="container" class="container">{body}</main>
<script id="svschem-state" type="application/json">{state}</script>
<script>
{SCRIPT}</script>
</body>
</html>
"#
    )
}

/// The image's own `viewBox`, when the SVG is well-formed and declares a usable one.
pub fn initial_view_box(svg: &str) -> Option<ViewBox> {
    let parsing = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = match Document::parse_with_options(svg, parsing) {
        Ok(document) => document,
        Err(e) => {
            debug!("svg is not well-formed, using css transform: {}", e);
            return None;
        }
    };

    let root = document.root_element();
    if root.tag_name().name() != "svg" {
        return None;
    }
    root.attribute("viewBox").and_then(ViewBox::parse)
}

/// JSON for the state script block. `<` is escaped so no payload can close the tag.
fn embedded_state(options: &RenderOptions, view_box: Option<ViewBox>) -> String {
    let state = json!({
        "settings": options,
        "viewBox": view_box.map(|vb| [vb.x, vb.y, vb.width, vb.height]),
        "zoom": {
            "zoomIn": ZOOM_IN_FACTOR,
            "zoomOut": ZOOM_OUT_FACTOR,
            "wheelSensitivity": WHEEL_SENSITIVITY,
            "minScale": MIN_SCALE,
            "maxScale": MAX_SCALE,
        },
    });
    state.to_string().replace('<', "\\u003c")
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
