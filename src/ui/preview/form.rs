use std::fmt::Display;

use crate::domain::{InputOrder, Orientation, RenderOptions, Theme};

use super::escape_html;

/// Settings form; field names match the keys of an `updateSettings` message.
pub fn settings_form(options: &RenderOptions) -> String {
    let fields = [
        select(
            "inputOrder",
            "Input order",
            InputOrder::all_variants(),
            options.input_order,
            InputOrder::label,
        ),
        select("theme", "Style", Theme::all_variants(), options.theme, Theme::label),
        select(
            "orientation",
            "Orientation",
            Orientation::all_variants(),
            options.orientation,
            Orientation::label,
        ),
        number("gridX", "Grid X", options.grid_x),
        number("gridY", "Grid Y", options.grid_y),
        checkbox("noSymmetry", "Disable symmetry", options.no_symmetry),
        checkbox("fanoutWires", "Fan-out wires", options.fanout_wires),
        checkbox("noClockTriangle", "Hide clock triangles", options.no_clock_triangle),
        checkbox("noCaption", "Hide caption", options.no_caption),
        checkbox("showTypes", "Show port types", options.show_types),
        checkbox("table", "Port table", options.table),
    ];

    format!(
        "<form id=\"settings\" class=\"settings\" hidden>\n{}\
         <div class=\"actions\">\
         <button type=\"button\" id=\"settings-apply\">Apply</button>\
         <button type=\"button\" id=\"settings-reset\">Reset to defaults</button>\
         </div>\n</form>",
        fields.concat()
    )
}

fn select<T>(name: &str, label: &str, variants: &[T], current: T, label_of: fn(T) -> &'static str) -> String
where
    T: Copy + PartialEq + Display,
{
    let choices: String = variants
        .iter()
        .map(|&variant| {
            let selected = if variant == current { " selected" } else { "" };
            format!(
                "<option value=\"{}\"{}>{}</option>",
                variant,
                selected,
                escape_html(label_of(variant))
            )
        })
        .collect();

    format!(
        "<label for=\"{name}\">{label}</label><select id=\"{name}\" name=\"{name}\">{choices}</select>\n"
    )
}

fn number(name: &str, label: &str, value: u32) -> String {
    format!(
        "<label for=\"{name}\">{label}</label>\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"0\" step=\"1\" value=\"{value}\">\n"
    )
}

fn checkbox(name: &str, label: &str, checked: bool) -> String {
    let checked = if checked { " checked" } else { "" };
    format!(
        "<label for=\"{name}\">{label}</label>\
         <input type=\"checkbox\" id=\"{name}\" name=\"{name}\"{checked}>\n"
    )
}
