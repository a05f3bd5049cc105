const OPEN_TAG: &str = "<svg";
const CLOSE_TAG: &str = "</svg>";

/// Extracts the first SVG document from arbitrary captured output.
///
/// Without a closing tag everything from the opening tag onward is returned,
/// so truncated output still shows what was produced.
pub fn extract_svg(text: &str) -> Option<&str> {
    let start = text.find(OPEN_TAG)?;
    let rest = &text[start..];

    let fragment = match rest.find(CLOSE_TAG) {
        Some(close) => &rest[..close + CLOSE_TAG.len()],
        None => rest,
    };

    Some(fragment.trim())
}
