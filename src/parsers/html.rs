use crate::error::HarvestError;
use scraper::{ElementRef, Node, Selector};

/// Compiles a CSS selector, keeping the offending text in the error
pub fn compile_selector(css: &str) -> Result<Selector, HarvestError> {
    Selector::parse(css).map_err(|e| HarvestError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// All descendant text of an element, trimmed at both ends only.
///
/// Inner whitespace and line breaks are kept as they appear in the markup,
/// and every `<br>` becomes a newline.
pub fn trimmed_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e) if e.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Text of the first match of `selector` inside `scope`.
///
/// Returns `None` when nothing matches or the first match is blank.
/// Further matches are ignored.
pub fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = scope.select(selector).next()?;
    let text = trimmed_text(element);
    if text.is_empty() { None } else { Some(text) }
}
