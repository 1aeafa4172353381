use super::{remove_excess_whitespace, Error};
use scraper::{ElementRef, Selector};

/// Text content of the first match of `selector` under `element`.
pub fn text_from_selection(
    selector: &Selector,
    element: ElementRef<'_>,
    parent_label: &str,
    child_label: &str,
) -> Result<String, Error> {
    let child = element
        .select(selector)
        .next() // first match
        .ok_or_else(|| {
            Error::HtmlParse(format!(
                "Every {parent_label} element should have a {child_label}."
            ))
        })?;
    text_content(child, child_label)
}

/// All text under `element` joined, with runs of whitespace collapsed and the ends trimmed.
pub fn text_content(element: ElementRef<'_>, text_label: &str) -> Result<String, Error> {
    let joined: String = element.text().collect();
    let text = remove_excess_whitespace(joined.trim());
    if text.is_empty() {
        // capitalize the first letter of the label
        let mut text_label = text_label.to_string();
        text_label[..1].make_ascii_uppercase();
        return Err(Error::TextNodeParse(format!(
            "{text_label} should have text inside."
        )));
    }
    Ok(text.into_owned())
}
