// src/page/title.rs
// Pulls the human-readable title out of an HTML page.

use scraper::{Html, Selector};

/// Returns the text of the first `<title>` element with whitespace collapsed,
/// or `None` when the page has no usable title.
pub fn extract_title(html: &str) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let document = Html::parse_document(html);

    let element = document.select(&selector).next()?;
    let text = element.text().collect::<String>();
    let title = text.split_whitespace().collect::<Vec<_>>().join(" ");

    (!title.is_empty()).then_some(title)
}
