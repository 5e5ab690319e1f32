//! Chapter level: rendered-tree fetch and parsing
//!
//! The chapter list is the root of the classification tree and is built
//! client-side, so it is taken from a rendered page rather than a raw HTTP
//! response. Parsing is a pure function over the resulting HTML.

use crate::browser::BrowserSession;
use crate::harvest::{parse_selector, strip_code_prefix, tidy_label};
use crate::record::Record;
use crate::{HarvestError, Result};
use scraper::Html;
use std::time::Duration;

/// Selector that signals the chapter tree has rendered
pub const CHAPTER_TREE_READY: &str = "#ygtvc1 .ygtvitem";

/// Fetches the rendered version root and parses the chapter tree
pub async fn fetch_chapters(
    session: &BrowserSession,
    base_url: &str,
    timeout: Duration,
) -> Result<Vec<Record>> {
    let html = session
        .fetch_rendered(base_url, CHAPTER_TREE_READY, timeout)
        .await?;
    parse_chapters(&html)
}

/// Parses chapter records out of the rendered tree HTML
///
/// Each tree item carries a label whose `.icode` span is the chapter code;
/// the rest of the label text is the description.
pub fn parse_chapters(html: &str) -> Result<Vec<Record>> {
    let document = Html::parse_document(html);
    let item_selector = parse_selector("chapter tree", "#ygtvc1 .ygtvitem")?;
    let label_selector = parse_selector("chapter tree", ".ygtvlabel")?;
    let code_selector = parse_selector("chapter tree", ".icode")?;

    let mut records = Vec::new();
    for item in document.select(&item_selector) {
        let label = match item.select(&label_selector).next() {
            Some(label) => label,
            None => continue,
        };
        let code = match label.select(&code_selector).next() {
            Some(el) => tidy_label(&el.text().collect::<String>()),
            None => continue,
        };
        if code.is_empty() {
            continue;
        }
        let label_text = tidy_label(&label.text().collect::<String>());
        let description = strip_code_prefix(&label_text, &code).to_string();
        records.push(Record::concept(None, code, description));
    }

    if records.is_empty() {
        return Err(HarvestError::HtmlParse {
            context: "chapter tree".to_string(),
            message: "no chapter items found".to_string(),
        });
    }

    Ok(records)
}
