//! Block level: concept page fetch and parsing
//!
//! Blocks are listed on a chapter's concept page, which is plain
//! server-rendered HTML.

use crate::harvest::{parse_selector, tidy_label};
use crate::record::{ConceptCode, Record};
use crate::{HarvestError, Result};
use reqwest::Client;
use scraper::Html;

/// Fetches the blocks of one chapter
///
/// A non-success HTTP status is an expected failure and is encoded as a
/// `Failed` record; transport errors propagate.
pub async fn fetch_blocks(
    client: &Client,
    base_url: &str,
    chapter: ConceptCode,
) -> Result<Vec<Record>> {
    let url = format!("{}/GetConcept?ConceptId={}", base_url, chapter);
    let response = client.get(&url).send().await.map_err(|source| {
        HarvestError::Http {
            url: url.clone(),
            source,
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("GetConcept for {} returned {}", chapter, status);
        let reason = status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string();
        return Ok(vec![Record::failed(
            chapter,
            Some(status.as_u16()),
            reason,
        )]);
    }

    let body = response
        .text()
        .await
        .map_err(|source| HarvestError::Http { url, source })?;
    parse_blocks(&body, &chapter)
}

/// Parses block records out of a chapter's concept page
pub fn parse_blocks(html: &str, chapter: &ConceptCode) -> Result<Vec<Record>> {
    let document = Html::parse_document(html);
    let block_selector = parse_selector("block list", "li.Blocklist1")?;
    let code_selector = parse_selector("block list", "a.code")?;
    let label_selector = parse_selector("block list", "span.label")?;

    let mut records = Vec::new();
    for block in document.select(&block_selector) {
        let code = match block.select(&code_selector).next() {
            Some(el) => tidy_label(&el.text().collect::<String>()),
            None => continue,
        };
        if code.is_empty() {
            continue;
        }
        let description = match block.select(&label_selector).next() {
            Some(el) => tidy_label(&el.text().collect::<String>()),
            None => String::new(),
        };
        records.push(Record::concept(Some(chapter.clone()), code, description));
    }

    Ok(records)
}
