//! Category level: children-concepts JSON fetch and parsing
//!
//! Categories come from a JSON endpoint whose items embed a rendered label
//! fragment; the code is carried verbatim, the description sits inside the
//! fragment's label anchor.

use crate::harvest::{parse_selector, strip_code_prefix, tidy_label};
use crate::record::{ConceptCode, Record};
use crate::{HarvestError, Result};
use reqwest::Client;
use scraper::Html;
use serde::Deserialize;

/// One child concept as returned by the JSON endpoint
#[derive(Debug, Deserialize)]
struct ChildConcept {
    #[serde(rename = "ID")]
    id: String,
    html: String,
}

/// Fetches the categories of one block
///
/// A non-success HTTP status is an expected failure and is encoded as a
/// `Failed` record; transport errors propagate.
pub async fn fetch_categories(
    client: &Client,
    base_url: &str,
    block: ConceptCode,
) -> Result<Vec<Record>> {
    let url = format!(
        "{}/JsonGetChildrenConcepts?ConceptId={}&useHtml=true&showAdoptedChildren=true",
        base_url, block
    );
    let response = client.get(&url).send().await.map_err(|source| {
        HarvestError::Http {
            url: url.clone(),
            source,
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("JsonGetChildrenConcepts for {} returned {}", block, status);
        let reason = status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string();
        return Ok(vec![Record::failed(block, Some(status.as_u16()), reason)]);
    }

    let body = response
        .text()
        .await
        .map_err(|source| HarvestError::Http { url, source })?;
    parse_categories(&body, &block)
}

/// Parses category records out of a children-concepts JSON payload
pub fn parse_categories(json: &str, block: &ConceptCode) -> Result<Vec<Record>> {
    let children: Vec<ChildConcept> =
        serde_json::from_str(json).map_err(|source| HarvestError::Json {
            context: format!("children of {}", block),
            source,
        })?;

    let label_selector = parse_selector("category children", "a.ygtvlabel")?;

    let mut records = Vec::new();
    for child in children {
        let fragment = Html::parse_fragment(&child.html);
        let label_text = match fragment.select(&label_selector).next() {
            Some(el) => tidy_label(&el.text().collect::<String>()),
            None => String::new(),
        };
        let description = strip_code_prefix(&label_text, &child.id).to_string();
        records.push(Record::concept(Some(block.clone()), child.id, description));
    }

    Ok(records)
}
