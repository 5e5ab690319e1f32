//! Harvest orchestration and per-level fetch glue
//!
//! A harvest run walks the hierarchy top-down:
//! 1. Chapters, from the rendered tree of the version root (one browser
//!    session, torn down before the HTTP levels start)
//! 2. Blocks, fanned out over the chapter codes
//! 3. Categories, fanned out over the block codes
//!
//! Only successful records feed the next level's key list; failed fetches
//! stay visible as `Failed` rows in the exported tables.

mod blocks;
mod categories;
mod chapters;
mod client;

pub use blocks::{fetch_blocks, parse_blocks};
pub use categories::{fetch_categories, parse_categories};
pub use chapters::{fetch_chapters, parse_chapters, CHAPTER_TREE_READY};
pub use client::build_http_client;

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::output::{write_level_csv, write_markdown_summary, HarvestSummary};
use crate::pool::fan_out;
use crate::record::{successful_codes, Level};
use crate::{HarvestError, Result};
use scraper::Selector;
use std::path::Path;
use std::time::Duration;

/// Collapses the CR/LF the site embeds in labels and trims the result
pub(crate) fn tidy_label(raw: &str) -> String {
    raw.replace('\r', "").replace('\n', "").trim().to_string()
}

/// Removes the leading code from a label text, leaving the description
pub(crate) fn strip_code_prefix<'a>(label: &'a str, code: &str) -> &'a str {
    label.strip_prefix(code).unwrap_or(label).trim_start()
}

/// Compiles a static CSS selector, reporting the parse context on failure
pub(crate) fn parse_selector(context: &str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| HarvestError::HtmlParse {
        context: context.to_string(),
        message: format!("invalid selector '{}': {}", selector, e),
    })
}

/// Runs a full harvest: all three levels, CSV export, and summary
pub async fn run_harvest(config: &Config, config_hash: &str) -> Result<HarvestSummary> {
    let started = chrono::Local::now();
    let base_url = config.harvest.endpoint_base();
    let user_agent = config.user_agent.header_value();
    let options = config.harvest.pool_options();

    tracing::info!(
        "Harvesting ICD-10 release {} from {}",
        config.harvest.version,
        base_url
    );

    // Level 1: chapters
    let session = BrowserSession::launch(&config.browser, &user_agent).await?;
    let navigation_timeout = Duration::from_secs(config.browser.navigation_timeout_secs);
    let chapters_result = fetch_chapters(&session, &base_url, navigation_timeout).await;
    session.shutdown().await;
    let chapters = chapters_result?;
    tracing::info!("Chapter level: {} records", chapters.len());

    let client = build_http_client(&config.user_agent)?;

    // Level 2: blocks, fanned out over chapter codes
    let blocks = {
        let client = client.clone();
        let base = base_url.clone();
        fan_out(
            move |code| {
                let client = client.clone();
                let base = base.clone();
                async move { fetch_blocks(&client, &base, code).await }
            },
            successful_codes(&chapters),
            &options,
        )
        .await?
    };
    tracing::info!(
        "Block level: {} records ({} failed)",
        blocks.len(),
        blocks.iter().filter(|r| r.is_failed()).count()
    );

    // Level 3: categories, fanned out over block codes
    let categories = {
        let client = client.clone();
        let base = base_url.clone();
        fan_out(
            move |code| {
                let client = client.clone();
                let base = base.clone();
                async move { fetch_categories(&client, &base, code).await }
            },
            successful_codes(&blocks),
            &options,
        )
        .await?
    };
    tracing::info!(
        "Category level: {} records ({} failed)",
        categories.len(),
        categories.iter().filter(|r| r.is_failed()).count()
    );

    // Export
    write_level_csv(
        Path::new(&config.output.chapters_path),
        Level::Chapter,
        &chapters,
    )?;
    write_level_csv(Path::new(&config.output.blocks_path), Level::Block, &blocks)?;
    write_level_csv(
        Path::new(&config.output.categories_path),
        Level::Category,
        &categories,
    )?;
    tracing::info!(
        "Tables written: {}, {}, {}",
        config.output.chapters_path,
        config.output.blocks_path,
        config.output.categories_path
    );

    let finished = chrono::Local::now();
    let summary = HarvestSummary::from_records(
        &config.harvest.version,
        config_hash,
        started,
        finished,
        &chapters,
        &blocks,
        &categories,
    );
    write_markdown_summary(&summary, Path::new(&config.output.summary_path))?;

    Ok(summary)
}
