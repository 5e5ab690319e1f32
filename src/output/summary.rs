//! Run summary: counts per level, timing, and markdown export

use crate::record::Record;
use crate::Result;
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Summary statistics for one harvest run
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    pub version: String,
    pub config_hash: String,
    pub started_at: String,
    pub finished_at: String,
    pub duration_seconds: i64,

    pub chapters: usize,
    pub chapters_failed: usize,
    pub blocks: usize,
    pub blocks_failed: usize,
    pub categories: usize,
    pub categories_failed: usize,
}

impl HarvestSummary {
    /// Builds a summary from the three level collections
    pub fn from_records(
        version: &str,
        config_hash: &str,
        started: DateTime<Local>,
        finished: DateTime<Local>,
        chapters: &[Record],
        blocks: &[Record],
        categories: &[Record],
    ) -> Self {
        let failed = |records: &[Record]| records.iter().filter(|r| r.is_failed()).count();
        Self {
            version: version.to_string(),
            config_hash: config_hash.to_string(),
            started_at: started.format(TIMESTAMP_FORMAT).to_string(),
            finished_at: finished.format(TIMESTAMP_FORMAT).to_string(),
            duration_seconds: (finished - started).num_seconds(),
            chapters: chapters.len(),
            chapters_failed: failed(chapters),
            blocks: blocks.len(),
            blocks_failed: failed(blocks),
            categories: categories.len(),
            categories_failed: failed(categories),
        }
    }

    /// Total records across all levels
    pub fn total_records(&self) -> usize {
        self.chapters + self.blocks + self.categories
    }

    /// Total failed fetches across all levels
    pub fn total_failed(&self) -> usize {
        self.chapters_failed + self.blocks_failed + self.categories_failed
    }
}

/// Prints a harvest summary to stdout
pub fn print_summary(summary: &HarvestSummary) {
    println!("=== Harvest Summary ===\n");
    println!("Release:    {}", summary.version);
    println!("Started:    {}", summary.started_at);
    println!("Finished:   {}", summary.finished_at);
    println!("Duration:   {}s", summary.duration_seconds);
    println!();
    println!("Chapters:   {} ({} failed)", summary.chapters, summary.chapters_failed);
    println!("Blocks:     {} ({} failed)", summary.blocks, summary.blocks_failed);
    println!("Categories: {} ({} failed)", summary.categories, summary.categories_failed);
    println!();
    println!(
        "Total:      {} records, {} failed fetches",
        summary.total_records(),
        summary.total_failed()
    );
}

/// Formats a harvest summary as markdown
pub fn format_markdown_summary(summary: &HarvestSummary) -> String {
    let mut md = String::new();

    md.push_str("# ICD-10 Harvest Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Release**: {}\n", summary.version));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        summary.duration_seconds
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    md.push_str("## Records\n\n");
    md.push_str("| Level | Records | Failed fetches |\n");
    md.push_str("|-------|---------|----------------|\n");
    md.push_str(&format!(
        "| Chapters | {} | {} |\n",
        summary.chapters, summary.chapters_failed
    ));
    md.push_str(&format!(
        "| Blocks | {} | {} |\n",
        summary.blocks, summary.blocks_failed
    ));
    md.push_str(&format!(
        "| Categories | {} | {} |\n",
        summary.categories, summary.categories_failed
    ));
    md.push_str(&format!(
        "| **Total** | {} | {} |\n",
        summary.total_records(),
        summary.total_failed()
    ));

    md
}

/// Writes the markdown summary to a file
pub fn write_markdown_summary(summary: &HarvestSummary, path: &Path) -> Result<()> {
    let markdown = format_markdown_summary(summary);
    let mut file = File::create(path)?;
    file.write_all(markdown.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> HarvestSummary {
        let started = Local::now();
        let finished = started + chrono::Duration::seconds(90);
        HarvestSummary::from_records(
            "2019",
            "abc123",
            started,
            finished,
            &[Record::concept(None, "I", "Certain infectious diseases")],
            &[
                Record::concept(Some("I".into()), "A00-A09", "Intestinal infectious diseases"),
                Record::failed("II", Some(404), "Not Found"),
            ],
            &[Record::concept(Some("A00-A09".into()), "A00", "Cholera")],
        )
    }

    #[test]
    fn test_summary_counts() {
        let summary = sample_summary();
        assert_eq!(summary.chapters, 1);
        assert_eq!(summary.blocks, 2);
        assert_eq!(summary.blocks_failed, 1);
        assert_eq!(summary.categories, 1);
        assert_eq!(summary.total_records(), 4);
        assert_eq!(summary.total_failed(), 1);
        assert_eq!(summary.duration_seconds, 90);
    }

    #[test]
    fn test_markdown_summary_contains_counts() {
        let md = format_markdown_summary(&sample_summary());
        assert!(md.contains("# ICD-10 Harvest Summary"));
        assert!(md.contains("- **Release**: 2019"));
        assert!(md.contains("| Blocks | 2 | 1 |"));
        assert!(md.contains("| **Total** | 4 | 1 |"));
    }

    #[test]
    fn test_write_markdown_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");
        write_markdown_summary(&sample_summary(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Config Hash**: abc123"));
    }
}
