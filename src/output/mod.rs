//! Output module for tabular export and run summaries
//!
//! This module handles:
//! - Writing each level's records as a CSV table
//! - Building and printing run summary statistics
//! - Writing the markdown run summary

mod csv_output;
mod summary;

pub use csv_output::write_level_csv;
pub use summary::{
    format_markdown_summary, print_summary, write_markdown_summary, HarvestSummary,
};
