//! CSV export of harvested record collections
//!
//! Each level is written as one table. Failure metadata lives in dedicated
//! `status`/`reason` columns so it never masquerades as a code or a
//! description.

use crate::record::{Level, Record};
use crate::Result;
use std::path::Path;

/// Writes one level's records as a CSV table
///
/// Columns: the level's parent code (if any), code, description, `status`
/// (`ok` for successful rows, the HTTP status for status failures, empty
/// for transport failures) and `reason`.
pub fn write_level_csv(path: &Path, level: Level, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<&str> = Vec::new();
    if let Some(parent_column) = level.parent_column() {
        header.push(parent_column);
    }
    header.push(level.code_column());
    header.push(level.description_column());
    header.push("status");
    header.push("reason");
    writer.write_record(&header)?;

    let has_parent = level.parent_column().is_some();
    for record in records {
        let mut row: Vec<String> = Vec::new();
        match record {
            Record::Concept {
                parent,
                code,
                description,
            } => {
                if has_parent {
                    row.push(parent.as_ref().map(|p| p.to_string()).unwrap_or_default());
                }
                row.push(code.to_string());
                row.push(description.clone());
                row.push("ok".to_string());
                row.push(String::new());
            }
            Record::Failed {
                parent,
                status,
                reason,
            } => {
                if has_parent {
                    row.push(parent.to_string());
                }
                row.push(String::new());
                row.push(String::new());
                row.push(status.map(|s| s.to_string()).unwrap_or_default());
                row.push(reason.clone());
            }
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}
