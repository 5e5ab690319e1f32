//! Core data model for harvested classification entries
//!
//! A harvest run produces flat [`Record`]s, one per classification item
//! discovered. Expected fetch failures (a non-success HTTP status for one
//! code) are part of the data model: they become `Failed` records rather
//! than errors, so a run can complete with partial coverage visible in the
//! output instead of silently dropping a subtree.

use std::fmt;

/// An opaque classification code driving one fetch (e.g. "IX" or "I70-I79")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConceptCode(String);

impl ConceptCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConceptCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConceptCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for ConceptCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl AsRef<str> for ConceptCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The three levels of the classification hierarchy
///
/// Records themselves are level-agnostic; the level names the columns a
/// record collection is exported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Chapter,
    Block,
    Category,
}

impl Level {
    /// Column header for the parent code, if the level has a parent
    pub fn parent_column(&self) -> Option<&'static str> {
        match self {
            Level::Chapter => None,
            Level::Block => Some("chapter:code"),
            Level::Category => Some("block:code"),
        }
    }

    /// Column header for the item code
    pub fn code_column(&self) -> &'static str {
        match self {
            Level::Chapter => "chapter:code",
            Level::Block => "block:code",
            Level::Category => "category:code",
        }
    }

    /// Column header for the item description
    pub fn description_column(&self) -> &'static str {
        match self {
            Level::Chapter => "chapter:description",
            Level::Block => "block:description",
            Level::Category => "category:description",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Chapter => "chapter",
            Level::Block => "block",
            Level::Category => "category",
        };
        f.write_str(name)
    }
}

/// One harvested item, or one recorded failure for a parent code
///
/// `Failed` carries the HTTP status for status failures; `status` is `None`
/// when a transport error or timeout was degraded to a record by the pool's
/// fail-soft mode.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Record {
    Concept {
        parent: Option<ConceptCode>,
        code: ConceptCode,
        description: String,
    },
    Failed {
        parent: ConceptCode,
        status: Option<u16>,
        reason: String,
    },
}

impl Record {
    /// Creates a successful record
    pub fn concept(
        parent: Option<ConceptCode>,
        code: impl Into<ConceptCode>,
        description: impl Into<String>,
    ) -> Self {
        Record::Concept {
            parent,
            code: code.into(),
            description: description.into(),
        }
    }

    /// Creates a failure record for a parent code
    pub fn failed(
        parent: impl Into<ConceptCode>,
        status: Option<u16>,
        reason: impl Into<String>,
    ) -> Self {
        Record::Failed {
            parent: parent.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Returns true if this record marks a failed fetch
    pub fn is_failed(&self) -> bool {
        matches!(self, Record::Failed { .. })
    }

    /// The item code, for successful records
    pub fn code(&self) -> Option<&ConceptCode> {
        match self {
            Record::Concept { code, .. } => Some(code),
            Record::Failed { .. } => None,
        }
    }

    /// The parent code this record was fetched under, if any
    pub fn parent(&self) -> Option<&ConceptCode> {
        match self {
            Record::Concept { parent, .. } => parent.as_ref(),
            Record::Failed { parent, .. } => Some(parent),
        }
    }
}

/// Extracts the codes of all successful records, in order
///
/// Failed records contribute nothing: a failed parent has no children to
/// fetch at the next level.
pub fn successful_codes(records: &[Record]) -> Vec<ConceptCode> {
    records.iter().filter_map(|r| r.code().cloned()).collect()
}
