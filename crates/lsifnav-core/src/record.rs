//! Stored occurrences and the navigation records produced from them.

use crate::id::Id;
use serde::{Deserialize, Serialize};

/// A located token ("range") in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Zero-based line.
    pub line: u32,

    /// Zero-based character offset within the line.
    pub character: u32,

    /// Result set owning this range, once an item edge reveals it.
    pub result_set: Option<Id>,
}

impl Occurrence {
    /// Creates an occurrence with no owner.
    pub fn new(line: u32, character: u32) -> Self {
        Self {
            line,
            character,
            result_set: None,
        }
    }

    /// Navigation link to this occurrence inside `document_path`.
    ///
    /// Links use one-based line numbers.
    pub fn link(&self, document_path: &str) -> String {
        format!("{}#L{}", document_path, u64::from(self.line) + 1)
    }
}

/// One entry of a record's reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePath {
    pub path: String,
}

/// Serialized navigation data for one range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRecord {
    pub start_line: u32,
    pub start_char: u32,
    pub definition_path: Option<String>,
    pub hover: Option<String>,
    pub references: Vec<ReferencePath>,
}

impl NavigationRecord {
    /// A record with location only: no definition, hover or references.
    pub fn bare(occurrence: &Occurrence) -> Self {
        Self {
            start_line: occurrence.line,
            start_char: occurrence.character,
            definition_path: None,
            hover: None,
            references: Vec::new(),
        }
    }
}
