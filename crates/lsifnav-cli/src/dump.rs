//! Reading LSIF dumps.
//!
//! A dump is newline-delimited JSON. Each line is routed by its `label` to
//! the document tracker and the range store.

use crate::documents::Documents;
use lsifnav_core::StoreConfig;
use lsifnav_graph::{Ranges, RangesError};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("failed to read dump: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: {source}")]
    Ranges {
        line: usize,
        #[source]
        source: RangesError,
    },

    #[error(transparent)]
    Store(#[from] RangesError),
}

#[derive(Deserialize)]
struct Envelope {
    label: String,
}

/// A fully ingested dump.
pub struct Dump {
    pub ranges: Ranges,
    pub documents: Documents,
    /// Number of non-empty lines read.
    pub lines: usize,
}

/// Reads the dump at `path`.
///
/// `progress` is called with the running line count every `every` lines.
pub fn load(
    path: &Path,
    config: &StoreConfig,
    every: usize,
    progress: impl FnMut(usize),
) -> Result<Dump, DumpError> {
    let file = File::open(path)?;
    read(BufReader::new(file), config, every, progress)
}

/// Reads a dump from any buffered reader.
///
/// On error the partially built range store is dropped, which releases it.
pub fn read<R: BufRead>(
    reader: R,
    config: &StoreConfig,
    every: usize,
    mut progress: impl FnMut(usize),
) -> Result<Dump, DumpError> {
    let mut ranges = Ranges::with_config(config)?;
    let mut documents = Documents::new();
    let mut lines = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let envelope: Envelope = serde_json::from_str(&line).map_err(|source| DumpError::Json {
            line: number,
            source,
        })?;

        let handled = documents
            .read(&envelope.label, line.as_bytes())
            .map_err(|source| DumpError::Json {
                line: number,
                source,
            })?;
        if !handled {
            ranges
                .read(&envelope.label, line.as_bytes())
                .map_err(|source| DumpError::Ranges {
                    line: number,
                    source,
                })?;
        }

        lines += 1;
        if every > 0 && lines % every == 0 {
            progress(lines);
        }
    }

    ranges.finish()?;
    debug!(
        "Read {} lines, {} documents, {} ranges",
        lines,
        documents.len(),
        ranges.stats().ranges
    );

    Ok(Dump {
        ranges,
        documents,
        lines,
    })
}
