//! Range ingestion and navigation serialization.
//!
//! Ranges are built in two phases:
//! 1. Ingestion: entries are applied in dump order. Range vertices go to the
//!    [`RangeStore`], links and items to [`Relations`], and items stamp their
//!    ranges with the owning result set.
//! 2. Serialization: for each requested range, the definition and reference
//!    links are resolved into [`NavigationRecord`]s.
//!
//! The first serialization after any ingestion acts as the barrier between
//! the two: it replays deferred items and flushes buffered range writes.

use crate::relations::Relations;
use crate::store::{RangeStore, StoreError};
use lsifnav_core::{
    DecodeError, Entry, Id, NavigationRecord, Occurrence, ReferencePath, StoreConfig,
};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Error, Debug)]
pub enum RangesError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Write error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Range {0} is not in the store")]
    RangeNotFound(Id),
}

pub type Result<T> = std::result::Result<T, RangesError>;

/// Counts of ingested entries by kind.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub ranges: usize,
    pub result_sets: usize,
    pub definition_results: usize,
    pub reference_results: usize,
    pub definition_links: usize,
    pub reference_links: usize,
    pub items: usize,
    /// Entries with labels range navigation does not track.
    pub ignored: usize,
}

/// Range store plus the relations needed to resolve navigation.
pub struct Ranges {
    store: RangeStore,
    relations: Relations,
    stats: IngestStats,
    /// Entries applied since the last barrier.
    dirty: bool,
}

impl Ranges {
    /// Creates ranges backed by a temporary store.
    pub fn new() -> Result<Self> {
        Self::with_config(&StoreConfig::temporary())
    }

    /// Creates ranges backed by a store opened from `config`.
    pub fn with_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self {
            store: RangeStore::open(config)?,
            relations: Relations::new(),
            stats: IngestStats::default(),
            dirty: false,
        })
    }

    /// Decodes and applies one `(label, payload)` pair.
    ///
    /// Labels that do not concern ranges are skipped.
    pub fn read(&mut self, label: &str, payload: &[u8]) -> Result<()> {
        match Entry::decode(label, payload)? {
            Some(entry) => self.apply(entry),
            None => {
                self.stats.ignored += 1;
                Ok(())
            }
        }
    }

    /// Applies one typed entry.
    pub fn apply(&mut self, entry: Entry) -> Result<()> {
        self.dirty = true;

        match entry {
            Entry::Range {
                id,
                line,
                character,
            } => {
                self.store.put(id, Occurrence::new(line, character))?;
                self.stats.ranges += 1;
            }
            Entry::ResultSet { .. } => self.stats.result_sets += 1,
            Entry::DefinitionResult { .. } => self.stats.definition_results += 1,
            Entry::ReferenceResult { .. } => self.stats.reference_results += 1,
            Entry::DefinitionLink { out_v, in_v } => {
                self.relations.link_definition(out_v, in_v);
                self.stats.definition_links += 1;
            }
            Entry::ReferenceLink { out_v, in_v } => {
                self.relations.link_reference(out_v, in_v);
                self.stats.reference_links += 1;
            }
            Entry::Item {
                out_v,
                in_vs,
                document,
            } => {
                match self.relations.result_set_of(out_v) {
                    Some(result_set) => self.assign_owner(result_set, &in_vs)?,
                    None => {
                        trace!("Deferring item of result {} until it is linked", out_v);
                        self.relations.defer(out_v);
                    }
                }
                self.relations.add_item(out_v, in_vs, document);
                self.stats.items += 1;
            }
        }

        Ok(())
    }

    /// Looks up a stored range.
    pub fn get_range(&self, id: Id) -> Result<Option<Occurrence>> {
        Ok(self.store.get(id)?)
    }

    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Number of distinct ranges in the store.
    pub fn range_count(&self) -> Result<usize> {
        Ok(self.store.len()?)
    }

    /// Ends the ingestion phase.
    ///
    /// Resolves owners for items that arrived before their result set link
    /// and flushes buffered ranges. A no-op if nothing was applied since the
    /// last call. [`Ranges::serialize`] calls this itself.
    pub fn finish(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        // results leave the deferred set only once their ranges are stamped
        let mut unresolved = 0;
        for result in self.relations.deferred() {
            let Some(result_set) = self.relations.result_set_of(result) else {
                unresolved += 1;
                continue;
            };
            let ranges: Vec<Id> = self
                .relations
                .items(result)
                .iter()
                .flat_map(|item| item.ranges.iter().copied())
                .collect();
            self.assign_owner(result_set, &ranges)?;
            self.relations.undefer(result);
            debug!(
                "Resolved {} deferred ranges of result {}",
                ranges.len(),
                result
            );
        }

        if unresolved > 0 {
            warn!("{} results have items but no result set link", unresolved);
        }

        self.store.flush()?;
        self.dirty = false;
        Ok(())
    }

    /// Resolves `range_ids` into navigation records, in order.
    ///
    /// `docs` maps document ids to the path used in links. Targets in
    /// documents missing from `docs` are left out.
    pub fn records(
        &mut self,
        range_ids: &[Id],
        docs: &HashMap<Id, String>,
    ) -> Result<Vec<NavigationRecord>> {
        self.finish()?;
        range_ids
            .iter()
            .map(|&id| self.resolve(id, docs))
            .collect()
    }

    /// Writes the navigation records of `range_ids` as a JSON array.
    ///
    /// Each record is written on its own line. Nothing is written if any
    /// requested range is missing from the store.
    pub fn serialize<W: Write>(
        &mut self,
        mut writer: W,
        range_ids: &[Id],
        docs: &HashMap<Id, String>,
    ) -> Result<()> {
        let records = self.records(range_ids, docs)?;

        writer.write_all(b"[")?;
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                writer.write_all(b",")?;
            }
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.write_all(b"]")?;
        writer.flush()?;

        Ok(())
    }

    /// Flushes and releases the range store.
    pub fn close(self) -> Result<()> {
        self.store.close()?;
        Ok(())
    }

    fn assign_owner(&mut self, result_set: Id, ranges: &[Id]) -> Result<()> {
        for &id in ranges {
            match self.store.set_owner(id, result_set) {
                Ok(()) => {}
                Err(StoreError::NotFound(_)) => {
                    trace!("Item refers to unknown range {}", id);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn resolve(&self, id: Id, docs: &HashMap<Id, String>) -> Result<NavigationRecord> {
        let occurrence = self.store.get(id)?.ok_or(RangesError::RangeNotFound(id))?;
        let mut record = NavigationRecord::bare(&occurrence);

        let Some(result_set) = occurrence.result_set else {
            return Ok(record);
        };

        record.definition_path = self.definition_path(result_set, docs)?;
        record.references = self.references(id, result_set, docs)?;

        Ok(record)
    }

    fn definition_path(
        &self,
        result_set: Id,
        docs: &HashMap<Id, String>,
    ) -> Result<Option<String>> {
        let Some(result) = self.relations.definition_of(result_set) else {
            return Ok(None);
        };

        let first = self
            .relations
            .items(result)
            .iter()
            .find_map(|item| docs.get(&item.document).map(|path| (item, path)));
        let Some((item, path)) = first else {
            return Ok(None);
        };
        let Some(&target) = item.ranges.first() else {
            return Ok(None);
        };

        Ok(self.store.get(target)?.map(|target| target.link(path)))
    }

    fn references(
        &self,
        id: Id,
        result_set: Id,
        docs: &HashMap<Id, String>,
    ) -> Result<Vec<ReferencePath>> {
        let mut references = Vec::new();
        let Some(result) = self.relations.references_of(result_set) else {
            return Ok(references);
        };

        for item in self.relations.items(result) {
            let Some(path) = docs.get(&item.document) else {
                continue;
            };

            for &candidate in &item.ranges {
                if candidate == id {
                    continue;
                }
                if let Some(target) = self.store.get(candidate)? {
                    references.push(ReferencePath {
                        path: target.link(path),
                    });
                }
            }
        }

        Ok(references)
    }
}
