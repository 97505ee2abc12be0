//! Disk-backed range storage.
//!
//! Dumps can hold many millions of ranges, far more than the result sets
//! and results that group them, so ranges live in a sled tree keyed by the
//! big-endian range id while everything else stays in memory.

use lsifnav_core::{Id, Occurrence, StoreConfig};
use sled::{Batch, Db};
use std::collections::BTreeMap;
use std::mem;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sled(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("Range {0} not found")]
    NotFound(Id),
}

/// Maps range ids to their [`Occurrence`].
///
/// Writes are collected in an ordered buffer and applied as one sled batch
/// once `batch_size` entries are pending. Reads and owner updates consult
/// the buffer first, so buffering is invisible to callers.
///
/// The store is released when dropped; temporary stores also delete their
/// backing files then. Use [`RangeStore::close`] to observe flush errors.
pub struct RangeStore {
    db: Db,
    pending: BTreeMap<Id, Occurrence>,
    batch_size: usize,
}

impl RangeStore {
    /// Opens a store as described by `config`.
    ///
    /// A configured path only chooses where the backing files live: ranges
    /// left there by an earlier run are cleared, so every store starts empty.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut sled_config = sled::Config::new()
            .cache_capacity(config.cache_capacity)
            .flush_every_ms(config.flush_every_ms);

        sled_config = match &config.path {
            Some(path) => sled_config.path(path),
            None => sled_config.temporary(true),
        };

        let db = sled_config.open()?;
        if !db.is_empty() {
            debug!("Clearing {} stale ranges", db.len());
            db.clear()?;
            db.flush()?;
        }
        debug!(
            "Opened range store ({})",
            config
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "temporary".to_string())
        );

        Ok(Self {
            db,
            pending: BTreeMap::new(),
            batch_size: config.batch_size,
        })
    }

    /// Opens a temporary store with default settings.
    pub fn temporary() -> Result<Self, StoreError> {
        Self::open(&StoreConfig::temporary())
    }

    /// Inserts or overwrites the occurrence at `id`.
    pub fn put(&mut self, id: Id, occurrence: Occurrence) -> Result<(), StoreError> {
        if self.batch_size == 0 {
            return self.write(id, &occurrence);
        }

        self.pending.insert(id, occurrence);
        if self.pending.len() >= self.batch_size {
            self.apply_pending()?;
        }
        Ok(())
    }

    /// Looks up the occurrence at `id`.
    pub fn get(&self, id: Id) -> Result<Option<Occurrence>, StoreError> {
        if let Some(occurrence) = self.pending.get(&id) {
            return Ok(Some(*occurrence));
        }

        match self.db.get(id.to_key())? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Sets the owning result set of an existing range.
    ///
    /// Fails with [`StoreError::NotFound`] rather than creating a record.
    pub fn set_owner(&mut self, id: Id, result_set: Id) -> Result<(), StoreError> {
        if let Some(occurrence) = self.pending.get_mut(&id) {
            occurrence.result_set = Some(result_set);
            return Ok(());
        }

        let mut occurrence = self.get(id)?.ok_or(StoreError::NotFound(id))?;
        occurrence.result_set = Some(result_set);
        self.write(id, &occurrence)
    }

    /// Number of distinct ranges stored.
    pub fn len(&self) -> Result<usize, StoreError> {
        let mut unwritten = 0;
        for id in self.pending.keys() {
            if !self.db.contains_key(id.to_key())? {
                unwritten += 1;
            }
        }
        Ok(self.db.len() + unwritten)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.pending.is_empty() && self.db.is_empty())
    }

    /// Applies buffered writes and flushes them to disk.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.apply_pending()?;
        let bytes = self.db.flush()?;
        trace!("Flushed {} bytes of range data", bytes);
        Ok(())
    }

    /// Flushes and releases the store.
    ///
    /// Taking `self` makes a second close impossible.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.flush()?;
        debug!("Closed range store");
        Ok(())
    }

    fn write(&self, id: Id, occurrence: &Occurrence) -> Result<(), StoreError> {
        let bytes = bincode::serialize(occurrence)?;
        self.db.insert(id.to_key(), bytes)?;
        Ok(())
    }

    fn apply_pending(&mut self) -> Result<(), StoreError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let pending = mem::take(&mut self.pending);
        let count = pending.len();
        let mut batch = Batch::default();
        for (id, occurrence) in pending {
            batch.insert(&id.to_key()[..], bincode::serialize(&occurrence)?);
        }
        self.db.apply_batch(batch)?;
        trace!("Applied batch of {} ranges", count);
        Ok(())
    }
}
