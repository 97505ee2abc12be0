//! Lsifnav Graph - Range storage and navigation resolution
//!
//! This crate turns a stream of LSIF entries into per-range navigation
//! records: where each range's symbol is defined and where it is
//! referenced.
//!
//! # Architecture
//!
//! - [`RangeStore`]: ranges in a disk-backed sled tree, so dumps with
//!   millions of ranges do not have to fit in memory
//! - [`Relations`]: result set links and items, kept in memory
//! - [`Ranges`]: applies entries to both and serializes records
//!
//! # Example
//!
//! ```no_run
//! use lsifnav_core::Id;
//! use lsifnav_graph::Ranges;
//! use std::collections::HashMap;
//!
//! let mut ranges = Ranges::new()?;
//! ranges.read("range", br#"{"id":1,"start":{"line":1,"character":2}}"#)?;
//!
//! let docs = HashMap::from([(Id::new(6), "main.go".to_string())]);
//! ranges.serialize(std::io::stdout(), &[Id::new(1)], &docs)?;
//! ranges.close()?;
//! # Ok::<(), lsifnav_graph::RangesError>(())
//! ```

mod ranges;
mod relations;
mod store;

pub use ranges::{IngestStats, Ranges, RangesError};
pub use relations::{Item, Relations};
pub use store::{RangeStore, StoreError};
