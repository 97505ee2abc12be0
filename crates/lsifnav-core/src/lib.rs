//! Lsifnav Core - Identifiers, entries and records
//!
//! This crate holds the types shared by the range store and the CLI:
//!
//! - [`Id`]: the canonical graph identifier, decoded from either numeric or
//!   numeric-string JSON tokens
//! - [`Entry`]: typed graph entries relevant to range navigation
//! - [`Occurrence`] and [`NavigationRecord`]: what is stored per range and
//!   what is emitted per range
//! - [`StoreConfig`]: settings for the disk-backed store
//!
//! # Example
//!
//! ```
//! use lsifnav_core::{Entry, Id};
//!
//! let entry = Entry::decode("range", br#"{"id":"1","start":{"line":1,"character":2}}"#)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(entry, Entry::Range { id: Id::new(1), line: 1, character: 2 });
//! ```

pub mod config;
pub mod entry;
mod error;
mod id;
mod record;

pub use config::StoreConfig;
pub use entry::Entry;
pub use error::{ConfigError, DecodeError, IdError};
pub use id::Id;
pub use record::{NavigationRecord, Occurrence, ReferencePath};
