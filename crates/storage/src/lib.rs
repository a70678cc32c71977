//! In-memory columnar storage for resolved tracks
//!
//! This crate implements the storage side of track resolution:
//! - StringPool: deduplicating string interner
//! - TrackTables: six track variant tables over one row id space
//! - ArgStore: per-row key/value provenance
//! - StatCounters: ingestion diagnostics

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod stats;
pub mod strings;
pub mod tracks;

pub use args::{ArgStore, ArgWriter};
pub use stats::{Stat, StatCounters, StatSnapshot};
pub use strings::StringPool;
pub use tracks::{PlainTrackTable, ScopedTrackTable, TrackKind, TrackTables};

/// Bundle of every storage component for one trace.
///
/// Fields are public: the storage layer is a passive collaborator and the
/// resolution engine reads and writes it directly.
#[derive(Debug, Default)]
pub struct TraceStore {
    /// Interned strings.
    pub strings: StringPool,
    /// Track variant tables.
    pub tracks: TrackTables,
    /// Per-row arguments.
    pub args: ArgStore,
    /// Diagnostics counters.
    pub stats: StatCounters,
}

impl TraceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}
