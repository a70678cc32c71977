//! # Tracedb
//!
//! Track identity resolution for trace ingestion pipelines.
//!
//! Trace producers declare *tracks* (named, typed timelines: processes,
//! threads, counters, async groupings) by opaque uuid, in any order, with
//! duplicates, gaps, and occasional nonsense. Tracedb turns those
//! declarations into stable, deduplicated rows of an in-memory columnar
//! track store, resolving parent chains, disambiguating OS pid/tid reuse,
//! and decoding delta-encoded counter samples along the way.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tracedb::prelude::*;
//!
//! let mut session = TraceSession::new();
//!
//! // Declarations arrive as descriptors are parsed.
//! session.declare_process_track(TrackUuid::new(1), Some("browser"), 1001, 0)?;
//! session.declare_thread_track(TrackUuid::new(2), None, Some("main"), 1001, 1001, 0)?;
//!
//! // Events resolve their track lazily, on first reference.
//! let row = session.resolve_track(TrackUuid::new(2), None);
//!
//! // Counter samples decode through the same session.
//! session.declare_counter_track(
//!     TrackUuid::new(3), None, Some("heap"), None, 1, true, SequenceId::new(1),
//! )?;
//! let bytes = session.resolve_counter_value(TrackUuid::new(3), SequenceId::new(1), 512)?;
//! ```
//!
//! ## Design
//!
//! Everything is scoped to a [`TraceSession`]: one trace, one session, no
//! shared or global state. Malformed input never panics and never aborts
//! ingestion; irregularities are logged via `tracing`, counted in the
//! diagnostics stats, and reported as explicit [`Result`]s where a caller
//! can react.
//!
//! ## Crates
//!
//! - `tracedb-core` - identifier newtypes, errors, argument values
//! - `tracedb-storage` - string pool, columnar track tables, argument store,
//!   diagnostics counters
//! - `tracedb-engine` - reservations, the resolver, the process registry

#![warn(missing_docs)]

mod session;

pub mod prelude;

// Re-export main entry points
pub use session::{TraceSession, TraceSessionBuilder};

// Re-export core types
pub use tracedb_core::{
    ArgValue, ProcessHandle, Result, SequenceId, StringId, ThreadHandle, TrackError, TrackRowId,
    TrackUuid,
};

// Re-export engine types
pub use tracedb_engine::{
    CounterEncoding, CounterInfo, ProcessRegistry, TraceContext, TrackReservation, TrackResolver,
    DEFAULT_MAX_PARENT_DEPTH, DEFAULT_TRACK_NAME,
};

// Re-export storage types
pub use tracedb_storage::{
    ArgStore, Stat, StatCounters, StatSnapshot, StringPool, TraceStore, TrackKind, TrackTables,
};
