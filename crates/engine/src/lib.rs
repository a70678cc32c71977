//! Track resolution engine for trace ingestion.
//!
//! This crate turns producer track declarations into concrete track rows:
//!
//! - [`reservation`]: buffered declarations keyed by producer uuid
//! - [`resolver`]: lazy, memoized uuid-to-row resolution with parent chain
//!   guards, OS id reuse detection, and provenance stamping
//! - [`process`]: the logical process and thread registry
//!
//! Counter sample decoding lives on [`TrackResolver`] as well, since running
//! totals are reservation state.
//!
//! All state is session-scoped: a [`TrackResolver`] plus the [`TraceContext`]
//! it operates on hold everything, and two sessions share nothing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod process;
pub mod reservation;
pub mod resolver;

mod counter;
mod provenance;

pub use process::{ProcessRecord, ProcessRegistry, ThreadRecord};
pub use reservation::{CounterEncoding, CounterInfo, ReservationTable, TrackReservation};
pub use resolver::{TrackResolver, DEFAULT_MAX_PARENT_DEPTH, DEFAULT_TRACK_NAME};

use tracedb_storage::TraceStore;

/// Mutable trace state a resolver operates against: columnar storage plus the
/// process registry. Kept separate from the resolver so storage can be handed
/// on to later ingestion stages once resolution is done.
#[derive(Debug, Default)]
pub struct TraceContext {
    /// String pool, track tables, arguments, and statistics.
    pub storage: TraceStore,
    /// Logical process and thread identities.
    pub processes: ProcessRegistry,
}

impl TraceContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }
}
