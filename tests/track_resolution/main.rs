//! Track Resolution Test Suite
//!
//! End-to-end tests driving the public [`TraceSession`] surface the way an
//! ingestion pipeline would: declarations in arbitrary order, lazy
//! resolution on first event reference, counter decoding, and the
//! degradation paths for malformed input.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test track_resolution
//!
//! # Run one area only
//! cargo test --test track_resolution hierarchy::
//! ```

use tracedb::{
    ArgValue, SequenceId, TraceSession, TrackError, TrackKind, TrackRowId, TrackUuid,
};

pub mod hierarchy;
pub mod identity;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Create a session with default settings and test logging wired up.
pub fn new_session() -> TraceSession {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    TraceSession::new()
}

/// Shorthand uuid constructor.
pub fn uuid(raw: u64) -> TrackUuid {
    TrackUuid::new(raw)
}

/// Shorthand sequence constructor.
pub fn seq(raw: u32) -> SequenceId {
    SequenceId::new(raw)
}

/// The parent row recorded in a row's provenance arguments, if any.
pub fn provenance_parent(session: &TraceSession, row: TrackRowId) -> Option<TrackRowId> {
    let key = session.storage().strings.lookup("parent_track_id")?;
    match session.storage().args.find(row, key) {
        Some(ArgValue::Integer(raw)) => Some(TrackRowId::new(raw as u32)),
        _ => None,
    }
}

/// The display name of a track row, if one is set.
pub fn row_name(session: &TraceSession, row: TrackRowId) -> Option<String> {
    let id = session.storage().tracks.name(row)?;
    session.storage().strings.get(id).map(str::to_owned)
}
