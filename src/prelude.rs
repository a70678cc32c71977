//! Convenient imports for tracedb.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```ignore
//! use tracedb::prelude::*;
//!
//! let mut session = TraceSession::new();
//! session.declare_child_track(TrackUuid::new(1), None, Some("io"))?;
//! ```

// Main entry point
pub use crate::session::{TraceSession, TraceSessionBuilder};

// Error handling
pub use tracedb_core::{Result, TrackError};

// Identifiers
pub use tracedb_core::{
    ProcessHandle, SequenceId, StringId, ThreadHandle, TrackRowId, TrackUuid,
};

// Track metadata
pub use tracedb_core::ArgValue;
pub use tracedb_storage::{Stat, StatSnapshot, TrackKind};
pub use tracedb_engine::TrackReservation;
