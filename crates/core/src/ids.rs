//! Identifier newtypes
//!
//! This module defines the fundamental identifiers used throughout the system:
//! - [`TrackUuid`]: Producer-chosen identity of a declared track
//! - [`SequenceId`]: Producer session that emitted a packet
//! - [`StringId`]: Handle into the interned string pool
//! - [`TrackRowId`]: Row in the columnar track store
//! - [`ProcessHandle`] / [`ThreadHandle`]: Logical OS identities

use serde::{Deserialize, Serialize};

/// Producer-chosen identifier for a declared track.
///
/// Uuids are opaque 64-bit values picked by the trace producer; they are
/// unique within one trace but carry no structure. The value `0` is reserved
/// for the implicit default track that parentless events fall back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackUuid(u64);

impl TrackUuid {
    /// The reserved uuid naming the implicit default global track.
    pub const DEFAULT: TrackUuid = TrackUuid(0);

    /// Wrap a raw producer-supplied uuid.
    pub const fn new(raw: u64) -> Self {
        TrackUuid(raw)
    }

    /// Get the raw 64-bit value.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// True for the reserved default-track uuid.
    pub const fn is_default(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for TrackUuid {
    fn from(raw: u64) -> Self {
        TrackUuid(raw)
    }
}

impl std::fmt::Display for TrackUuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the producer session (packet sequence) a packet came from.
///
/// Incremental counter state is scoped to one sequence; values arriving from
/// any other sequence must not touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceId(u32);

impl SequenceId {
    /// Wrap a raw sequence number.
    pub const fn new(raw: u32) -> Self {
        SequenceId(raw)
    }

    /// Get the raw sequence number.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SequenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to an interned string in the string pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringId(u32);

impl StringId {
    /// Wrap a raw pool index.
    pub const fn new(raw: u32) -> Self {
        StringId(raw)
    }

    /// Get the raw pool index.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Row identifier in the track store.
///
/// One id space covers every track variant; ids are issued in insertion
/// order, so a variant table's id column is always sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackRowId(u32);

impl TrackRowId {
    /// Wrap a raw row id.
    pub const fn new(raw: u32) -> Self {
        TrackRowId(raw)
    }

    /// Get the raw row id.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TrackRowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a logical process issued by the process registry.
///
/// Distinct from an OS pid: when a pid is observed to be reused, the registry
/// fabricates a fresh handle for the new incarnation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessHandle(u32);

impl ProcessHandle {
    /// Wrap a raw registry index.
    pub const fn new(raw: u32) -> Self {
        ProcessHandle(raw)
    }

    /// Get the raw registry index.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a logical thread issued by the process registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadHandle(u32);

impl ThreadHandle {
    /// Wrap a raw registry index.
    pub const fn new(raw: u32) -> Self {
        ThreadHandle(raw)
    }

    /// Get the raw registry index.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ThreadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
