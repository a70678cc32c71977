//! Track reservations.
//!
//! A reservation is a buffered declaration of a track's shape, keyed by the
//! producer-chosen uuid. Declarations are append-mostly: once a uuid is bound,
//! its kind never changes. A redeclaration either matches the existing shape
//! (and may tighten the minimum timestamp or fill a missing name) or is
//! rejected, leaving the first declaration authoritative.

use rustc_hash::FxHashMap;
use tracing::debug;

use tracedb_core::{Result, SequenceId, StringId, TrackError, TrackUuid};
use tracedb_storage::{Stat, StatCounters};

/// How a counter track's sample values are encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterEncoding {
    /// Samples are absolute values.
    Absolute,
    /// Samples are deltas against a running total, valid only within one
    /// producer sequence.
    Incremental {
        /// The sequence this counter's deltas are scoped to.
        owning_sequence: SequenceId,
        /// Accumulated absolute value. Not part of the track's identity.
        running_total: i64,
    },
}

/// Counter-specific declaration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterInfo {
    /// Optional classification label.
    pub category: Option<StringId>,
    /// Scale factor applied to raw samples; values <= 0 mean no scaling.
    pub unit_multiplier: i64,
    /// Sample encoding.
    pub encoding: CounterEncoding,
}

impl CounterInfo {
    /// Build counter fields from declaration arguments. The sequence binds
    /// the counter only when it is incremental.
    pub fn new(
        category: Option<StringId>,
        unit_multiplier: i64,
        is_incremental: bool,
        sequence: SequenceId,
    ) -> Self {
        let encoding = if is_incremental {
            CounterEncoding::Incremental {
                owning_sequence: sequence,
                running_total: 0,
            }
        } else {
            CounterEncoding::Absolute
        };
        CounterInfo {
            category,
            unit_multiplier,
            encoding,
        }
    }

    fn same_identity(&self, other: &CounterInfo) -> bool {
        if self.category != other.category || self.unit_multiplier != other.unit_multiplier {
            return false;
        }
        match (&self.encoding, &other.encoding) {
            (CounterEncoding::Absolute, CounterEncoding::Absolute) => true,
            (
                CounterEncoding::Incremental {
                    owning_sequence: a, ..
                },
                CounterEncoding::Incremental {
                    owning_sequence: b, ..
                },
            ) => a == b,
            _ => false,
        }
    }
}

/// A declared-but-not-yet-resolved track shape.
#[derive(Debug, Clone)]
pub struct TrackReservation {
    /// Parent track uuid; absence means global/root.
    pub parent_uuid: Option<TrackUuid>,
    /// OS process id, for process and thread tracks.
    pub pid: Option<u32>,
    /// OS thread id; implies `pid` is present.
    pub tid: Option<u32>,
    /// Earliest timestamp this uuid was declared at.
    pub min_timestamp: Option<i64>,
    /// Declared display name; set at most once.
    pub name: Option<StringId>,
    /// Counter fields; presence marks this a counter track.
    pub counter: Option<CounterInfo>,
}

impl TrackReservation {
    /// A process track declaration.
    pub fn process(pid: u32, name: Option<StringId>, timestamp: i64) -> Self {
        TrackReservation {
            parent_uuid: None,
            pid: Some(pid),
            tid: None,
            min_timestamp: Some(timestamp),
            name,
            counter: None,
        }
    }

    /// A thread track declaration.
    pub fn thread(
        parent_uuid: Option<TrackUuid>,
        pid: u32,
        tid: u32,
        name: Option<StringId>,
        timestamp: i64,
    ) -> Self {
        TrackReservation {
            parent_uuid,
            pid: Some(pid),
            tid: Some(tid),
            min_timestamp: Some(timestamp),
            name,
            counter: None,
        }
    }

    /// A counter track declaration.
    pub fn counter(
        parent_uuid: Option<TrackUuid>,
        name: Option<StringId>,
        info: CounterInfo,
    ) -> Self {
        TrackReservation {
            parent_uuid,
            pid: None,
            tid: None,
            min_timestamp: None,
            name,
            counter: Some(info),
        }
    }

    /// A child (or, without a parent, global) track declaration.
    pub fn child(parent_uuid: Option<TrackUuid>, name: Option<StringId>) -> Self {
        TrackReservation {
            parent_uuid,
            pid: None,
            tid: None,
            min_timestamp: None,
            name,
            counter: None,
        }
    }

    /// True if this reservation declares a counter track.
    pub fn is_counter(&self) -> bool {
        self.counter.is_some()
    }

    /// Short human-readable kind, for diagnostics.
    pub fn kind_label(&self) -> &'static str {
        match (self.tid.is_some(), self.pid.is_some(), self.counter.is_some()) {
            (true, _, true) => "thread counter",
            (true, _, false) => "thread",
            (false, true, true) => "process counter",
            (false, true, false) => "process",
            (false, false, true) => "counter",
            (false, false, false) => {
                if self.parent_uuid.is_some() {
                    "child"
                } else {
                    "global"
                }
            }
        }
    }

    /// Whether two declarations describe the same track.
    ///
    /// Compares the defining identifiers only: parent uuid, OS ids, and
    /// counter identity. Names, timestamps, and the running total are
    /// deliberately excluded.
    pub fn describes_same_track(&self, other: &TrackReservation) -> bool {
        if self.parent_uuid != other.parent_uuid
            || self.pid != other.pid
            || self.tid != other.tid
        {
            return false;
        }
        match (&self.counter, &other.counter) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same_identity(b),
            _ => false,
        }
    }

    fn merge_from(&mut self, other: &TrackReservation) {
        self.min_timestamp = match (self.min_timestamp, other.min_timestamp) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        if self.name.is_none() {
            self.name = other.name;
        }
    }
}

/// The reservation store: uuid to declared shape.
#[derive(Debug, Default)]
pub struct ReservationTable {
    entries: FxHashMap<TrackUuid, TrackReservation>,
}

impl ReservationTable {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a track, inserting or converging with the existing
    /// reservation.
    ///
    /// On a shape conflict the existing reservation is left untouched, the
    /// inconsistency counter is bumped, and the conflict is reported. The
    /// caller drops the declaration and carries on.
    pub fn declare(
        &mut self,
        uuid: TrackUuid,
        candidate: TrackReservation,
        stats: &mut StatCounters,
    ) -> Result<()> {
        match self.entries.get_mut(&uuid) {
            None => {
                self.entries.insert(uuid, candidate);
                Ok(())
            }
            Some(existing) => {
                if existing.describes_same_track(&candidate) {
                    existing.merge_from(&candidate);
                    Ok(())
                } else {
                    debug!(
                        %uuid,
                        existing = existing.kind_label(),
                        candidate = candidate.kind_label(),
                        "track redeclared with a conflicting shape; keeping the first declaration"
                    );
                    stats.increment(Stat::InconsistentTrackDeclarations);
                    Err(TrackError::ReservationMismatch { uuid })
                }
            }
        }
    }

    /// Insert a reservation known to be new. Used for the implicit default
    /// track, which is reserved on first use.
    pub(crate) fn insert_new(&mut self, uuid: TrackUuid, reservation: TrackReservation) {
        debug_assert!(!self.entries.contains_key(&uuid));
        self.entries.insert(uuid, reservation);
    }

    /// The reservation for a uuid.
    pub fn get(&self, uuid: TrackUuid) -> Option<&TrackReservation> {
        self.entries.get(&uuid)
    }

    /// Mutable access to a reservation, for counter accumulation.
    pub(crate) fn get_mut(&mut self, uuid: TrackUuid) -> Option<&mut TrackReservation> {
        self.entries.get_mut(&uuid)
    }

    /// True if the uuid has been declared.
    pub fn contains(&self, uuid: TrackUuid) -> bool {
        self.entries.contains_key(&uuid)
    }

    /// Number of reserved uuids.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (&TrackUuid, &mut TrackReservation)> {
        self.entries.iter_mut()
    }
}
