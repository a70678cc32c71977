//! Track resolution.
//!
//! [`TrackResolver`] owns all per-session resolution state: the reservation
//! store, the uuid-to-row memo, and the identity binding maps. Resolution is
//! lazy and memoized: a uuid is converted to a concrete track row the first
//! time something references it, and the mapping is never recomputed.
//!
//! Parent chains are walked with an explicit descendant set rather than bare
//! recursion, so cyclic or absurdly deep chains degrade to "parentless" after
//! a bounded number of steps instead of overflowing the stack.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::warn;

use tracedb_core::{
    ProcessHandle, Result, SequenceId, StringId, ThreadHandle, TrackRowId, TrackUuid,
};
use tracedb_storage::Stat;

use crate::provenance::ProvenanceKeys;
use crate::reservation::{CounterInfo, ReservationTable, TrackReservation};
use crate::TraceContext;

/// Bound on the ancestor chain walked during resolution.
pub const DEFAULT_MAX_PARENT_DEPTH: usize = 10;

/// Display name given to the implicit default track.
pub const DEFAULT_TRACK_NAME: &str = "Default Track";

/// Uuids on the resolution path currently being walked.
type DescendantSet = SmallVec<[TrackUuid; 16]>;

/// Session-scoped track resolution engine.
///
/// Construct one per ingestion run against the run's [`TraceContext`] and
/// discard it at session end. All state lives in the resolver and the
/// context; two resolvers never share anything.
#[derive(Debug)]
pub struct TrackResolver {
    pub(crate) reservations: ReservationTable,
    resolved: FxHashMap<TrackUuid, TrackRowId>,
    thread_bindings: FxHashMap<ThreadHandle, TrackUuid>,
    process_bindings: FxHashMap<ProcessHandle, TrackUuid>,
    thread_primaries: FxHashMap<ThreadHandle, TrackRowId>,
    process_primaries: FxHashMap<ProcessHandle, TrackRowId>,
    pub(crate) keys: ProvenanceKeys,
    max_parent_depth: usize,
    default_track_name: StringId,
}

impl TrackResolver {
    /// Create a resolver with default settings.
    pub fn new(cx: &mut TraceContext) -> Self {
        Self::with_config(cx, DEFAULT_MAX_PARENT_DEPTH, DEFAULT_TRACK_NAME)
    }

    /// Create a resolver with an explicit depth bound and default track name.
    pub fn with_config(
        cx: &mut TraceContext,
        max_parent_depth: usize,
        default_track_name: &str,
    ) -> Self {
        TrackResolver {
            reservations: ReservationTable::new(),
            resolved: FxHashMap::default(),
            thread_bindings: FxHashMap::default(),
            process_bindings: FxHashMap::default(),
            thread_primaries: FxHashMap::default(),
            process_primaries: FxHashMap::default(),
            keys: ProvenanceKeys::intern(&mut cx.storage.strings),
            max_parent_depth,
            default_track_name: cx.storage.strings.intern(default_track_name),
        }
    }

    // ===== Declarations =====

    /// Declare a process track.
    pub fn declare_process_track(
        &mut self,
        cx: &mut TraceContext,
        uuid: TrackUuid,
        name: Option<&str>,
        pid: u32,
        timestamp: i64,
    ) -> Result<()> {
        let name = name.map(|n| cx.storage.strings.intern(n));
        let candidate = TrackReservation::process(pid, name, timestamp);
        self.reservations
            .declare(uuid, candidate, &mut cx.storage.stats)
    }

    /// Declare a thread track.
    pub fn declare_thread_track(
        &mut self,
        cx: &mut TraceContext,
        uuid: TrackUuid,
        parent_uuid: Option<TrackUuid>,
        name: Option<&str>,
        pid: u32,
        tid: u32,
        timestamp: i64,
    ) -> Result<()> {
        let name = name.map(|n| cx.storage.strings.intern(n));
        let candidate = TrackReservation::thread(parent_uuid, pid, tid, name, timestamp);
        self.reservations
            .declare(uuid, candidate, &mut cx.storage.stats)
    }

    /// Declare a counter track.
    #[allow(clippy::too_many_arguments)]
    pub fn declare_counter_track(
        &mut self,
        cx: &mut TraceContext,
        uuid: TrackUuid,
        parent_uuid: Option<TrackUuid>,
        name: Option<&str>,
        category: Option<&str>,
        unit_multiplier: i64,
        is_incremental: bool,
        sequence: SequenceId,
    ) -> Result<()> {
        let name = name.map(|n| cx.storage.strings.intern(n));
        let category = category.map(|c| cx.storage.strings.intern(c));
        let info = CounterInfo::new(category, unit_multiplier, is_incremental, sequence);
        let candidate = TrackReservation::counter(parent_uuid, name, info);
        self.reservations
            .declare(uuid, candidate, &mut cx.storage.stats)
    }

    /// Declare a child track (or, without a parent, a plain global track).
    pub fn declare_child_track(
        &mut self,
        cx: &mut TraceContext,
        uuid: TrackUuid,
        parent_uuid: Option<TrackUuid>,
        name: Option<&str>,
    ) -> Result<()> {
        let name = name.map(|n| cx.storage.strings.intern(n));
        let candidate = TrackReservation::child(parent_uuid, name);
        self.reservations
            .declare(uuid, candidate, &mut cx.storage.stats)
    }

    /// The reservation currently held for a uuid.
    pub fn reservation(&self, uuid: TrackUuid) -> Option<&TrackReservation> {
        self.reservations.get(uuid)
    }

    // ===== Resolution =====

    /// Resolve a uuid to its track row, creating the row on first use.
    ///
    /// Returns `None` only when the uuid was never declared; every declared
    /// uuid resolves, with cyclic, over-deep, or dangling parent chains
    /// degrading to parentless placement.
    ///
    /// If `event_name` is given and the resolved row has no name yet, the
    /// name is backfilled, except on process/thread/counter tracks whose
    /// names are reservation-assigned.
    pub fn resolve(
        &mut self,
        cx: &mut TraceContext,
        uuid: TrackUuid,
        event_name: Option<StringId>,
    ) -> Option<TrackRowId> {
        let mut descendants = DescendantSet::new();
        let row = self.resolve_with_descendants(cx, uuid, &mut descendants)?;
        if let Some(name) = event_name {
            self.backfill_name(cx, uuid, row, name);
        }
        Some(row)
    }

    fn resolve_with_descendants(
        &mut self,
        cx: &mut TraceContext,
        uuid: TrackUuid,
        descendants: &mut DescendantSet,
    ) -> Option<TrackRowId> {
        if let Some(&row) = self.resolved.get(&uuid) {
            return Some(row);
        }
        let reservation = self.reservations.get(uuid)?.clone();
        let row = self.place(cx, uuid, &reservation, descendants);
        self.resolved.insert(uuid, row);
        Some(row)
    }

    /// Convert one reservation into a stored row, walking ancestors first.
    fn place(
        &mut self,
        cx: &mut TraceContext,
        uuid: TrackUuid,
        reservation: &TrackReservation,
        descendants: &mut DescendantSet,
    ) -> TrackRowId {
        let mut parent_row = None;
        if let Some(parent_uuid) = reservation.parent_uuid {
            descendants.push(uuid);
            if descendants.len() > self.max_parent_depth {
                warn!(
                    %uuid,
                    %parent_uuid,
                    depth = descendants.len(),
                    "parent chain exceeds the depth bound; treating track as parentless"
                );
                cx.storage.stats.increment(Stat::ParentChainTooDeep);
            } else if descendants.contains(&parent_uuid) {
                warn!(
                    %uuid,
                    %parent_uuid,
                    "parent chain forms a cycle; treating track as parentless"
                );
                cx.storage.stats.increment(Stat::ParentChainCycles);
            } else {
                parent_row = self.resolve_with_descendants(cx, parent_uuid, descendants);
                if parent_row.is_none() {
                    warn!(
                        %uuid,
                        %parent_uuid,
                        "parent track was never declared; treating track as parentless"
                    );
                    cx.storage.stats.increment(Stat::UnknownParentTracks);
                }
            }
            descendants.pop();
        }

        let name = reservation.name;
        let (row, created) = if let (Some(pid), Some(tid)) = (reservation.pid, reservation.tid) {
            let thread = self.thread_identity(cx, uuid, reservation, pid, tid);
            if reservation.is_counter() {
                (cx.storage.tracks.insert_thread_counter(thread, name), true)
            } else {
                match self.thread_primaries.get(&thread) {
                    Some(&row) => (row, false),
                    None => {
                        let row = cx.storage.tracks.insert_thread(thread, name);
                        self.thread_primaries.insert(thread, row);
                        (row, true)
                    }
                }
            }
        } else if let Some(pid) = reservation.pid {
            let process = self.process_identity(cx, uuid, reservation, pid);
            if reservation.is_counter() {
                (
                    cx.storage.tracks.insert_process_counter(process, name),
                    true,
                )
            } else {
                match self.process_primaries.get(&process) {
                    Some(&row) => (row, false),
                    None => {
                        let row = cx.storage.tracks.insert_process(process, name);
                        self.process_primaries.insert(process, row);
                        (row, true)
                    }
                }
            }
        } else if let Some(thread) = parent_row.and_then(|p| cx.storage.tracks.thread_scope(p)) {
            let row = if reservation.is_counter() {
                cx.storage.tracks.insert_thread_counter(thread, name)
            } else {
                cx.storage.tracks.insert_thread(thread, name)
            };
            (row, true)
        } else if let Some(process) = parent_row.and_then(|p| cx.storage.tracks.process_scope(p)) {
            let row = if reservation.is_counter() {
                cx.storage.tracks.insert_process_counter(process, name)
            } else {
                cx.storage.tracks.insert_process(process, name)
            };
            (row, true)
        } else {
            // Global placement. Parentless non-sentinel tracks hang off the
            // implicit default track, unless the default track is an ancestor
            // of the chain being walked right now.
            if parent_row.is_none() && !uuid.is_default() {
                if descendants.contains(&TrackUuid::DEFAULT) {
                    warn!(
                        %uuid,
                        "default track is an ancestor of this track; leaving it parentless"
                    );
                } else {
                    parent_row = Some(self.default_track(cx));
                }
            }
            let row = if reservation.is_counter() {
                cx.storage.tracks.insert_counter(name)
            } else {
                cx.storage.tracks.insert_generic(name)
            };
            (row, true)
        };

        if created {
            let category = reservation.counter.as_ref().and_then(|c| c.category);
            self.annotate(cx, row, uuid, parent_row, category);
        }
        row
    }

    /// The implicit default global track, reserved and resolved on first use.
    pub fn default_track(&mut self, cx: &mut TraceContext) -> TrackRowId {
        if let Some(&row) = self.resolved.get(&TrackUuid::DEFAULT) {
            return row;
        }
        let reservation = match self.reservations.get(TrackUuid::DEFAULT) {
            Some(r) => r.clone(),
            None => {
                let r = TrackReservation::child(None, Some(self.default_track_name));
                self.reservations.insert_new(TrackUuid::DEFAULT, r.clone());
                r
            }
        };
        let mut descendants = DescendantSet::new();
        let row = self.place(cx, TrackUuid::DEFAULT, &reservation, &mut descendants);
        self.resolved.insert(TrackUuid::DEFAULT, row);
        row
    }

    fn backfill_name(
        &self,
        cx: &mut TraceContext,
        uuid: TrackUuid,
        row: TrackRowId,
        name: StringId,
    ) {
        if cx.storage.tracks.name(row).is_some() {
            return;
        }
        let reservation = match self.reservations.get(uuid) {
            Some(r) => r,
            None => return,
        };
        // Process, thread, and counter track names are owned by their
        // reservations; event names only ever label plain child tracks.
        if reservation.pid.is_some() || reservation.tid.is_some() || reservation.is_counter() {
            return;
        }
        cx.storage.tracks.set_name(row, name);
    }

    // ===== Identity disambiguation =====

    /// Logical thread for a thread-track reservation, restarting the identity
    /// when the tid has been claimed by a different uuid.
    fn thread_identity(
        &mut self,
        cx: &mut TraceContext,
        uuid: TrackUuid,
        reservation: &TrackReservation,
        pid: u32,
        tid: u32,
    ) -> ThreadHandle {
        let handle = cx.processes.update_thread(tid, pid);
        match self.thread_bindings.get(&handle).copied() {
            None => {
                self.thread_bindings.insert(handle, uuid);
                handle
            }
            Some(bound) if bound == uuid => handle,
            Some(bound) => {
                warn!(
                    tid,
                    pid,
                    previous_uuid = %bound,
                    new_uuid = %uuid,
                    timestamp = reservation.min_timestamp,
                    "thread id claimed by a new track; starting a new logical thread"
                );
                cx.storage.stats.increment(Stat::ThreadIdReuse);
                let fresh = cx.processes.start_new_thread(tid);
                let reassociated = cx.processes.update_thread(tid, pid);
                debug_assert_eq!(fresh, reassociated);
                self.thread_bindings.insert(reassociated, uuid);
                reassociated
            }
        }
    }

    /// Logical process for a process-track reservation, restarting the
    /// identity when the pid has been claimed by a different uuid.
    fn process_identity(
        &mut self,
        cx: &mut TraceContext,
        uuid: TrackUuid,
        reservation: &TrackReservation,
        pid: u32,
    ) -> ProcessHandle {
        let handle = cx.processes.get_or_create_process(pid);
        match self.process_bindings.get(&handle).copied() {
            None => {
                self.process_bindings.insert(handle, uuid);
                handle
            }
            Some(bound) if bound == uuid => handle,
            Some(bound) => {
                warn!(
                    pid,
                    previous_uuid = %bound,
                    new_uuid = %uuid,
                    timestamp = reservation.min_timestamp,
                    "process id claimed by a new track; starting a new logical process"
                );
                cx.storage.stats.increment(Stat::ProcessIdReuse);
                let fresh = cx.processes.start_new_process(pid);
                self.process_bindings.insert(fresh, uuid);
                fresh
            }
        }
    }
}
