//! Columnar track tables.
//!
//! Track rows live in six append-only variant tables that share a single
//! [`TrackRowId`] space and a single mutable name column:
//! - generic tracks (global roots, the default track, loose children)
//! - global counter tracks
//! - process tracks and process counter tracks (scoped to a [`ProcessHandle`])
//! - thread tracks and thread counter tracks (scoped to a [`ThreadHandle`])
//!
//! Row ids are issued in insertion order, so each table's id column is sorted
//! and position lookups are binary searches.

use tracedb_core::{ProcessHandle, StringId, ThreadHandle, TrackRowId};

/// Placement variant of a track row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    /// Global or loose child track
    Generic,
    /// Global counter track
    Counter,
    /// Process track
    Process,
    /// Counter track scoped to a process
    ProcessCounter,
    /// Thread track
    Thread,
    /// Counter track scoped to a thread
    ThreadCounter,
}

/// Append-only table of unscoped track rows.
#[derive(Debug, Default)]
pub struct PlainTrackTable {
    ids: Vec<TrackRowId>,
}

impl PlainTrackTable {
    fn insert(&mut self, id: TrackRowId) {
        self.ids.push(id);
    }

    /// Position of a row in this table, if it belongs to it.
    pub fn index_of(&self, id: TrackRowId) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    /// The sorted row id column.
    pub fn ids(&self) -> &[TrackRowId] {
        &self.ids
    }

    /// Number of rows in this table.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Append-only table of track rows scoped to a process or thread.
#[derive(Debug)]
pub struct ScopedTrackTable<H> {
    ids: Vec<TrackRowId>,
    scopes: Vec<H>,
}

impl<H> Default for ScopedTrackTable<H> {
    fn default() -> Self {
        ScopedTrackTable {
            ids: Vec::new(),
            scopes: Vec::new(),
        }
    }
}

impl<H: Copy> ScopedTrackTable<H> {
    fn insert(&mut self, id: TrackRowId, scope: H) {
        self.ids.push(id);
        self.scopes.push(scope);
    }

    /// Position of a row in this table, if it belongs to it.
    pub fn index_of(&self, id: TrackRowId) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    /// The scope handle of a row, if it belongs to this table.
    pub fn scope_of(&self, id: TrackRowId) -> Option<H> {
        self.index_of(id).map(|pos| self.scopes[pos])
    }

    /// The sorted row id column.
    pub fn ids(&self) -> &[TrackRowId] {
        &self.ids
    }

    /// Number of rows in this table.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// All track variant tables plus the shared name column.
#[derive(Debug, Default)]
pub struct TrackTables {
    names: Vec<Option<StringId>>,
    generic: PlainTrackTable,
    counters: PlainTrackTable,
    processes: ScopedTrackTable<ProcessHandle>,
    process_counters: ScopedTrackTable<ProcessHandle>,
    threads: ScopedTrackTable<ThreadHandle>,
    thread_counters: ScopedTrackTable<ThreadHandle>,
}

impl TrackTables {
    /// Create an empty set of tables.
    pub fn new() -> Self {
        Self::default()
    }

    fn issue_row(&mut self, name: Option<StringId>) -> TrackRowId {
        let id = TrackRowId::new(self.names.len() as u32);
        self.names.push(name);
        id
    }

    /// Insert a global or loose child track.
    pub fn insert_generic(&mut self, name: Option<StringId>) -> TrackRowId {
        let id = self.issue_row(name);
        self.generic.insert(id);
        id
    }

    /// Insert a global counter track.
    pub fn insert_counter(&mut self, name: Option<StringId>) -> TrackRowId {
        let id = self.issue_row(name);
        self.counters.insert(id);
        id
    }

    /// Insert a track scoped to a process.
    pub fn insert_process(&mut self, process: ProcessHandle, name: Option<StringId>) -> TrackRowId {
        let id = self.issue_row(name);
        self.processes.insert(id, process);
        id
    }

    /// Insert a counter track scoped to a process.
    pub fn insert_process_counter(
        &mut self,
        process: ProcessHandle,
        name: Option<StringId>,
    ) -> TrackRowId {
        let id = self.issue_row(name);
        self.process_counters.insert(id, process);
        id
    }

    /// Insert a track scoped to a thread.
    pub fn insert_thread(&mut self, thread: ThreadHandle, name: Option<StringId>) -> TrackRowId {
        let id = self.issue_row(name);
        self.threads.insert(id, thread);
        id
    }

    /// Insert a counter track scoped to a thread.
    pub fn insert_thread_counter(
        &mut self,
        thread: ThreadHandle,
        name: Option<StringId>,
    ) -> TrackRowId {
        let id = self.issue_row(name);
        self.thread_counters.insert(id, thread);
        id
    }

    /// The display name of a row, if one has been set.
    pub fn name(&self, row: TrackRowId) -> Option<StringId> {
        self.names.get(row.raw() as usize).copied().flatten()
    }

    /// Set the display name of a row. Overwrites; first-writer-wins policies
    /// belong to the caller.
    pub fn set_name(&mut self, row: TrackRowId, name: StringId) {
        if let Some(slot) = self.names.get_mut(row.raw() as usize) {
            *slot = Some(name);
        }
    }

    /// Total number of rows across every variant.
    pub fn row_count(&self) -> usize {
        self.names.len()
    }

    /// The placement variant of a row.
    pub fn kind(&self, row: TrackRowId) -> Option<TrackKind> {
        if self.generic.index_of(row).is_some() {
            Some(TrackKind::Generic)
        } else if self.counters.index_of(row).is_some() {
            Some(TrackKind::Counter)
        } else if self.processes.index_of(row).is_some() {
            Some(TrackKind::Process)
        } else if self.process_counters.index_of(row).is_some() {
            Some(TrackKind::ProcessCounter)
        } else if self.threads.index_of(row).is_some() {
            Some(TrackKind::Thread)
        } else if self.thread_counters.index_of(row).is_some() {
            Some(TrackKind::ThreadCounter)
        } else {
            None
        }
    }

    /// The thread a row is scoped to, if it is a (non-counter) thread track.
    pub fn thread_scope(&self, row: TrackRowId) -> Option<ThreadHandle> {
        self.threads.scope_of(row)
    }

    /// The process a row is scoped to, if it is a (non-counter) process track.
    pub fn process_scope(&self, row: TrackRowId) -> Option<ProcessHandle> {
        self.processes.scope_of(row)
    }

    /// The generic track table.
    pub fn generic(&self) -> &PlainTrackTable {
        &self.generic
    }

    /// The global counter track table.
    pub fn counters(&self) -> &PlainTrackTable {
        &self.counters
    }

    /// The process track table.
    pub fn processes(&self) -> &ScopedTrackTable<ProcessHandle> {
        &self.processes
    }

    /// The process counter track table.
    pub fn process_counters(&self) -> &ScopedTrackTable<ProcessHandle> {
        &self.process_counters
    }

    /// The thread track table.
    pub fn threads(&self) -> &ScopedTrackTable<ThreadHandle> {
        &self.threads
    }

    /// The thread counter track table.
    pub fn thread_counters(&self) -> &ScopedTrackTable<ThreadHandle> {
        &self.thread_counters
    }
}
