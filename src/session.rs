//! Session entry point for track resolution.
//!
//! This module provides [`TraceSession`], the type an ingestion pipeline
//! holds for the lifetime of one trace.

use tracedb_core::{Result, SequenceId, StringId, TrackRowId, TrackUuid};
use tracedb_engine::{
    TraceContext, TrackReservation, TrackResolver, DEFAULT_MAX_PARENT_DEPTH, DEFAULT_TRACK_NAME,
};
use tracedb_storage::{StatSnapshot, TraceStore};

/// A track resolution session.
///
/// Owns all state for one trace: the columnar storage, the process registry,
/// and the resolver. Construct one per ingestion run with
/// [`TraceSession::new`] or [`TraceSession::builder`] and drop it when the
/// trace is done; sessions share nothing.
///
/// # Example
///
/// ```ignore
/// use tracedb::prelude::*;
///
/// let mut session = TraceSession::new();
///
/// // Declarations arrive in any order, duplicated or not.
/// session.declare_process_track(TrackUuid::new(1), Some("browser"), 1001, 0)?;
/// session.declare_thread_track(TrackUuid::new(2), None, Some("main"), 1001, 1001, 0)?;
///
/// // Resolution happens lazily, when an event first references the track.
/// let row = session.resolve_track(TrackUuid::new(2), None);
/// ```
pub struct TraceSession {
    context: TraceContext,
    resolver: TrackResolver,
}

impl TraceSession {
    /// Create a session with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for session configuration.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let session = TraceSession::builder()
    ///     .max_parent_depth(4)
    ///     .default_track_name("Trace")
    ///     .build();
    /// ```
    pub fn builder() -> TraceSessionBuilder {
        TraceSessionBuilder::new()
    }

    /// Intern a string in the session's string pool.
    pub fn intern(&mut self, text: &str) -> StringId {
        self.context.storage.strings.intern(text)
    }

    // ===== Declarations =====

    /// Declare a process track for an OS process.
    pub fn declare_process_track(
        &mut self,
        uuid: TrackUuid,
        name: Option<&str>,
        pid: u32,
        timestamp: i64,
    ) -> Result<()> {
        self.resolver
            .declare_process_track(&mut self.context, uuid, name, pid, timestamp)
    }

    /// Declare a thread track for an OS thread.
    pub fn declare_thread_track(
        &mut self,
        uuid: TrackUuid,
        parent_uuid: Option<TrackUuid>,
        name: Option<&str>,
        pid: u32,
        tid: u32,
        timestamp: i64,
    ) -> Result<()> {
        self.resolver
            .declare_thread_track(&mut self.context, uuid, parent_uuid, name, pid, tid, timestamp)
    }

    /// Declare a counter track.
    ///
    /// # Arguments
    ///
    /// * `parent_uuid` - Optional parent track this counter hangs off
    /// * `category` - Optional classification label recorded in provenance
    /// * `unit_multiplier` - Scale factor for raw samples; `<= 0` disables scaling
    /// * `is_incremental` - Whether samples are deltas against a running total
    /// * `sequence` - Producer sequence the incremental state is scoped to
    #[allow(clippy::too_many_arguments)]
    pub fn declare_counter_track(
        &mut self,
        uuid: TrackUuid,
        parent_uuid: Option<TrackUuid>,
        name: Option<&str>,
        category: Option<&str>,
        unit_multiplier: i64,
        is_incremental: bool,
        sequence: SequenceId,
    ) -> Result<()> {
        self.resolver.declare_counter_track(
            &mut self.context,
            uuid,
            parent_uuid,
            name,
            category,
            unit_multiplier,
            is_incremental,
            sequence,
        )
    }

    /// Declare a child track under a parent, or a plain global track.
    pub fn declare_child_track(
        &mut self,
        uuid: TrackUuid,
        parent_uuid: Option<TrackUuid>,
        name: Option<&str>,
    ) -> Result<()> {
        self.resolver
            .declare_child_track(&mut self.context, uuid, parent_uuid, name)
    }

    // ===== Resolution =====

    /// Resolve a track uuid to its row, creating the row on first use.
    ///
    /// Returns `None` only for uuids that were never declared. See
    /// [`TrackResolver::resolve`] for the name backfill rules.
    pub fn resolve_track(
        &mut self,
        uuid: TrackUuid,
        event_name: Option<StringId>,
    ) -> Option<TrackRowId> {
        self.resolver.resolve(&mut self.context, uuid, event_name)
    }

    /// Decode one raw counter sample into its absolute value.
    pub fn resolve_counter_value(
        &mut self,
        uuid: TrackUuid,
        sequence: SequenceId,
        raw: i64,
    ) -> Result<i64> {
        self.resolver
            .resolve_counter_value(&mut self.context, uuid, sequence, raw)
    }

    /// Reset incremental counter state owned by a producer sequence.
    pub fn clear_incremental_state(&mut self, sequence: SequenceId) {
        self.resolver.clear_incremental_state(sequence)
    }

    /// The implicit default global track, created on first use.
    pub fn default_track(&mut self) -> TrackRowId {
        self.resolver.default_track(&mut self.context)
    }

    // ===== Read access =====

    /// The reservation currently held for a uuid.
    pub fn reservation(&self, uuid: TrackUuid) -> Option<&TrackReservation> {
        self.resolver.reservation(uuid)
    }

    /// The session's columnar storage.
    pub fn storage(&self) -> &TraceStore {
        &self.context.storage
    }

    /// The session's process registry.
    pub fn processes(&self) -> &tracedb_engine::ProcessRegistry {
        &self.context.processes
    }

    /// Snapshot of the session's diagnostics counters.
    pub fn stats(&self) -> StatSnapshot {
        self.context.storage.stats.snapshot()
    }

    /// Consume the session, handing the trace state to later pipeline stages.
    pub fn into_context(self) -> TraceContext {
        self.context
    }
}

impl Default for TraceSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for session configuration.
///
/// # Example
///
/// ```ignore
/// // Defaults: depth bound 10, default track named "Default Track".
/// let session = TraceSession::builder().build();
///
/// // Tighter chains, custom fallback name:
/// let session = TraceSession::builder()
///     .max_parent_depth(4)
///     .default_track_name("Trace")
///     .build();
/// ```
pub struct TraceSessionBuilder {
    max_parent_depth: usize,
    default_track_name: String,
}

impl TraceSessionBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            max_parent_depth: DEFAULT_MAX_PARENT_DEPTH,
            default_track_name: DEFAULT_TRACK_NAME.to_owned(),
        }
    }

    /// Bound the ancestor chain walked during resolution.
    ///
    /// Chains longer than this resolve with the excess truncated.
    pub fn max_parent_depth(mut self, depth: usize) -> Self {
        self.max_parent_depth = depth;
        self
    }

    /// Display name given to the implicit default track.
    pub fn default_track_name(mut self, name: impl Into<String>) -> Self {
        self.default_track_name = name.into();
        self
    }

    /// Build the session.
    pub fn build(self) -> TraceSession {
        let mut context = TraceContext::new();
        let resolver =
            TrackResolver::with_config(&mut context, self.max_parent_depth, &self.default_track_name);
        TraceSession { context, resolver }
    }
}

impl Default for TraceSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
