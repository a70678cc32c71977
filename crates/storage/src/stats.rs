//! Ingestion diagnostics counters.
//!
//! Malformed input never aborts ingestion; it bumps one of these counters
//! instead. The counters answer "how degraded is this trace" after the fact
//! and back the assertions in the anomaly tests.

use serde::Serialize;

/// One diagnostic condition observed during ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    /// A uuid was redeclared with a conflicting shape.
    InconsistentTrackDeclarations,
    /// An OS thread id was claimed by a new track uuid.
    ThreadIdReuse,
    /// An OS process id was claimed by a new track uuid.
    ProcessIdReuse,
    /// A parent chain looped back on itself.
    ParentChainCycles,
    /// A parent chain exceeded the depth bound.
    ParentChainTooDeep,
    /// A declared parent uuid was never itself declared.
    UnknownParentTracks,
    /// An incremental counter value arrived from a foreign sequence.
    CounterSequenceMismatches,
}

const STAT_COUNT: usize = 7;

impl Stat {
    /// Every counter, in snapshot order.
    pub const ALL: [Stat; STAT_COUNT] = [
        Stat::InconsistentTrackDeclarations,
        Stat::ThreadIdReuse,
        Stat::ProcessIdReuse,
        Stat::ParentChainCycles,
        Stat::ParentChainTooDeep,
        Stat::UnknownParentTracks,
        Stat::CounterSequenceMismatches,
    ];

    fn index(self) -> usize {
        match self {
            Stat::InconsistentTrackDeclarations => 0,
            Stat::ThreadIdReuse => 1,
            Stat::ProcessIdReuse => 2,
            Stat::ParentChainCycles => 3,
            Stat::ParentChainTooDeep => 4,
            Stat::UnknownParentTracks => 5,
            Stat::CounterSequenceMismatches => 6,
        }
    }
}

/// Counter table for every [`Stat`].
#[derive(Debug, Default)]
pub struct StatCounters {
    counts: [u64; STAT_COUNT],
}

impl StatCounters {
    /// Create a zeroed counter table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump a counter by one.
    pub fn increment(&mut self, stat: Stat) {
        self.counts[stat.index()] += 1;
    }

    /// Current value of a counter.
    pub fn count(&self, stat: Stat) -> u64 {
        self.counts[stat.index()]
    }

    /// True if no diagnostic condition has been observed.
    pub fn all_zero(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Point-in-time copy of every counter, suitable for export.
    pub fn snapshot(&self) -> StatSnapshot {
        StatSnapshot {
            inconsistent_track_declarations: self.count(Stat::InconsistentTrackDeclarations),
            thread_id_reuse: self.count(Stat::ThreadIdReuse),
            process_id_reuse: self.count(Stat::ProcessIdReuse),
            parent_chain_cycles: self.count(Stat::ParentChainCycles),
            parent_chain_too_deep: self.count(Stat::ParentChainTooDeep),
            unknown_parent_tracks: self.count(Stat::UnknownParentTracks),
            counter_sequence_mismatches: self.count(Stat::CounterSequenceMismatches),
        }
    }
}

/// Serializable snapshot of the diagnostics counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatSnapshot {
    /// Redeclarations rejected for shape conflicts.
    pub inconsistent_track_declarations: u64,
    /// Thread identities restarted after id reuse.
    pub thread_id_reuse: u64,
    /// Process identities restarted after id reuse.
    pub process_id_reuse: u64,
    /// Parent chains truncated at a cycle.
    pub parent_chain_cycles: u64,
    /// Parent chains truncated at the depth bound.
    pub parent_chain_too_deep: u64,
    /// Parent references that were never declared.
    pub unknown_parent_tracks: u64,
    /// Incremental counter values dropped for sequence mismatch.
    pub counter_sequence_mismatches: u64,
}
