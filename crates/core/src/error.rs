//! Error types for track resolution.
//!
//! Malformed trace input is expected, not exceptional: every condition here
//! is reported to the caller so ingestion can drop the offending packet and
//! keep going. Nothing in this crate panics on input.

use thiserror::Error;

use crate::ids::{SequenceId, TrackUuid};

/// All track resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// A track uuid was redeclared with an incompatible shape.
    ///
    /// The first declaration stays authoritative; the conflicting one is
    /// dropped.
    #[error("track {uuid} redeclared with a conflicting shape")]
    ReservationMismatch {
        /// The redeclared track uuid.
        uuid: TrackUuid,
    },

    /// An operation referenced a uuid with no reservation.
    #[error("track {uuid} was never declared")]
    UnknownTrack {
        /// The unreserved uuid.
        uuid: TrackUuid,
    },

    /// A counter operation referenced a non-counter track.
    #[error("track {uuid} is not a counter track")]
    NotACounter {
        /// The referenced uuid.
        uuid: TrackUuid,
    },

    /// An incremental counter value arrived from a foreign producer session.
    #[error("counter {uuid} owned by sequence {expected}, got value from {got}")]
    SequenceMismatch {
        /// The incremental counter's uuid.
        uuid: TrackUuid,
        /// The sequence the counter is scoped to.
        expected: SequenceId,
        /// The sequence the value arrived from.
        got: SequenceId,
    },
}

/// Result type for track resolution operations.
pub type Result<T> = std::result::Result<T, TrackError>;

impl TrackError {
    /// Check if this is an unknown-reference error.
    pub fn is_unknown_track(&self) -> bool {
        matches!(self, TrackError::UnknownTrack { .. })
    }

    /// Check if this error invalidates only the current value, leaving the
    /// track itself usable.
    pub fn is_value_only(&self) -> bool {
        matches!(self, TrackError::SequenceMismatch { .. })
    }
}
