//! Counter sample decoding.
//!
//! Counter tracks carry numeric samples that arrive either as absolute values
//! or as deltas against a per-track running total. Decoding lives on
//! [`TrackResolver`] because the running totals are reservation state, scoped
//! to the same session as everything else.

use tracing::debug;

use tracedb_core::{Result, SequenceId, TrackError, TrackUuid};
use tracedb_storage::Stat;

use crate::reservation::CounterEncoding;
use crate::resolver::TrackResolver;
use crate::TraceContext;

impl TrackResolver {
    /// Decode one raw counter sample into its absolute value.
    ///
    /// Absolute samples are scaled by the counter's unit multiplier and passed
    /// through. Incremental samples are scaled, folded into the running total,
    /// and the new total is returned. An incremental sample arriving from a
    /// sequence other than the counter's owner is rejected without touching
    /// the total. All arithmetic saturates.
    pub fn resolve_counter_value(
        &mut self,
        cx: &mut TraceContext,
        uuid: TrackUuid,
        sequence: SequenceId,
        raw: i64,
    ) -> Result<i64> {
        let reservation = self
            .reservations
            .get_mut(uuid)
            .ok_or(TrackError::UnknownTrack { uuid })?;
        let counter = reservation
            .counter
            .as_mut()
            .ok_or(TrackError::NotACounter { uuid })?;

        let value = if counter.unit_multiplier > 0 {
            raw.saturating_mul(counter.unit_multiplier)
        } else {
            raw
        };
        match &mut counter.encoding {
            CounterEncoding::Absolute => Ok(value),
            CounterEncoding::Incremental {
                owning_sequence,
                running_total,
            } => {
                if *owning_sequence != sequence {
                    debug!(
                        %uuid,
                        owner = %owning_sequence,
                        got = %sequence,
                        "incremental counter sample from a foreign sequence; dropping it"
                    );
                    cx.storage.stats.increment(Stat::CounterSequenceMismatches);
                    return Err(TrackError::SequenceMismatch {
                        uuid,
                        expected: *owning_sequence,
                        got: sequence,
                    });
                }
                *running_total = running_total.saturating_add(value);
                Ok(*running_total)
            }
        }
    }

    /// Reset the running total of every incremental counter owned by a
    /// sequence. Producers signal this when their incremental state was
    /// dropped, e.g. after ring buffer loss.
    pub fn clear_incremental_state(&mut self, sequence: SequenceId) {
        // TODO: index incremental counters by sequence if packet loss ever
        // makes this scan hot.
        for (_, reservation) in self.reservations.iter_mut() {
            if let Some(counter) = reservation.counter.as_mut() {
                if let CounterEncoding::Incremental {
                    owning_sequence,
                    running_total,
                } = &mut counter.encoding
                {
                    if *owning_sequence == sequence {
                        *running_total = 0;
                    }
                }
            }
        }
    }
}
