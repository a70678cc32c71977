//! Per-row argument attachment.
//!
//! Free-form key/value metadata keyed by track row. Writers are fluent:
//!
//! ```ignore
//! store.attach_to(row).arg(key, ArgValue::Integer(1)).arg(other, value);
//! ```

use rustc_hash::FxHashMap;
use tracedb_core::{ArgValue, StringId, TrackRowId};

/// Key/value argument store for track rows.
#[derive(Debug, Default)]
pub struct ArgStore {
    entries: FxHashMap<TrackRowId, Vec<(StringId, ArgValue)>>,
}

impl ArgStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start writing arguments for a row.
    pub fn attach_to(&mut self, row: TrackRowId) -> ArgWriter<'_> {
        ArgWriter {
            entries: self.entries.entry(row).or_default(),
        }
    }

    /// All arguments recorded for a row, in insertion order.
    pub fn args_for(&self, row: TrackRowId) -> &[(StringId, ArgValue)] {
        self.entries.get(&row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The value recorded for a key on a row, if any.
    pub fn find(&self, row: TrackRowId, key: StringId) -> Option<ArgValue> {
        self.args_for(row)
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    /// Number of rows that carry at least one argument.
    pub fn annotated_rows(&self) -> usize {
        self.entries.len()
    }
}

/// Fluent writer appending arguments to one row.
#[derive(Debug)]
pub struct ArgWriter<'a> {
    entries: &'a mut Vec<(StringId, ArgValue)>,
}

impl ArgWriter<'_> {
    /// Record a key/value pair. Writing a key twice updates it in place.
    pub fn arg(&mut self, key: StringId, value: impl Into<ArgValue>) -> &mut Self {
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
        self
    }
}
