//! Interned string pool.
//!
//! Every display name, argument key, and category label is interned once and
//! referred to by [`StringId`] afterwards. Interning the same string twice
//! returns the same id, so equality checks on names are integer compares.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracedb_core::StringId;

/// Append-only deduplicating string table.
#[derive(Debug, Default)]
pub struct StringPool {
    strings: Vec<Arc<str>>,
    index: FxHashMap<Arc<str>, StringId>,
}

impl StringPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning the id of the existing copy if one exists.
    pub fn intern(&mut self, s: &str) -> StringId {
        if let Some(&id) = self.index.get(s) {
            return id;
        }
        let id = StringId::new(self.strings.len() as u32);
        let stored: Arc<str> = Arc::from(s);
        self.strings.push(Arc::clone(&stored));
        self.index.insert(stored, id);
        id
    }

    /// Look up the string for an id.
    pub fn get(&self, id: StringId) -> Option<&str> {
        self.strings.get(id.raw() as usize).map(|s| s.as_ref())
    }

    /// Look up the id for a string without interning it.
    pub fn lookup(&self, s: &str) -> Option<StringId> {
        self.index.get(s).copied()
    }

    /// Number of distinct strings interned.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// True if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
