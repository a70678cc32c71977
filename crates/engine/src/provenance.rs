//! Provenance annotation.
//!
//! Every track row created by resolution is stamped with arguments recording
//! where it came from: the declaration mechanism, the producer-chosen uuid,
//! the resolved parent row, and the counter category when one was declared.
//! The argument keys are interned once at resolver construction.

use tracedb_core::{ArgValue, StringId, TrackRowId, TrackUuid};
use tracedb_storage::StringPool;

use crate::resolver::TrackResolver;
use crate::TraceContext;

/// Interned argument keys, plus the interned source label.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProvenanceKeys {
    pub(crate) source: StringId,
    pub(crate) source_id: StringId,
    pub(crate) parent_track_id: StringId,
    pub(crate) category: StringId,
    /// Value written under `source`; tracks here always come from
    /// producer declarations.
    pub(crate) descriptor_source: StringId,
}

impl ProvenanceKeys {
    pub(crate) fn intern(strings: &mut StringPool) -> Self {
        ProvenanceKeys {
            source: strings.intern("source"),
            source_id: strings.intern("source_id"),
            parent_track_id: strings.intern("parent_track_id"),
            category: strings.intern("category"),
            descriptor_source: strings.intern("descriptor"),
        }
    }
}

impl TrackResolver {
    /// Stamp a freshly created track row with its origin.
    pub(crate) fn annotate(
        &self,
        cx: &mut TraceContext,
        row: TrackRowId,
        uuid: TrackUuid,
        parent: Option<TrackRowId>,
        category: Option<StringId>,
    ) {
        let keys = self.keys;
        let mut writer = cx.storage.args.attach_to(row);
        writer
            .arg(keys.source, ArgValue::Text(keys.descriptor_source))
            .arg(keys.source_id, ArgValue::Integer(uuid.raw() as i64));
        if let Some(parent) = parent {
            writer.arg(
                keys.parent_track_id,
                ArgValue::Integer(i64::from(parent.raw())),
            );
        }
        if let Some(category) = category {
            writer.arg(keys.category, ArgValue::Text(category));
        }
    }
}
