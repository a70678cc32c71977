//! Parent Chain and Placement Tests
//!
//! Nested hierarchies, out-of-order resolution, the default-track fallback,
//! and the degradation paths for cyclic, over-deep, and dangling chains.

use crate::*;

// =============================================================================
// NESTED HIERARCHY TESTS
// =============================================================================

#[test]
fn test_nested_hierarchy_places_scoped_rows() {
    let mut session = new_session();

    session
        .declare_process_track(uuid(1), Some("app"), 1001, 0)
        .unwrap();
    session
        .declare_thread_track(uuid(2), Some(uuid(1)), Some("main"), 1001, 1001, 0)
        .unwrap();
    session
        .declare_child_track(uuid(3), Some(uuid(2)), Some("async ops"))
        .unwrap();
    session
        .declare_counter_track(uuid(4), Some(uuid(1)), Some("rss"), None, 1, false, seq(0))
        .unwrap();

    let process = session.resolve_track(uuid(1), None).unwrap();
    let thread = session.resolve_track(uuid(2), None).unwrap();
    let child = session.resolve_track(uuid(3), None).unwrap();
    let counter = session.resolve_track(uuid(4), None).unwrap();

    let tracks = &session.storage().tracks;
    assert_eq!(tracks.kind(process), Some(TrackKind::Process));
    assert_eq!(tracks.kind(thread), Some(TrackKind::Thread));
    assert_eq!(tracks.kind(child), Some(TrackKind::Thread), "child inherits thread scope");
    assert_eq!(tracks.kind(counter), Some(TrackKind::ProcessCounter));

    // The child shares its parent thread's scope.
    assert_eq!(tracks.thread_scope(child), tracks.thread_scope(thread));

    // Provenance records the resolved parent rows.
    assert_eq!(provenance_parent(&session, thread), Some(process));
    assert_eq!(provenance_parent(&session, child), Some(thread));
    assert_eq!(provenance_parent(&session, counter), Some(process));
}

#[test]
fn test_child_resolution_materializes_ancestors() {
    let mut session = new_session();

    // Declared leaf-last, resolved leaf-first.
    session
        .declare_child_track(uuid(3), Some(uuid(2)), None)
        .unwrap();
    session
        .declare_thread_track(uuid(2), Some(uuid(1)), None, 7, 7, 0)
        .unwrap();
    session
        .declare_process_track(uuid(1), None, 7, 0)
        .unwrap();

    let child = session.resolve_track(uuid(3), None).unwrap();
    let rows_after_leaf = session.storage().tracks.row_count();

    // The whole chain materialized in one walk; later resolutions memo-hit.
    let thread = session.resolve_track(uuid(2), None).unwrap();
    session.resolve_track(uuid(1), None).unwrap();
    assert_eq!(session.storage().tracks.row_count(), rows_after_leaf);
    assert_eq!(provenance_parent(&session, child), Some(thread));
}

// =============================================================================
// DEFAULT TRACK TESTS
// =============================================================================

#[test]
fn test_parentless_global_track_hangs_off_default_track() {
    let mut session = new_session();
    session
        .declare_child_track(uuid(99), None, Some("lifecycle"))
        .unwrap();

    let row = session.resolve_track(uuid(99), None).unwrap();
    let default = session.default_track();

    assert_eq!(provenance_parent(&session, row), Some(default));
    assert_eq!(provenance_parent(&session, default), None, "default track has no parent");
    assert_eq!(row_name(&session, default).as_deref(), Some("Default Track"));
}

#[test]
fn test_default_uuid_resolves_only_after_first_use() {
    let mut session = new_session();

    // Nothing has referenced the default track yet.
    assert_eq!(session.resolve_track(uuid(0), None), None);

    let default = session.default_track();
    assert_eq!(session.resolve_track(uuid(0), None), Some(default));
    assert_eq!(session.default_track(), default);
}

#[test]
fn test_builder_configures_depth_and_default_name() {
    let mut session = TraceSession::builder()
        .max_parent_depth(2)
        .default_track_name("Trace")
        .build();

    for i in 1..=3_u64 {
        session
            .declare_child_track(uuid(i), Some(uuid(i + 1)), None)
            .unwrap();
    }
    session.declare_child_track(uuid(4), None, None).unwrap();

    let base = session.resolve_track(uuid(1), None).unwrap();
    assert_eq!(session.stats().parent_chain_too_deep, 1);

    // Tracks 1..=3 placed (the guard fired while placing track 3), plus the
    // default track; track 4 was never reached.
    assert_eq!(session.storage().tracks.row_count(), 4);
    assert!(session.resolve_track(uuid(1), None).is_some());
    assert_eq!(session.resolve_track(uuid(1), None), Some(base));
    let default = session.default_track();
    assert_eq!(row_name(&session, default).as_deref(), Some("Trace"));
}

// =============================================================================
// DEGRADATION TESTS
// =============================================================================

#[test]
fn test_mutual_parent_cycle_resolves_both() {
    let mut session = new_session();
    session
        .declare_child_track(uuid(1), Some(uuid(2)), Some("a"))
        .unwrap();
    session
        .declare_child_track(uuid(2), Some(uuid(1)), Some("b"))
        .unwrap();

    let a = session.resolve_track(uuid(1), None).unwrap();
    let b = session.resolve_track(uuid(2), None).unwrap();

    assert_ne!(a, b);
    let tracks = &session.storage().tracks;
    assert_eq!(tracks.kind(a), Some(TrackKind::Generic));
    assert_eq!(tracks.kind(b), Some(TrackKind::Generic));
    assert_eq!(session.stats().parent_chain_cycles, 1);

    // The cycle edge was dropped: b fell back to the default track, while a
    // kept its resolved parent.
    let default = session.default_track();
    assert_eq!(provenance_parent(&session, b), Some(default));
    assert_eq!(provenance_parent(&session, a), Some(b));
}

#[test]
fn test_self_parent_resolves_parentless() {
    let mut session = new_session();
    session
        .declare_child_track(uuid(5), Some(uuid(5)), None)
        .unwrap();

    let row = session.resolve_track(uuid(5), None).unwrap();
    assert_eq!(
        session.storage().tracks.kind(row),
        Some(TrackKind::Generic)
    );
    assert_eq!(session.stats().parent_chain_cycles, 1);
}

#[test]
fn test_eleven_nested_parents_truncate_at_the_tenth() {
    let mut session = new_session();

    // Base track 1 under parents 2..=12: eleven nested ancestors.
    for i in 1..=11_u64 {
        session
            .declare_child_track(uuid(i), Some(uuid(i + 1)), None)
            .unwrap();
    }
    session.declare_child_track(uuid(12), None, None).unwrap();

    session.resolve_track(uuid(1), None).unwrap();

    assert_eq!(session.stats().parent_chain_too_deep, 1);
    // Tracks 1..=11 placed (the walk stopped at the tenth ancestor) plus the
    // default track; track 12 was never reached.
    assert_eq!(session.storage().tracks.row_count(), 12);

    // The truncated ancestor became a default-track child.
    let tenth_ancestor = session.resolve_track(uuid(11), None).unwrap();
    assert_eq!(
        provenance_parent(&session, tenth_ancestor),
        Some(session.default_track())
    );
}

#[test]
fn test_unknown_parent_resolves_parentless_with_diagnostic() {
    let mut session = new_session();
    session
        .declare_child_track(uuid(1), Some(uuid(404)), Some("orphan"))
        .unwrap();

    let row = session.resolve_track(uuid(1), None).unwrap();

    assert_eq!(session.storage().tracks.kind(row), Some(TrackKind::Generic));
    assert_eq!(session.stats().unknown_parent_tracks, 1);
    // Indistinguishable from a cycle in the outcome: still resolves.
    assert_eq!(session.resolve_track(uuid(1), None), Some(row));
}

// =============================================================================
// NAME TESTS
// =============================================================================

#[test]
fn test_event_name_backfill_is_first_writer_wins() {
    let mut session = new_session();
    session.declare_child_track(uuid(1), None, None).unwrap();
    session
        .declare_thread_track(uuid(2), None, None, 9, 9, 0)
        .unwrap();

    let first = session.intern("first event");
    let second = session.intern("second event");

    let child = session.resolve_track(uuid(1), Some(first)).unwrap();
    session.resolve_track(uuid(1), Some(second));
    assert_eq!(row_name(&session, child).as_deref(), Some("first event"));

    // Primary tracks never take event names.
    let thread = session.resolve_track(uuid(2), Some(first)).unwrap();
    assert_eq!(row_name(&session, thread), None);
}

#[test]
fn test_reservation_name_beats_event_name() {
    let mut session = new_session();
    session
        .declare_child_track(uuid(1), None, Some("declared"))
        .unwrap();

    let event = session.intern("event");
    let row = session.resolve_track(uuid(1), Some(event)).unwrap();
    assert_eq!(row_name(&session, row).as_deref(), Some("declared"));
}
