//! OS Identity Reuse Tests
//!
//! Pid/tid reuse disambiguation: a second uuid claiming an already-bound OS
//! identifier starts a fresh logical entity instead of merging timelines.

use crate::*;

// =============================================================================
// THREAD ID REUSE TESTS
// =============================================================================

#[test]
fn test_tid_reuse_yields_two_logical_threads() {
    let mut session = new_session();

    session
        .declare_thread_track(uuid(1), None, Some("worker"), 1, 7, 100)
        .unwrap();
    session
        .declare_thread_track(uuid(2), None, Some("worker"), 1, 7, 900)
        .unwrap();

    let first = session.resolve_track(uuid(1), None).unwrap();
    let second = session.resolve_track(uuid(2), None).unwrap();

    assert_ne!(first, second, "reused tid must not merge timelines");
    assert_eq!(session.stats().thread_id_reuse, 1);

    let tracks = &session.storage().tracks;
    let first_thread = tracks.thread_scope(first).unwrap();
    let second_thread = tracks.thread_scope(second).unwrap();
    assert_ne!(first_thread, second_thread);

    // Both incarnations observed the same OS ids.
    let registry = session.processes();
    assert_eq!(registry.thread(first_thread).unwrap().tid, 7);
    assert_eq!(registry.thread(second_thread).unwrap().tid, 7);
    assert_eq!(registry.thread_count(), 2);
}

#[test]
fn test_tid_reuse_diagnostic_fires_once_per_reuse() {
    let mut session = new_session();

    session
        .declare_thread_track(uuid(1), None, None, 1, 7, 0)
        .unwrap();
    session
        .declare_thread_track(uuid(2), None, None, 1, 7, 0)
        .unwrap();

    session.resolve_track(uuid(1), None).unwrap();
    session.resolve_track(uuid(2), None).unwrap();
    // Memoized re-resolutions never re-trigger the diagnostic.
    session.resolve_track(uuid(1), None).unwrap();
    session.resolve_track(uuid(2), None).unwrap();

    assert_eq!(session.stats().thread_id_reuse, 1);
}

#[test]
fn test_counter_under_reused_thread_scopes_to_new_incarnation() {
    let mut session = new_session();

    session
        .declare_thread_track(uuid(1), None, None, 1, 7, 0)
        .unwrap();
    session
        .declare_thread_track(uuid(2), None, None, 1, 7, 0)
        .unwrap();
    session
        .declare_counter_track(uuid(3), Some(uuid(2)), Some("irq"), None, 1, false, seq(0))
        .unwrap();

    let old = session.resolve_track(uuid(1), None).unwrap();
    let new = session.resolve_track(uuid(2), None).unwrap();
    let counter = session.resolve_track(uuid(3), None).unwrap();

    let tracks = &session.storage().tracks;
    assert_eq!(tracks.kind(counter), Some(TrackKind::ThreadCounter));
    assert_eq!(
        tracks.thread_counters().scope_of(counter),
        tracks.thread_scope(new)
    );
    assert_ne!(
        tracks.thread_counters().scope_of(counter),
        tracks.thread_scope(old)
    );
}

// =============================================================================
// PROCESS ID REUSE TESTS
// =============================================================================

#[test]
fn test_pid_reuse_yields_two_logical_processes() {
    let mut session = new_session();

    session
        .declare_process_track(uuid(1), Some("old"), 4242, 100)
        .unwrap();
    session
        .declare_process_track(uuid(2), Some("new"), 4242, 5000)
        .unwrap();

    let first = session.resolve_track(uuid(1), None).unwrap();
    let second = session.resolve_track(uuid(2), None).unwrap();

    assert_ne!(first, second);
    assert_eq!(session.stats().process_id_reuse, 1);

    let tracks = &session.storage().tracks;
    assert_ne!(tracks.process_scope(first), tracks.process_scope(second));

    let registry = session.processes();
    assert_eq!(registry.process_count(), 2);
    for row in [first, second] {
        let handle = tracks.process_scope(row).unwrap();
        assert_eq!(registry.process(handle).unwrap().pid, 4242);
    }
}

#[test]
fn test_same_uuid_redeclaration_is_not_reuse() {
    let mut session = new_session();

    session
        .declare_process_track(uuid(1), None, 4242, 100)
        .unwrap();
    let row = session.resolve_track(uuid(1), None).unwrap();

    session
        .declare_process_track(uuid(1), Some("late name"), 4242, 50)
        .unwrap();
    assert_eq!(session.resolve_track(uuid(1), None), Some(row));
    assert_eq!(session.stats().process_id_reuse, 0);
    assert_eq!(session.processes().process_count(), 1);
}

// =============================================================================
// THREAD AND PROCESS ASSOCIATION TESTS
// =============================================================================

#[test]
fn test_thread_track_joins_declared_process() {
    let mut session = new_session();

    session
        .declare_process_track(uuid(1), Some("app"), 100, 0)
        .unwrap();
    session
        .declare_thread_track(uuid(2), None, Some("main"), 100, 100, 0)
        .unwrap();

    let process_row = session.resolve_track(uuid(1), None).unwrap();
    let thread_row = session.resolve_track(uuid(2), None).unwrap();

    let tracks = &session.storage().tracks;
    let process = tracks.process_scope(process_row).unwrap();
    let thread = tracks.thread_scope(thread_row).unwrap();

    assert_eq!(
        session.processes().thread(thread).unwrap().process,
        Some(process),
        "thread record should associate with the declared pid's process"
    );
}
