mod common;

use std::collections::HashSet;
use std::sync::mpsc;
use std::thread;

use assert_matches::assert_matches;

use common::MockCatalog;
use pokedex_viewer::error::DexError;
use pokedex_viewer::list::{Accumulator, ListPhase, LoadOutcome};

#[test]
fn first_page_then_empty_page_exhausts() {
    let catalog = MockCatalog {
        always_next: true,
        ..MockCatalog::with_total(20)
    };
    let list = Accumulator::new(catalog, 20);
    assert_eq!(list.phase(), ListPhase::Idle);

    assert_matches!(list.load_more(), Ok(LoadOutcome::Loaded { added: 20 }));
    assert_eq!(list.len(), 20);
    assert!(list.has_more());
    assert_eq!(list.phase(), ListPhase::Ready);

    assert_matches!(list.load_more(), Ok(LoadOutcome::Exhausted));
    assert_eq!(list.len(), 20);
    assert!(!list.has_more());

    assert_matches!(list.load_more(), Ok(LoadOutcome::Skipped));
    assert_eq!(list.client().page_calls(), vec![(20, 0), (20, 20)]);
    assert_eq!(list.client().record_calls(), 20);
}

#[test]
fn offsets_follow_accumulated_length() {
    let list = Accumulator::new(MockCatalog::with_total(45), 20);
    list.load_more().unwrap();
    list.load_more().unwrap();
    assert_matches!(list.load_more(), Ok(LoadOutcome::Loaded { added: 5 }));
    assert!(!list.has_more());
    assert_eq!(list.client().page_calls(), vec![(20, 0), (20, 20), (20, 40)]);

    let ids = list.records().iter().map(|r| r.id).collect::<Vec<_>>();
    assert_eq!(ids, (1..=45).collect::<Vec<_>>());
}

#[test]
fn page_members_keep_listing_order() {
    let list = Accumulator::new(MockCatalog::with_total(30), 30);
    list.load_more().unwrap();
    let ids = list.records().iter().map(|r| r.id).collect::<Vec<_>>();
    assert_eq!(ids, (1..=30).collect::<Vec<_>>());
}

#[test]
fn concurrent_load_more_issues_one_fetch() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let catalog = MockCatalog::with_total(60);
    catalog.gate_next_page(entered_tx, release_rx);
    let list = Accumulator::new(catalog, 20);

    thread::scope(|scope| {
        let first = scope.spawn(|| list.load_more());
        entered_rx.recv().unwrap();

        assert!(list.is_loading());
        assert_eq!(list.phase(), ListPhase::LoadingInitial);
        assert_matches!(list.load_more(), Ok(LoadOutcome::Skipped));

        release_tx.send(()).unwrap();
        assert_matches!(first.join().unwrap(), Ok(LoadOutcome::Loaded { added: 20 }));
    });

    assert_eq!(list.client().page_calls(), vec![(20, 0)]);
    assert!(!list.is_loading());
}

#[test]
fn failed_page_keeps_records_and_can_retry() {
    let catalog = MockCatalog::with_total(60);
    catalog.failing_offsets.lock().unwrap().insert(20);
    let list = Accumulator::new(catalog, 20);

    list.load_more().unwrap();
    assert_matches!(list.load_more(), Err(DexError::CatalogHttp(_)));
    assert_eq!(list.len(), 20);
    assert!(list.has_more());
    assert!(!list.is_loading());
    assert!(list.error().is_some());

    list.client().failing_offsets.lock().unwrap().clear();
    assert_matches!(list.load_more(), Ok(LoadOutcome::Loaded { added: 20 }));
    assert_eq!(list.len(), 40);
    assert_eq!(list.error(), None);
    assert_eq!(
        list.client().page_calls(),
        vec![(20, 0), (20, 20), (20, 20)]
    );
}

#[test]
fn member_failure_fails_whole_page() {
    let catalog = MockCatalog {
        failing_records: HashSet::from([7]),
        ..MockCatalog::with_total(20)
    };
    let list = Accumulator::new(catalog, 20);
    assert_matches!(
        list.load_more(),
        Err(DexError::CatalogStatus { status: 404, .. })
    );
    assert!(list.is_empty());
    assert!(list.has_more());
}

#[test]
fn reset_starts_over_at_offset_zero() {
    let list = Accumulator::new(MockCatalog::with_total(60), 20);
    list.load_more().unwrap();
    list.load_more().unwrap();
    assert_eq!(list.len(), 40);

    assert_matches!(list.reset(), Ok(LoadOutcome::Loaded { added: 20 }));
    assert_eq!(list.len(), 20);
    assert!(list.has_more());
    assert_eq!(
        list.client().page_calls(),
        vec![(20, 0), (20, 20), (20, 0)]
    );
}

#[test]
fn load_started_before_reset_is_discarded() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let catalog = MockCatalog::with_total(60);
    catalog.gate_next_page(entered_tx, release_rx);
    let list = Accumulator::new(catalog, 20);

    thread::scope(|scope| {
        let stale = scope.spawn(|| list.load_more());
        entered_rx.recv().unwrap();

        assert_matches!(list.reset(), Ok(LoadOutcome::Loaded { added: 20 }));

        release_tx.send(()).unwrap();
        assert_matches!(stale.join().unwrap(), Ok(LoadOutcome::Skipped));
    });

    let records = list.records();
    let unique = records.iter().map(|r| r.id).collect::<HashSet<_>>();
    assert_eq!(records.len(), 20);
    assert_eq!(unique.len(), 20);
    assert!(!list.is_loading());
}

#[test]
fn duplicate_ids_across_pages_are_dropped() {
    let catalog = MockCatalog {
        overlap: true,
        ..MockCatalog::with_total(40)
    };
    let list = Accumulator::new(catalog, 20);
    list.load_more().unwrap();
    assert_matches!(list.load_more(), Ok(LoadOutcome::Loaded { added: 20 }));

    let records = list.records();
    let unique = records.iter().map(|r| r.id).collect::<HashSet<_>>();
    assert_eq!(records.len(), unique.len());
    assert_eq!(records.len(), 40);
}

#[test]
fn version_changes_with_records_and_resets() {
    let list = Accumulator::new(MockCatalog::with_total(60), 20);
    let empty = list.with_state(|state| state.version());
    list.load_more().unwrap();
    let first = list.with_state(|state| state.version());
    assert_ne!(empty, first);

    list.reset().unwrap();
    let after_reset = list.with_state(|state| state.version());
    assert_eq!(list.len(), 20);
    assert_ne!(first, after_reset);
}

#[test]
fn page_size_is_clamped_to_fan_out_limit() {
    let list = Accumulator::new(MockCatalog::with_total(500), 5000);
    assert_matches!(list.load_more(), Ok(LoadOutcome::Loaded { added: 100 }));
    assert_eq!(list.client().page_calls(), vec![(100, 0)]);
    assert_eq!(list.client().record_calls(), 100);
}
