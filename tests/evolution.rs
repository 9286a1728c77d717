mod common;

use std::collections::{HashMap, HashSet};

use common::{MockCatalog, link, record};
use pokedex_viewer::evolution::resolve_evolutions;

fn eevee_family() -> MockCatalog {
    let chain = link(
        133,
        "eevee",
        vec![
            link(134, "vaporeon", vec![]),
            link(135, "jolteon", vec![]),
            link(136, "flareon", vec![]),
        ],
    );
    MockCatalog {
        chains: HashMap::from([(133, chain.clone()), (135, chain)]),
        ..MockCatalog::with_total(200)
    }
}

#[test]
fn resolves_chain_in_preorder_with_images() {
    let catalog = eevee_family();
    let eevee = record(133, "eevee", &["normal"], &["run-away"]);
    let evolutions = resolve_evolutions(&catalog, &eevee);

    let names = evolutions.iter().map(|e| e.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["eevee", "vaporeon", "jolteon", "flareon"]);
    assert_eq!(evolutions[2].id, 135);
    assert_eq!(
        evolutions[2].image.as_deref(),
        Some("mock://sprites/135.png")
    );
}

#[test]
fn branching_order_follows_children() {
    let chain = link(
        1,
        "a",
        vec![link(2, "b", vec![link(4, "d", vec![])]), link(3, "c", vec![])],
    );
    let catalog = MockCatalog {
        chains: HashMap::from([(1, chain)]),
        ..MockCatalog::with_total(10)
    };
    let evolutions = resolve_evolutions(&catalog, &record(1, "a", &[], &[]));
    let ids = evolutions.iter().map(|e| e.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 2, 4, 3]);
}

#[test]
fn same_chain_from_any_member() {
    let catalog = eevee_family();
    let from_root = resolve_evolutions(&catalog, &record(133, "eevee", &[], &[]));
    let from_branch = resolve_evolutions(&catalog, &record(135, "jolteon", &[], &[]));
    assert_eq!(from_root, from_branch);
}

#[test]
fn species_failure_yields_empty() {
    let catalog = MockCatalog {
        failing_species: HashSet::from([133]),
        ..eevee_family()
    };
    let evolutions = resolve_evolutions(&catalog, &record(133, "eevee", &[], &[]));
    assert!(evolutions.is_empty());
    assert_eq!(catalog.record_calls(), 0);
}

#[test]
fn missing_chain_pointer_yields_empty() {
    let catalog = MockCatalog {
        species_without_chain: HashSet::from([133]),
        ..eevee_family()
    };
    assert!(resolve_evolutions(&catalog, &record(133, "eevee", &[], &[])).is_empty());
}

#[test]
fn chain_fetch_failure_yields_empty() {
    let catalog = MockCatalog::with_total(200);
    assert!(resolve_evolutions(&catalog, &record(133, "eevee", &[], &[])).is_empty());
}

#[test]
fn image_failure_keeps_the_entry() {
    let catalog = MockCatalog {
        failing_records: HashSet::from([134]),
        ..eevee_family()
    };
    let evolutions = resolve_evolutions(&catalog, &record(133, "eevee", &[], &[]));
    assert_eq!(evolutions.len(), 4);
    assert_eq!(evolutions[1].name, "vaporeon");
    assert_eq!(evolutions[1].image, None);
    assert!(evolutions[0].image.is_some());
    assert!(evolutions[3].image.is_some());
}

#[test]
fn crashed_image_worker_keeps_the_entry() {
    let catalog = MockCatalog {
        panicking_records: HashSet::from([135]),
        ..eevee_family()
    };
    let evolutions = resolve_evolutions(&catalog, &record(133, "eevee", &[], &[]));
    let ids = evolutions.iter().map(|e| e.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![133, 134, 135, 136]);
    assert_eq!(evolutions[2].image, None);
    assert!(evolutions[3].image.is_some());
}
