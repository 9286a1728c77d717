#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender};

use pokedex_viewer::catalog::CatalogClient;
use pokedex_viewer::domain::{
    BaseStat, CatalogPage, ChainLink, ImageSet, NamedReference, Record, Species, extract_id,
};
use pokedex_viewer::error::DexError;

pub fn record(id: u32, name: &str, types: &[&str], abilities: &[&str]) -> Record {
    Record {
        id,
        name: name.to_string(),
        types: types.iter().map(|kind| kind.to_string()).collect(),
        abilities: abilities.iter().map(|ability| ability.to_string()).collect(),
        height: 7,
        weight: 69,
        stats: vec![BaseStat {
            name: "hp".to_string(),
            value: 45,
        }],
        images: ImageSet {
            default: Some(format!("mock://sprites/{id}.png")),
            animated: None,
            artwork: None,
        },
    }
}

pub fn species_ref(id: u32, name: &str) -> NamedReference {
    NamedReference {
        name: name.to_string(),
        url: format!("mock://pokemon-species/{id}/"),
    }
}

pub fn link(id: u32, name: &str, children: Vec<ChainLink>) -> ChainLink {
    ChainLink {
        species: species_ref(id, name),
        evolves_to: children,
    }
}

fn not_found(resource: &str) -> DexError {
    DexError::CatalogStatus {
        resource: resource.to_string(),
        status: 404,
        message: "Not Found".to_string(),
    }
}

/// In-memory catalog of `total` records with ids 1..=total.
#[derive(Default)]
pub struct MockCatalog {
    pub total: u32,
    /// Report a next page even past the end, so the empty page is observed.
    pub always_next: bool,
    /// Start every page after the first one record early.
    pub overlap: bool,
    pub records: HashMap<u32, Record>,
    pub chains: HashMap<u32, ChainLink>,
    pub species_without_chain: HashSet<u32>,
    pub failing_species: HashSet<u32>,
    pub failing_records: HashSet<u32>,
    pub panicking_records: HashSet<u32>,
    pub failing_offsets: Mutex<HashSet<usize>>,
    pub page_calls: Mutex<Vec<(usize, usize)>>,
    pub record_calls: AtomicUsize,
    pub gate: Mutex<Option<(Sender<()>, Receiver<()>)>>,
}

impl MockCatalog {
    pub fn with_total(total: u32) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// The next page fetch signals `entered` and then blocks until `release`
    /// receives a message.
    pub fn gate_next_page(&self, entered: Sender<()>, release: Receiver<()>) {
        *self.gate.lock().unwrap() = Some((entered, release));
    }

    pub fn page_calls(&self) -> Vec<(usize, usize)> {
        self.page_calls.lock().unwrap().clone()
    }

    pub fn record_calls(&self) -> usize {
        self.record_calls.load(Ordering::SeqCst)
    }

    fn record_for(&self, id: u32) -> Record {
        self.records
            .get(&id)
            .cloned()
            .unwrap_or_else(|| record(id, &format!("mon-{id}"), &["normal"], &["run-away"]))
    }
}

impl CatalogClient for MockCatalog {
    fn fetch_page(&self, limit: usize, offset: usize) -> Result<CatalogPage, DexError> {
        self.page_calls.lock().unwrap().push((limit, offset));
        let gate = self.gate.lock().unwrap().take();
        if let Some((entered, release)) = gate {
            entered.send(()).unwrap();
            release.recv().unwrap();
        }
        if self.failing_offsets.lock().unwrap().contains(&offset) {
            return Err(DexError::CatalogHttp("connection reset".to_string()));
        }

        let total = self.total as usize;
        let start = if self.overlap && offset > 0 {
            offset - 1
        } else {
            offset
        };
        let end = (offset + limit).min(total);
        let items = (start.min(end)..end)
            .map(|index| {
                let id = index as u32 + 1;
                NamedReference {
                    name: self.record_for(id).name,
                    url: format!("mock://pokemon/{id}/"),
                }
            })
            .collect();
        let next = (self.always_next || offset + limit < total)
            .then(|| format!("mock://pokemon?offset={}&limit={limit}", offset + limit));
        Ok(CatalogPage {
            items,
            next,
            count: self.total,
        })
    }

    fn fetch_record(&self, reference: &str) -> Result<Record, DexError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        let id = extract_id(reference)?;
        if self.panicking_records.contains(&id) {
            panic!("record {id} worker crashed");
        }
        if id > self.total || self.failing_records.contains(&id) {
            return Err(not_found("Pokemon details"));
        }
        Ok(self.record_for(id))
    }

    fn fetch_species(&self, id: u32) -> Result<Species, DexError> {
        if self.failing_species.contains(&id) {
            return Err(DexError::CatalogHttp("timed out".to_string()));
        }
        let evolution_chain = (!self.species_without_chain.contains(&id))
            .then(|| format!("mock://evolution-chain/{id}/"));
        Ok(Species {
            id,
            evolution_chain,
        })
    }

    fn fetch_evolution_chain(&self, reference: &str) -> Result<ChainLink, DexError> {
        let id = extract_id(reference)?;
        self.chains
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("evolution chain"))
    }

    fn record_reference(&self, key: &str) -> String {
        format!("mock://pokemon/{key}/")
    }
}
