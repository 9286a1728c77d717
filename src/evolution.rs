use std::thread;

use tracing::{debug, warn};

use crate::catalog::CatalogClient;
use crate::domain::{ChainLink, Evolution, Record};
use crate::error::DexError;

pub fn flatten_chain(root: &ChainLink) -> Result<Vec<Evolution>, DexError> {
    let mut evolutions = Vec::new();
    let mut stack = vec![root];
    while let Some(link) = stack.pop() {
        evolutions.push(Evolution {
            id: link.species.id()?,
            name: link.species.name.clone(),
            image: None,
        });
        // Reversed so the first child is popped next.
        stack.extend(link.evolves_to.iter().rev());
    }
    Ok(evolutions)
}

pub fn resolve_evolutions<C: CatalogClient + ?Sized>(client: &C, record: &Record) -> Vec<Evolution> {
    let evolutions = match resolve_lineage(client, record) {
        Ok(evolutions) => evolutions,
        Err(err) => {
            warn!(id = record.id, error = %err, "evolution chain unavailable");
            return Vec::new();
        }
    };
    attach_images(client, evolutions)
}

fn resolve_lineage<C: CatalogClient + ?Sized>(
    client: &C,
    record: &Record,
) -> Result<Vec<Evolution>, DexError> {
    let species = client.fetch_species(record.id)?;
    let reference = species
        .evolution_chain
        .ok_or(DexError::MissingEvolutionChain(species.id))?;
    let chain = client.fetch_evolution_chain(&reference)?;
    flatten_chain(&chain)
}

fn attach_images<C: CatalogClient + ?Sized>(client: &C, evolutions: Vec<Evolution>) -> Vec<Evolution> {
    thread::scope(|scope| {
        let handles = evolutions
            .into_iter()
            .map(|evolution| {
                let fallback = evolution.clone();
                let handle = scope.spawn(move || {
                    let reference = client.record_reference(&evolution.id.to_string());
                    match client.fetch_record(&reference) {
                        Ok(record) => Evolution {
                            image: record.images.default,
                            ..evolution
                        },
                        Err(err) => {
                            debug!(name = %evolution.name, error = %err, "evolution image unavailable");
                            evolution
                        }
                    }
                });
                (handle, fallback)
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|(handle, fallback)| handle.join().unwrap_or(fallback))
            .collect()
    })
}

#[derive(Debug, Default, Clone)]
pub struct EvolutionPanel {
    selected: Option<u32>,
    evolutions: Vec<Evolution>,
    loading: bool,
    cursor: usize,
}

impl EvolutionPanel {
    pub fn begin(&mut self, id: u32) {
        self.selected = Some(id);
        self.evolutions.clear();
        self.loading = true;
        self.cursor = 0;
    }

    pub fn finish(&mut self, id: u32, evolutions: Vec<Evolution>) -> bool {
        if self.selected != Some(id) {
            return false;
        }
        self.cursor = evolutions
            .iter()
            .position(|evolution| evolution.id == id)
            .unwrap_or(0);
        self.evolutions = evolutions;
        self.loading = false;
        true
    }

    pub fn reset(&mut self) {
        self.selected = None;
        self.evolutions.clear();
        self.loading = false;
        self.cursor = 0;
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    pub fn evolutions(&self) -> &[Evolution] {
        &self.evolutions
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // A lone entry is not a lineage.
    pub fn has_lineage(&self) -> bool {
        !self.loading && self.evolutions.len() > 1
    }

    pub fn cursor(&self) -> Option<&Evolution> {
        if !self.has_lineage() {
            return None;
        }
        self.evolutions.get(self.cursor)
    }

    pub fn next_entry(&mut self) {
        if self.has_lineage() {
            self.cursor = (self.cursor + 1) % self.evolutions.len();
        }
    }

    pub fn previous_entry(&mut self) {
        if self.has_lineage() {
            let len = self.evolutions.len();
            self.cursor = (self.cursor + len - 1) % len;
        }
    }
}
