use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogClient, LoadedPage, fetch_page_records};
use crate::domain::Record;
use crate::error::DexError;

pub const DEFAULT_PAGE_SIZE: usize = 20;
// Each page member is fetched on its own thread.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListPhase {
    Idle,
    LoadingInitial,
    Ready,
    LoadingMore,
    Resetting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { added: usize },
    Exhausted,
    Skipped,
}

#[derive(Debug, Clone)]
pub struct ListState {
    records: Vec<Record>,
    ids: HashSet<u32>,
    has_more: bool,
    in_flight: bool,
    phase: ListPhase,
    error: Option<String>,
    generation: u64,
}

impl ListState {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            ids: HashSet::new(),
            has_more: true,
            in_flight: false,
            phase: ListPhase::Idle,
            error: None,
            generation: 0,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn version(&self) -> u64 {
        (self.generation << 32) | self.records.len() as u64
    }

    fn append(&mut self, page: Vec<Record>) -> usize {
        let mut added = 0;
        for record in page {
            if self.ids.insert(record.id) {
                self.records.push(record);
                added += 1;
            } else {
                warn!(id = record.id, "duplicate record in page, skipped");
            }
        }
        added
    }
}

// The next offset is the accumulated length; the in-flight flag is set under the lock.
pub struct Accumulator<C: CatalogClient> {
    client: C,
    page_size: usize,
    state: Mutex<ListState>,
}

impl<C: CatalogClient> Accumulator<C> {
    pub fn new(client: C, page_size: usize) -> Self {
        Self {
            client,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            state: Mutex::new(ListState::new()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn load_more(&self) -> Result<LoadOutcome, DexError> {
        let (offset, generation) = {
            let mut state = self.lock();
            if state.in_flight || !state.has_more {
                return Ok(LoadOutcome::Skipped);
            }
            state.in_flight = true;
            state.error = None;
            state.phase = if state.records.is_empty() {
                ListPhase::LoadingInitial
            } else {
                ListPhase::LoadingMore
            };
            (state.records.len(), state.generation)
        };

        debug!(offset, limit = self.page_size, "loading page");
        let result = fetch_page_records(&self.client, self.page_size, offset);
        self.apply(generation, offset, result)
    }

    pub fn reset(&self) -> Result<LoadOutcome, DexError> {
        {
            let mut state = self.lock();
            state.phase = ListPhase::Resetting;
            state.records.clear();
            state.ids.clear();
            state.has_more = true;
            state.in_flight = false;
            state.error = None;
            state.generation = state.generation.wrapping_add(1);
        }
        info!("list reset");
        self.load_more()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight
    }

    pub fn phase(&self) -> ListPhase {
        self.lock().phase
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn records(&self) -> Vec<Record> {
        self.lock().records.clone()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&ListState) -> R) -> R {
        f(&self.lock())
    }

    fn apply(
        &self,
        generation: u64,
        offset: usize,
        result: Result<LoadedPage, DexError>,
    ) -> Result<LoadOutcome, DexError> {
        let mut state = self.lock();
        if state.generation != generation {
            debug!(offset, "discarding page loaded before reset");
            return Ok(LoadOutcome::Skipped);
        }
        state.in_flight = false;
        state.phase = ListPhase::Ready;

        match result {
            Ok(page) if page.records.is_empty() => {
                state.has_more = false;
                info!(offset, total = state.records.len(), "catalog exhausted");
                Ok(LoadOutcome::Exhausted)
            }
            Ok(page) => {
                let added = state.append(page.records);
                state.has_more = page.has_next;
                info!(
                    offset,
                    added,
                    total = state.records.len(),
                    has_more = state.has_more,
                    "page applied"
                );
                Ok(LoadOutcome::Loaded { added })
            }
            Err(err) => {
                warn!(offset, error = %err, "page load failed");
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        // Records are never left half-appended, so a poisoned lock is usable.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
