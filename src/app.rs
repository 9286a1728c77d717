use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::catalog::CatalogClient;
use crate::config::Settings;
use crate::domain::{Evolution, Record, RecordKey};
use crate::error::DexError;
use crate::evolution::resolve_evolutions;
use crate::list::{Accumulator, LoadOutcome};
use crate::scroll::LoadContext;
use crate::search;

#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub loaded: usize,
    pub has_more: bool,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub scanned: usize,
    pub has_more: bool,
    pub matches: Vec<Record>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailResult {
    pub record: Record,
    pub evolutions: Vec<Evolution>,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct App<C: CatalogClient> {
    catalog: Arc<C>,
    settings: Settings,
}

impl<C: CatalogClient> App<C> {
    pub fn new(catalog: C, settings: Settings) -> Self {
        Self {
            catalog: Arc::new(catalog),
            settings,
        }
    }

    pub fn catalog(&self) -> Arc<C> {
        Arc::clone(&self.catalog)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn accumulator(&self) -> Accumulator<Arc<C>> {
        Accumulator::new(self.catalog(), self.settings.page_size)
    }

    pub fn list(&self, pages: usize, sink: &dyn ProgressSink) -> Result<ListResult, DexError> {
        let list = self.accumulator();
        for page in 0..pages {
            let start = Instant::now();
            let outcome = list.load_more()?;
            sink.event(ProgressEvent {
                message: format!("page={} loaded={} ({outcome:?})", page + 1, list.len()),
                elapsed: Some(start.elapsed()),
            });
            if !matches!(outcome, LoadOutcome::Loaded { .. }) || !list.has_more() {
                break;
            }
        }
        Ok(ListResult {
            loaded: list.len(),
            has_more: list.has_more(),
            records: list.records(),
        })
    }

    pub fn search(
        &self,
        query: &str,
        max_pages: Option<usize>,
        sink: &dyn ProgressSink,
    ) -> Result<SearchResult, DexError> {
        if !search::is_active(query) {
            return Err(DexError::InvalidQuery("query must not be blank".to_string()));
        }
        let list = self.accumulator();
        let policy = self.settings.scroll;
        let mut pages = 0usize;
        loop {
            let ctx = list.with_state(|state| LoadContext {
                loading: state.is_loading(),
                has_more: state.has_more(),
                query: query.to_string(),
                filtered: search::filter(state.records(), query).len(),
                loaded: state.records().len(),
            });
            let capped = max_pages.is_some_and(|max| pages >= max);
            if capped || !policy.should_load(&ctx) {
                break;
            }
            let start = Instant::now();
            let outcome = list.load_more()?;
            pages += 1;
            let (scanned, matched) = list.with_state(|state| {
                (
                    state.records().len(),
                    search::filter(state.records(), query).len(),
                )
            });
            sink.event(ProgressEvent {
                message: format!("page={pages} scanned={scanned} matches={matched}"),
                elapsed: Some(start.elapsed()),
            });
            if !matches!(outcome, LoadOutcome::Loaded { .. }) {
                break;
            }
        }

        list.with_state(|state| {
            Ok(SearchResult {
                query: query.trim().to_string(),
                scanned: state.records().len(),
                has_more: state.has_more(),
                matches: search::filter(state.records(), query)
                    .into_iter()
                    .cloned()
                    .collect(),
            })
        })
    }

    pub fn show(&self, key: &RecordKey, sink: &dyn ProgressSink) -> Result<DetailResult, DexError> {
        let reference = self.catalog.record_reference(&key.as_path_segment());
        let start = Instant::now();
        let record = self.catalog.fetch_record(&reference).map_err(|err| {
            if err.is_not_found() {
                DexError::RecordNotFound(key.to_string())
            } else {
                err
            }
        })?;
        sink.event(ProgressEvent {
            message: format!("record {} fetched", record.name),
            elapsed: Some(start.elapsed()),
        });

        let start = Instant::now();
        let evolutions = resolve_evolutions(self.catalog.as_ref(), &record);
        sink.event(ProgressEvent {
            message: format!("evolutions resolved count={}", evolutions.len()),
            elapsed: Some(start.elapsed()),
        });
        Ok(DetailResult { record, evolutions })
    }
}
