use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{
    CatalogPage, ChainLink, ChainResponseWire, PageWire, Record, RecordWire, Species, SpeciesWire,
};
use crate::error::DexError;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

pub trait CatalogClient: Send + Sync {
    fn fetch_page(&self, limit: usize, offset: usize) -> Result<CatalogPage, DexError>;
    fn fetch_record(&self, reference: &str) -> Result<Record, DexError>;
    fn fetch_species(&self, id: u32) -> Result<Species, DexError>;
    fn fetch_evolution_chain(&self, reference: &str) -> Result<ChainLink, DexError>;
    fn record_reference(&self, key: &str) -> String;
}

impl<T: CatalogClient + ?Sized> CatalogClient for Arc<T> {
    fn fetch_page(&self, limit: usize, offset: usize) -> Result<CatalogPage, DexError> {
        (**self).fetch_page(limit, offset)
    }

    fn fetch_record(&self, reference: &str) -> Result<Record, DexError> {
        (**self).fetch_record(reference)
    }

    fn fetch_species(&self, id: u32) -> Result<Species, DexError> {
        (**self).fetch_species(id)
    }

    fn fetch_evolution_chain(&self, reference: &str) -> Result<ChainLink, DexError> {
        (**self).fetch_evolution_chain(reference)
    }

    fn record_reference(&self, key: &str) -> String {
        (**self).record_reference(key)
    }
}

#[derive(Clone)]
pub struct CatalogHttpClient {
    client: Client,
    base_url: String,
}

impl CatalogHttpClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, DexError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("pokedex-viewer/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| DexError::CatalogHttp(err.to_string()))?,
        );
        // reqwest's blocking client defaults to a 30s timeout; None disables it.
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| DexError::CatalogHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, resource: &str) -> Result<T, DexError> {
        debug!(url, resource, "catalog request");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| DexError::CatalogHttp(err.to_string()))?;
        let response = Self::handle_status(response, resource)?;
        response.json::<T>().map_err(|err| DexError::CatalogDecode {
            resource: resource.to_string(),
            message: err.to_string(),
        })
    }

    fn handle_status(
        response: reqwest::blocking::Response,
        resource: &str,
    ) -> Result<reqwest::blocking::Response, DexError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        Err(DexError::CatalogStatus {
            resource: resource.to_string(),
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("unknown").to_string(),
        })
    }
}

impl CatalogClient for CatalogHttpClient {
    fn fetch_page(&self, limit: usize, offset: usize) -> Result<CatalogPage, DexError> {
        let url = format!(
            "{}/pokemon?limit={limit}&offset={offset}",
            self.base_url
        );
        let page: PageWire = self.get_json(&url, "Pokemon list")?;
        Ok(page.into())
    }

    fn fetch_record(&self, reference: &str) -> Result<Record, DexError> {
        let record: RecordWire = self.get_json(reference, "Pokemon details")?;
        Ok(record.into())
    }

    fn fetch_species(&self, id: u32) -> Result<Species, DexError> {
        let url = format!("{}/pokemon-species/{id}", self.base_url);
        let species: SpeciesWire = self.get_json(&url, "Pokemon species")?;
        Ok(species.into())
    }

    fn fetch_evolution_chain(&self, reference: &str) -> Result<ChainLink, DexError> {
        let chain: ChainResponseWire = self.get_json(reference, "evolution chain")?;
        Ok(chain.chain.into())
    }

    fn record_reference(&self, key: &str) -> String {
        format!("{}/pokemon/{key}", self.base_url)
    }
}

#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub records: Vec<Record>,
    pub has_next: bool,
}

// One failed member fails the page; members come back in listing order.
pub fn fetch_page_records<C: CatalogClient + ?Sized>(
    client: &C,
    limit: usize,
    offset: usize,
) -> Result<LoadedPage, DexError> {
    let page = client.fetch_page(limit, offset)?;
    if page.items.is_empty() {
        return Ok(LoadedPage {
            records: Vec::new(),
            has_next: false,
        });
    }

    let has_next = page.has_next();
    let records = fetch_all(client, page.items.iter().map(|item| item.url.as_str()))?;
    debug!(offset, count = records.len(), has_next, "page members fetched");
    Ok(LoadedPage { records, has_next })
}

fn fetch_all<'a, C, I>(client: &C, references: I) -> Result<Vec<Record>, DexError>
where
    C: CatalogClient + ?Sized,
    I: Iterator<Item = &'a str>,
{
    thread::scope(|scope| {
        let handles = references
            .map(|reference| scope.spawn(move || client.fetch_record(reference)))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| DexError::Worker("record fetch panicked".to_string()))?
            })
            .collect()
    })
}
