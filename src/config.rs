use std::fs;
use std::time::Duration;

use camino::Utf8PathBuf;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::DEFAULT_BASE_URL;
use crate::debounce::DEFAULT_DEBOUNCE;
use crate::error::DexError;
use crate::list::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::scroll::{
    DEFAULT_LOOKAHEAD, DEFAULT_MAX_LOADED_DURING_SEARCH, DEFAULT_MAX_SEARCH_RESULTS, ScrollPolicy,
};

pub const CONFIG_FILE: &str = "pokedex.json";
pub const BASE_URL_ENV: &str = "POKEDEX_BASE_URL";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub search_debounce_ms: Option<u64>,
    #[serde(default)]
    pub max_search_results: Option<usize>,
    #[serde(default)]
    pub max_loaded_during_search: Option<usize>,
    #[serde(default)]
    pub sentinel_lookahead: Option<u16>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub page_size: usize,
    pub search_debounce: Duration,
    pub scroll: ScrollPolicy,
    pub timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: DEFAULT_DEBOUNCE,
            scroll: ScrollPolicy::default(),
            timeout: None,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<Settings, DexError> {
        let config = match path {
            Some(path) => Self::read(Utf8PathBuf::from(path))?,
            None => match Self::default_path() {
                Some(path) => Self::read(path)?,
                None => Config::default(),
            },
        };
        let env_base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());
        Self::resolve_config(config, env_base_url)
    }

    pub fn resolve_config(
        config: Config,
        env_base_url: Option<String>,
    ) -> Result<Settings, DexError> {
        let defaults = Settings::default();

        let base_url = env_base_url
            .or(config.base_url)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(DexError::InvalidConfig(format!(
                "base_url must be an http(s) URL: {base_url}"
            )));
        }

        let page_size = config.page_size.unwrap_or(defaults.page_size);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(DexError::InvalidConfig(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(Settings {
            base_url,
            page_size,
            search_debounce: config
                .search_debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.search_debounce),
            scroll: ScrollPolicy {
                lookahead: config.sentinel_lookahead.unwrap_or(DEFAULT_LOOKAHEAD),
                max_search_results: config
                    .max_search_results
                    .unwrap_or(DEFAULT_MAX_SEARCH_RESULTS),
                max_loaded_during_search: config
                    .max_loaded_during_search
                    .unwrap_or(DEFAULT_MAX_LOADED_DURING_SEARCH),
            },
            timeout: config
                .timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        })
    }

    fn read(path: Utf8PathBuf) -> Result<Config, DexError> {
        debug!(path = %path, "reading config");
        let content =
            fs::read_to_string(&path).map_err(|_| DexError::ConfigRead(path.clone()))?;
        serde_json::from_str(&content).map_err(|err| DexError::ConfigParse(err.to_string()))
    }

    fn default_path() -> Option<Utf8PathBuf> {
        let local = Utf8PathBuf::from(CONFIG_FILE);
        if local.as_std_path().exists() {
            return Some(local);
        }
        BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("pokedex-viewer").join(CONFIG_FILE))
            .and_then(|path| Utf8PathBuf::from_path_buf(path).ok())
            .filter(|path| path.as_std_path().exists())
    }
}
