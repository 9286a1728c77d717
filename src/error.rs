use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DexError {
    #[error("catalog request failed: {0}")]
    CatalogHttp(String),

    #[error("failed to fetch {resource}: status {status} {message}")]
    CatalogStatus {
        resource: String,
        status: u16,
        message: String,
    },

    #[error("failed to decode {resource}: {message}")]
    CatalogDecode { resource: String, message: String },

    #[error("invalid resource reference: {0}")]
    InvalidReference(String),

    #[error("species {0} has no evolution chain")]
    MissingEvolutionChain(u32),

    #[error("record not found: {0}")]
    #[diagnostic(help("use a national dex number (e.g. 25) or a lowercase name (e.g. pikachu)"))]
    RecordNotFound(String),

    #[error("invalid search query: {0}")]
    InvalidQuery(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid config value: {0}")]
    InvalidConfig(String),

    #[error("background worker failed: {0}")]
    Worker(String),
}

impl DexError {
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            DexError::CatalogHttp(_)
                | DexError::CatalogStatus { .. }
                | DexError::CatalogDecode { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DexError::CatalogStatus { status: 404, .. } | DexError::RecordNotFound(_)
        )
    }
}
