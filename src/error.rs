use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum EtlError {
    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid config value: {0}")]
    InvalidConfig(String),

    #[error("catalog request failed: {0}")]
    CatalogHttp(String),

    #[error("catalog returned status {status} for {url}: {message}")]
    CatalogStatus {
        status: u16,
        url: String,
        message: String,
    },

    #[error("malformed creature payload: {0}")]
    MalformedCreature(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("no values available for column {0}")]
    EmptyColumn(&'static str),

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl EtlError {
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            EtlError::CatalogHttp(_) | EtlError::CatalogStatus { .. }
        )
    }
}
