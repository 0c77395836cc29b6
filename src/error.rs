use std::time::Duration;
use thiserror::Error;

/// Errors raised while driving the browser or harvesting a single item.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("timed out after {waited:?} waiting for `{what}`")]
    Timeout { what: String, waited: Duration },

    #[error("browser session error: {0}")]
    Session(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("invalid selector `{0}`")]
    Selector(String),

    #[error("invalid url `{url}`: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to write harvest output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize harvest output: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarvestError {
    pub fn timeout(what: impl Into<String>, waited: Duration) -> Self {
        HarvestError::Timeout {
            what: what.into(),
            waited,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, HarvestError::Timeout { .. })
    }
}

/// Errors raised by the normalizer/loader stage.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("input is not a JSON array of objects: {0}")]
    Shape(String),

    #[error("malformed JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("database connection lock poisoned")]
    LockPoisoned,

    #[error("row has {values} values but the insert statement expects {placeholders}")]
    ColumnMismatch { values: usize, placeholders: usize },

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
