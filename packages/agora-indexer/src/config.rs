//! Indexer configuration.
//!
//! Process-wide values (tabulator identity, configured sorts, read
//! bound) are built once at startup and passed by handle to every
//! component that needs them; no ambient global lookup.

use std::time::Duration;

use crate::error::{IndexerError, Result};
use crate::sorts::SortKind;

/// Environment variable naming this instance's tabulator identity.
pub const TABULATOR_ENV: &str = "AGORA_TABULATOR";
/// Environment variable overriding the store read bound, in ms.
pub const READ_TIMEOUT_ENV: &str = "AGORA_READ_TIMEOUT_MS";

#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Identity authoritative for computing this instance's listings.
    /// Read-only after startup.
    pub tabulator: String,
    /// Sort algorithms scored for every indexed item.
    pub sorts: Vec<SortKind>,
    /// Bound on individual store reads.
    pub read_timeout: Duration,
}

impl IndexerConfig {
    pub fn new(tabulator: impl Into<String>) -> Result<Self> {
        let tabulator = tabulator.into();
        validate_tabulator(&tabulator)?;

        Ok(Self {
            tabulator,
            sorts: SortKind::all().to_vec(),
            read_timeout: agora_graph::DEFAULT_READ_TIMEOUT,
        })
    }

    pub fn with_sorts(mut self, sorts: Vec<SortKind>) -> Self {
        self.sorts = sorts;
        self
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let tabulator = std::env::var(TABULATOR_ENV)
            .map_err(|_| IndexerError::config(format!("{} is not set", TABULATOR_ENV)))?;
        let mut config = Self::new(tabulator)?;

        if let Ok(raw) = std::env::var(READ_TIMEOUT_ENV) {
            let ms: u64 = raw.parse().map_err(|_| {
                IndexerError::config(format!("invalid {}: {}", READ_TIMEOUT_ENV, raw))
            })?;
            config.read_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

/// Tabulator identities embed into soul derivation; keeping them free of
/// the separator characters keeps that derivation injective.
fn validate_tabulator(tabulator: &str) -> Result<()> {
    if tabulator.is_empty() {
        return Err(IndexerError::config("tabulator identity must not be empty"));
    }
    if tabulator.contains('/') || tabulator.contains(':') {
        return Err(IndexerError::config(format!(
            "tabulator identity must not contain '/' or ':': {}",
            tabulator
        )));
    }
    Ok(())
}
