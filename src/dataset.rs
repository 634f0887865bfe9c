//! Verse dataset loading
//!
//! The dataset is a JSON array of verse records read from a local file or, with
//! the `remote` feature, fetched over HTTP. Its order is significant because
//! it defines the date-to-verse mapping. Every successful load is mirrored
//! into the key-value store so a later session can still start when the
//! source is unreachable.

use std::fmt;
use std::path::PathBuf;
#[cfg(feature = "remote")]
use std::time::Duration;

use log::{debug, info, warn};
use sha2::{Digest, Sha256};

use crate::store::{KeyValueStore, DATASET_CACHE_KEY};
use crate::verse::Verse;
use crate::{AppConfig, Error, Result};

/// Ordered, non-empty sequence of verses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseDataset {
    verses: Vec<Verse>,
}

impl VerseDataset {
    /// Validate and wrap a list of verses.
    ///
    /// Fails with `DatasetError` when the list is empty or a verse carries a
    /// zero chapter or verse number.
    pub fn new(verses: Vec<Verse>) -> Result<Self> {
        if verses.is_empty() {
            return Err(Error::DatasetError("Invalid verses dataset: no verses".into()));
        }
        if let Some((i, bad)) = verses
            .iter()
            .enumerate()
            .find(|(_, v)| v.chapter == 0 || v.verse == 0)
        {
            return Err(Error::DatasetError(format!(
                "Invalid verses dataset: entry {} has chapter {} verse {}",
                i, bad.chapter, bad.verse
            )));
        }
        Ok(Self { verses })
    }

    /// Parse a JSON array of verse records
    pub fn from_json(raw: &str) -> Result<Self> {
        let verses: Vec<Verse> = serde_json::from_str(raw)
            .map_err(|e| Error::DatasetError(format!("Invalid verses dataset: {}", e)))?;
        Self::new(verses)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.verses)
            .map_err(|e| Error::DatasetError(format!("Failed to serialize verses: {}", e)))
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Verse> {
        self.verses.iter()
    }

    /// Hex SHA-256 of the canonical JSON encoding.
    ///
    /// Two datasets with the same fingerprint map every date to the same verse.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for v in &self.verses {
            // Field order is fixed by the struct, so this is stable across loads.
            if let Ok(line) = serde_json::to_string(v) {
                hasher.update(line.as_bytes());
            }
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

/// Where the verse dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerseSource {
    /// A JSON file on disk
    File(PathBuf),
    /// An `http(s)` resource
    #[cfg(feature = "remote")]
    Url(url::Url),
}

impl VerseSource {
    /// Interpret `value` as a URL when it has an http(s) scheme, otherwise as a path
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::ConfigError("dataset source is empty".into()));
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            #[cfg(feature = "remote")]
            {
                let url = url::Url::parse(trimmed).map_err(|e| {
                    Error::ConfigError(format!("invalid dataset URL '{}': {}", trimmed, e))
                })?;
                return Ok(VerseSource::Url(url));
            }
            #[cfg(not(feature = "remote"))]
            {
                return Err(Error::ConfigError(format!(
                    "'{}' needs the `remote` feature",
                    trimmed
                )));
            }
        }
        Ok(VerseSource::File(PathBuf::from(trimmed)))
    }
}

impl Default for VerseSource {
    fn default() -> Self {
        VerseSource::File(PathBuf::from("data/verses.json"))
    }
}

impl fmt::Display for VerseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerseSource::File(path) => write!(f, "{}", path.display()),
            #[cfg(feature = "remote")]
            VerseSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Loads the dataset from its source, falling back to the cached copy
pub struct DatasetLoader {
    source: VerseSource,
    #[cfg_attr(not(feature = "remote"), allow(dead_code))]
    timeout_ms: u64,
    #[cfg_attr(not(feature = "remote"), allow(dead_code))]
    user_agent: String,
}

impl DatasetLoader {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            source: config.dataset.clone(),
            timeout_ms: config.timeout_ms,
            user_agent: config.user_agent.clone(),
        }
    }

    pub fn source(&self) -> &VerseSource {
        &self.source
    }

    /// Read and validate the dataset straight from the source
    pub async fn fetch(&self) -> Result<VerseDataset> {
        let raw = match &self.source {
            VerseSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                Error::DatasetError(format!("Failed to read {}: {}", path.display(), e))
            })?,
            #[cfg(feature = "remote")]
            VerseSource::Url(url) => self.fetch_remote(url).await?,
        };
        VerseDataset::from_json(&raw)
    }

    #[cfg(feature = "remote")]
    async fn fetch_remote(&self, url: &url::Url) -> Result<String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let res = client.get(url.clone()).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::DatasetError(format!(
                "Failed to load verses ({})",
                status.as_u16()
            )));
        }
        Ok(res.text().await?)
    }

    /// Fetch from the source and refresh the cache; use the cache when the
    /// source fails. Only fails when neither yields a valid dataset.
    pub async fn load(&self, store: &dyn KeyValueStore) -> Result<VerseDataset> {
        match self.fetch().await {
            Ok(dataset) => {
                info!(
                    "Loaded {} verses from {} ({})",
                    dataset.len(),
                    self.source,
                    &dataset.fingerprint()[..12]
                );
                match dataset.to_json() {
                    Ok(json) => {
                        if let Err(e) = store.set(DATASET_CACHE_KEY, &json) {
                            warn!("Failed to cache verse dataset: {}", e);
                        }
                    }
                    Err(e) => warn!("Failed to cache verse dataset: {}", e),
                }
                Ok(dataset)
            }
            Err(err) => {
                warn!("Verse source {} unavailable: {}", self.source, err);
                match load_cached(store) {
                    Some(dataset) => {
                        info!("Using cached dataset of {} verses", dataset.len());
                        Ok(dataset)
                    }
                    None => Err(Error::DatasetError(format!(
                        "{} and no cached copy is available",
                        err
                    ))),
                }
            }
        }
    }
}

fn load_cached(store: &dyn KeyValueStore) -> Option<VerseDataset> {
    let raw = match store.get(DATASET_CACHE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            debug!("Dataset cache unreadable: {}", e);
            return None;
        }
    };
    match VerseDataset::from_json(&raw) {
        Ok(dataset) => Some(dataset),
        Err(e) => {
            debug!("Dataset cache is malformed: {}", e);
            None
        }
    }
}
