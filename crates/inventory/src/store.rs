//! On-disk persistence for cache records.

use crate::atomic::write_atomic;
use satinv_core::{CacheRecord, Error, Result};
use std::path::{Path, PathBuf};

/// Reads and writes the single cache file holding the last snapshot.
///
/// The file format is the stdout contract format wrapped with its creation
/// timestamp, so a cache file is inspectable with ordinary JSON tooling.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Create a store for the configured cache path
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the cache file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted record, if any.
    ///
    /// A missing file is `Ok(None)`; a file that exists but cannot be read
    /// or parsed is `Error::CacheCorrupt`, which callers downgrade to a
    /// cache miss.
    pub fn load(&self) -> Result<Option<CacheRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::cache_corrupt(&self.path, e.to_string())),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| Error::cache_corrupt(&self.path, e.to_string()))
    }

    /// Persist a record with atomic replacement
    pub fn store(&self, record: &CacheRecord) -> Result<()> {
        let content = serde_json::to_vec_pretty(record)?;
        write_atomic(&self.path, &content)
    }
}
