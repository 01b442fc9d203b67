//! The cache-and-group pipeline behind every invocation.

use crate::group::build_snapshot;
use crate::store::CacheStore;
use chrono::Utc;
use satinv_client::HostSource;
use satinv_core::{CacheRecord, Error, HostVars, InventorySnapshot, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Serves grouped inventory views, consulting the on-disk cache before the
/// fetcher.
///
/// The source is injected as a [`HostSource`] so the whole flow is testable
/// without network access.
pub struct InventoryService<S> {
    source: S,
    store: CacheStore,
    max_age: Duration,
}

impl<S: HostSource> InventoryService<S> {
    /// Wire a host source to a cache location and freshness threshold
    pub fn new(source: S, cache_path: PathBuf, max_age: Duration) -> Self {
        Self {
            source,
            store: CacheStore::new(cache_path),
            max_age,
        }
    }

    /// The grouped inventory, from cache when fresh, otherwise refetched.
    ///
    /// On a fetch failure with a usable cached snapshot on disk the stale
    /// snapshot is served with a warning instead of failing the invocation;
    /// with no cache at all the fetch error propagates.
    pub async fn get_inventory(&self, force_refresh: bool) -> Result<InventorySnapshot> {
        let cached = self.load_cached();

        if !force_refresh {
            if let Some(record) = &cached {
                if record.is_fresh(self.max_age, Utc::now()) {
                    debug!(path = %self.store.path().display(), "serving fresh cached snapshot");
                    return Ok(record.snapshot.clone());
                }
            }
        }

        match self.source.fetch_hosts().await {
            Ok(hosts) => {
                let record = CacheRecord::new(build_snapshot(&hosts));
                self.store.store(&record)?;
                debug!(hosts = hosts.len(), "refreshed inventory cache");
                Ok(record.snapshot)
            }
            Err(fetch_error) => match cached {
                Some(record) => {
                    warn!(
                        %fetch_error,
                        cached_at = %record.created_at,
                        "fetch failed, serving stale cached snapshot"
                    );
                    Ok(record.snapshot)
                }
                None => Err(fetch_error),
            },
        }
    }

    /// Variables for one host, as served under `_meta`.
    ///
    /// An unknown host triggers one forced refresh before reporting an empty
    /// object, since it may have registered after the cache was written.
    pub async fn host_vars(&self, name: &str, force_refresh: bool) -> Result<HostVars> {
        let snapshot = self.get_inventory(force_refresh).await?;
        if let Some(vars) = snapshot.host_vars(name) {
            return Ok(vars.clone());
        }

        if !force_refresh {
            debug!(host = name, "host not in snapshot, refreshing once");
            let refreshed = self.get_inventory(true).await?;
            if let Some(vars) = refreshed.host_vars(name) {
                return Ok(vars.clone());
            }
        }

        Ok(HostVars::new())
    }

    /// A corrupt cache file is a miss, not a failure
    fn load_cached(&self) -> Option<CacheRecord> {
        match self.store.load() {
            Ok(record) => record,
            Err(error @ Error::CacheCorrupt { .. }) => {
                warn!(%error, "ignoring unreadable cache file");
                None
            }
            Err(error) => {
                warn!(%error, "failed to load cache file");
                None
            }
        }
    }
}
