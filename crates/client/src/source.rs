use async_trait::async_trait;
use satinv_core::{Host, Result};

/// Capability to produce the current list of hosts.
///
/// The inventory service only depends on this trait, so tests can substitute
/// an in-memory implementation without network access.
#[async_trait]
pub trait HostSource: Send + Sync {
    /// Fetch the authoritative, current host list from the backing system
    async fn fetch_hosts(&self) -> Result<Vec<Host>>;
}
