//! Grouping and cached snapshot serving for satellite-inventory.
//!
//! [`InventoryService`] is the single entry point: it serves a grouped
//! inventory view from a time-bounded on-disk cache and falls back to the
//! fetcher when the cache is missing, stale or forced.

mod atomic;
mod group;
mod service;
mod store;

pub use group::{build_snapshot, sanitize_group_name};
pub use service::InventoryService;
pub use store::CacheStore;
