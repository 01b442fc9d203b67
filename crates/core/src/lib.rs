//! Core types and errors shared across the satellite-inventory crates.

pub mod constants;
pub mod errors;
pub mod types;

pub use errors::{Error, Result};
pub use types::{CacheRecord, Host, HostVars, InventorySnapshot};
