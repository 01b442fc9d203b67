//! Management API client for satellite-inventory.
//!
//! [`HostSource`] is the seam the inventory service consumes; tests inject a
//! fake, production wires in [`SatelliteClient`], which paginates the hosts
//! endpoint with retry and backoff on transient failures.

mod retry;
mod satellite;
mod source;

pub use retry::{retry, RetryConfig};
pub use satellite::SatelliteClient;
pub use source::HostSource;
