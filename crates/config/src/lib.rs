//! Settings loading for satellite-inventory.
//!
//! All configuration is read once at startup into an immutable [`Settings`]
//! struct that is threaded explicitly into the client and the inventory
//! service, so both stay testable with injected values.

mod loader;
mod settings;

pub use loader::SettingsLoader;
pub use settings::{Credentials, Settings};
