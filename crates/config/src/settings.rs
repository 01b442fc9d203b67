//! The immutable settings struct and its validation.

use satinv_core::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Authentication material for the management API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Username/password pair sent as HTTP basic auth
    Basic { username: String, password: String },
    /// Personal access token sent as a bearer authorization header
    Token(String),
}

/// Validated configuration, immutable after construction.
///
/// Single source of truth for endpoint, credentials and cache policy.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base address of the management API, e.g. `https://satellite.example.com`
    pub url: Url,
    /// Authentication material
    pub credentials: Credentials,
    /// Optional organization the host query is scoped to
    pub organization: Option<String>,
    /// Location of the on-disk inventory cache
    pub cache_path: PathBuf,
    /// Maximum age before a cached snapshot counts as stale
    pub cache_max_age: Duration,
}

/// On-disk shape of the settings file, before validation
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawSettings {
    url: String,
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
    organization: Option<String>,
    cache_path: PathBuf,
    cache_max_age: u64,
}

impl Settings {
    pub(crate) fn from_raw(raw: RawSettings) -> Result<Self> {
        let url = Url::parse(&raw.url)
            .map_err(|e| Error::configuration(format!("invalid url '{}': {e}", raw.url)))?;

        let credentials = match (raw.username, raw.password, raw.token) {
            (Some(username), Some(password), None) => Credentials::Basic { username, password },
            (None, None, Some(token)) => Credentials::Token(token),
            (None, None, None) => {
                return Err(Error::configuration(
                    "missing credentials: set username/password or token",
                ))
            }
            (Some(_), None, None) | (None, Some(_), None) => {
                return Err(Error::configuration(
                    "incomplete credentials: username and password must be set together",
                ))
            }
            _ => {
                return Err(Error::configuration(
                    "ambiguous credentials: set either username/password or token, not both",
                ))
            }
        };

        if raw.cache_max_age == 0 {
            return Err(Error::configuration("cache_max_age must be greater than zero"));
        }

        Ok(Self {
            url,
            credentials,
            organization: raw.organization,
            cache_path: raw.cache_path,
            cache_max_age: Duration::from_secs(raw.cache_max_age),
        })
    }
}
