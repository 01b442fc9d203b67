//! Client for the Satellite/Foreman v2 API.

use crate::retry::{retry, unavailable, RetryConfig};
use crate::source::HostSource;
use async_trait::async_trait;
use satinv_config::{Credentials, Settings};
use satinv_core::constants::DEFAULT_PER_PAGE;
use satinv_core::{Error, Host, HostVars, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Fetcher implementation backed by the Satellite/Foreman v2 API.
///
/// Authenticates per request, paginates `/api/v2/hosts` until the reported
/// total is consumed, and optionally scopes the query to one organization.
pub struct SatelliteClient {
    http: reqwest::Client,
    base: Url,
    credentials: Credentials,
    organization: Option<String>,
    per_page: u32,
    retry: RetryConfig,
}

/// Envelope shared by the v2 collection endpoints
#[derive(Debug, Deserialize)]
struct Paged<T> {
    total: u64,
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct HostRecord {
    name: String,
    #[serde(default)]
    hostgroup_name: Option<String>,
    #[serde(default)]
    hostgroup_title: Option<String>,
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct OrganizationRecord {
    id: u64,
    name: String,
}

impl HostRecord {
    fn into_host(self) -> Host {
        // Nested hostgroups report both the leaf name and the full title
        // ("app/web"); the host is a member of each distinct spelling.
        let mut hostgroups = Vec::new();
        if let Some(name) = self.hostgroup_name.filter(|n| !n.is_empty()) {
            hostgroups.push(name);
        }
        if let Some(title) = self.hostgroup_title.filter(|t| !t.is_empty()) {
            if !hostgroups.contains(&title) {
                hostgroups.push(title);
            }
        }

        let mut vars = HostVars::new();
        if let Some(ip) = self.ip {
            vars.insert("ip".to_string(), serde_json::Value::String(ip));
        }
        if let Some(enabled) = self.enabled {
            vars.insert("enabled".to_string(), serde_json::Value::Bool(enabled));
        }

        Host::new(self.name, hostgroups).with_vars(vars)
    }
}

impl SatelliteClient {
    /// Build a client from validated settings
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::configuration(format!("cannot build HTTP client: {e}")))?;

        // A trailing slash keeps joins relative to the full configured path;
        // without it, a deployment under a subpath ("https://host/foreman")
        // would lose that segment.
        let mut base = settings.url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        Ok(Self {
            http,
            base,
            credentials: settings.credentials.clone(),
            organization: settings.organization.clone(),
            per_page: DEFAULT_PER_PAGE,
            retry: RetryConfig::default(),
        })
    }

    /// Override the retry policy (smaller delays in tests)
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Override the page size used against the hosts endpoint
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::configuration(format!("invalid API path '{path}': {e}")))
    }

    /// One authenticated GET, with status codes mapped onto error kinds
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let request = match &self.credentials {
            Credentials::Basic { username, password } => {
                self.http.get(url.clone()).basic_auth(username, Some(password))
            }
            Credentials::Token(token) => self.http.get(url.clone()).bearer_auth(token),
        };

        let response = request.send().await.map_err(|e| unavailable(&url, e))?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::authentication(
                url.as_str(),
                format!("server returned {status}"),
            ));
        }
        if status.is_server_error() {
            return Err(unavailable(&url, format!("server returned {status}")));
        }
        if !status.is_success() {
            return Err(Error::api_response(
                url.as_str(),
                format!("server returned {status}"),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::api_response(url.as_str(), format!("invalid JSON body: {e}")))
    }

    async fn get_with_retry<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        retry(&self.retry, || self.get::<T>(url.clone())).await
    }

    /// Resolve an organization name to its id, failing if it does not exist.
    ///
    /// The search is paginated like the hosts query; a match past the first
    /// page still counts.
    async fn resolve_organization(&self, name: &str) -> Result<u64> {
        let mut seen = 0u64;
        let mut page = 1u32;
        loop {
            let mut url = self.endpoint("api/v2/organizations")?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("search", name);
                query.append_pair("page", &page.to_string());
                query.append_pair("per_page", &self.per_page.to_string());
            }

            let paged: Paged<OrganizationRecord> = self.get_with_retry(url).await?;
            if let Some(org) = paged.results.iter().find(|org| org.name == name) {
                return Ok(org.id);
            }

            seen += paged.results.len() as u64;
            if paged.results.is_empty() || seen >= paged.total {
                return Err(Error::configuration(format!(
                    "organization '{name}' not found"
                )));
            }
            page += 1;
        }
    }

    fn hosts_url(&self, page: u32, organization_id: Option<u64>) -> Result<Url> {
        let mut url = self.endpoint("api/v2/hosts")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            query.append_pair("per_page", &self.per_page.to_string());
            if let Some(id) = organization_id {
                query.append_pair("organization_id", &id.to_string());
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl HostSource for SatelliteClient {
    async fn fetch_hosts(&self) -> Result<Vec<Host>> {
        let organization_id = match &self.organization {
            Some(name) => Some(self.resolve_organization(name).await?),
            None => None,
        };

        let mut hosts: Vec<Host> = Vec::new();
        let mut page = 1u32;
        loop {
            let url = self.hosts_url(page, organization_id)?;
            let paged: Paged<HostRecord> = self.get_with_retry(url).await?;

            if paged.results.is_empty() {
                break;
            }
            hosts.extend(paged.results.into_iter().map(HostRecord::into_host));

            if hosts.len() as u64 >= paged.total {
                break;
            }
            page += 1;
        }

        debug!(count = hosts.len(), "fetched hosts from management API");
        Ok(hosts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn settings_with_url(url: &str) -> Settings {
        Settings {
            url: Url::parse(url).unwrap(),
            credentials: Credentials::Token("abcdef".to_string()),
            organization: None,
            cache_path: PathBuf::from("/unused"),
            cache_max_age: Duration::from_secs(60),
        }
    }

    #[test]
    fn base_url_subpath_is_preserved_in_endpoints() {
        let client = SatelliteClient::new(&settings_with_url("https://sat.example.com/foreman"))
            .unwrap();
        let url = client.hosts_url(1, None).unwrap();
        assert_eq!(url.path(), "/foreman/api/v2/hosts");
    }

    #[test]
    fn base_url_trailing_slash_is_equivalent() {
        let client = SatelliteClient::new(&settings_with_url("https://sat.example.com/foreman/"))
            .unwrap();
        let url = client.hosts_url(1, None).unwrap();
        assert_eq!(url.path(), "/foreman/api/v2/hosts");
    }

    #[test]
    fn bare_host_base_url_keeps_the_root_path() {
        let client =
            SatelliteClient::new(&settings_with_url("https://sat.example.com")).unwrap();
        let url = client.hosts_url(1, None).unwrap();
        assert_eq!(url.path(), "/api/v2/hosts");
    }

    #[test]
    fn host_record_maps_groups_and_vars() {
        let record = HostRecord {
            name: "web01.example.com".to_string(),
            hostgroup_name: Some("web".to_string()),
            hostgroup_title: Some("app/web".to_string()),
            ip: Some("10.0.0.5".to_string()),
            enabled: Some(true),
        };

        let host = record.into_host();
        assert_eq!(host.name, "web01.example.com");
        assert_eq!(host.hostgroups, vec!["web".to_string(), "app/web".to_string()]);
        assert_eq!(host.vars["ip"], "10.0.0.5");
        assert_eq!(host.vars["enabled"], true);
    }

    #[test]
    fn host_record_without_hostgroup_is_ungrouped() {
        let record = HostRecord {
            name: "lonely.example.com".to_string(),
            hostgroup_name: None,
            hostgroup_title: None,
            ip: None,
            enabled: None,
        };

        let host = record.into_host();
        assert!(host.hostgroups.is_empty());
        assert!(host.vars.is_empty());
    }

    #[test]
    fn identical_name_and_title_collapse_to_one_group() {
        let record = HostRecord {
            name: "db01.example.com".to_string(),
            hostgroup_name: Some("db".to_string()),
            hostgroup_title: Some("db".to_string()),
            ip: None,
            enabled: None,
        };

        assert_eq!(record.into_host().hostgroups, vec!["db".to_string()]);
    }
}
