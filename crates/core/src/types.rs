//! Domain types for the inventory pipeline.
//!
//! `Host` is what the fetcher produces, `InventorySnapshot` is the grouped
//! view handed to the orchestrator, and `CacheRecord` is the snapshot's
//! persisted form with its creation timestamp.

use crate::constants::META_KEY;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Per-host variables surfaced under the reserved `_meta` key
pub type HostVars = serde_json::Map<String, serde_json::Value>;

/// One host as reported by the management API.
///
/// Immutable once constructed; a new fetch cycle replaces the whole set.
#[derive(Debug, Clone, PartialEq)]
pub struct Host {
    /// Hostname (FQDN) as registered with the management system
    pub name: String,
    /// Hostgroups the host belongs to; may be empty
    pub hostgroups: Vec<String>,
    /// Variables exposed to the orchestrator for this host
    pub vars: HostVars,
}

impl Host {
    /// Create a host with no variables
    #[must_use]
    pub fn new(name: impl Into<String>, hostgroups: Vec<String>) -> Self {
        Self {
            name: name.into(),
            hostgroups,
            vars: HostVars::new(),
        }
    }

    /// Attach variables to the host
    #[must_use]
    pub fn with_vars(mut self, vars: HostVars) -> Self {
        self.vars = vars;
        self
    }
}

/// One complete grouped capture of the inventory.
///
/// The serialized form is the external contract consumed by the
/// orchestrator: every group name maps to its member hostnames, and the
/// reserved `_meta` key maps each hostname to its variables. Group keys are
/// kept sorted; member lists preserve the order hosts were fetched in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Group name to member hostnames, lexicographically ordered by key
    #[serde(flatten)]
    pub groups: BTreeMap<String, Vec<String>>,

    /// Hostname to variables, under the reserved `_meta` key
    #[serde(rename = "_meta", default)]
    pub meta: BTreeMap<String, HostVars>,
}

impl InventorySnapshot {
    /// Create an empty snapshot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a host to a group, creating the group on first member
    pub fn add_member(&mut self, group: impl Into<String>, host: impl Into<String>) {
        self.groups.entry(group.into()).or_default().push(host.into());
    }

    /// Variables recorded for a host, if it is part of this snapshot
    #[must_use]
    pub fn host_vars(&self, name: &str) -> Option<&HostVars> {
        self.meta.get(name)
    }

    /// Whether any group or `_meta` entry mentions the host
    #[must_use]
    pub fn contains_host(&self, name: &str) -> bool {
        self.meta.contains_key(name)
            || self.groups.values().any(|members| members.iter().any(|m| m == name))
    }
}

/// Persisted form of a snapshot plus its creation timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// When the snapshot was captured
    pub created_at: DateTime<Utc>,
    /// The captured inventory
    pub snapshot: InventorySnapshot,
}

impl CacheRecord {
    /// Wrap a snapshot with the current time as its creation timestamp
    #[must_use]
    pub fn new(snapshot: InventorySnapshot) -> Self {
        Self {
            created_at: Utc::now(),
            snapshot,
        }
    }

    /// Freshness check against a maximum age.
    ///
    /// The boundary is exclusive: a record aged exactly `max_age` is stale.
    #[must_use]
    pub fn is_fresh(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.created_at);
        match chrono::Duration::from_std(max_age) {
            Ok(limit) => age < limit,
            // max_age too large to represent; nothing ever goes stale
            Err(_) => true,
        }
    }
}

/// Whether a group name is reserved and may not carry members
#[must_use]
pub fn is_reserved_group(name: &str) -> bool {
    name == META_KEY
}
