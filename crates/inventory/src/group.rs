//! Deterministic grouping of fetched hosts into an inventory snapshot.

use satinv_core::constants::UNGROUPED_GROUP;
use satinv_core::types::is_reserved_group;
use satinv_core::{Host, InventorySnapshot};
use std::collections::BTreeSet;

/// Replace characters the orchestrator cannot use in group names.
///
/// Anything outside `[A-Za-z0-9-]` becomes an underscore.
#[must_use]
pub fn sanitize_group_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// Group hosts by every hostgroup they declare.
///
/// Group keys end up lexicographically sorted; member lists preserve the
/// order hosts were fetched in. Hosts without any hostgroup land in the
/// `ungrouped` bucket, as does any group whose sanitized name would collide
/// with the reserved `_meta` key.
#[must_use]
pub fn build_snapshot(hosts: &[Host]) -> InventorySnapshot {
    let mut snapshot = InventorySnapshot::new();

    for host in hosts {
        // Sanitization can fold distinct spellings together; add each host
        // to a given group at most once.
        let mut groups: BTreeSet<String> = BTreeSet::new();
        for raw in &host.hostgroups {
            let name = sanitize_group_name(raw);
            if is_reserved_group(&name) {
                groups.insert(UNGROUPED_GROUP.to_string());
            } else {
                groups.insert(name);
            }
        }
        if groups.is_empty() {
            groups.insert(UNGROUPED_GROUP.to_string());
        }

        for group in groups {
            snapshot.add_member(group, &host.name);
        }
        snapshot.meta.insert(host.name.clone(), host.vars.clone());
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use satinv_core::HostVars;

    fn host(name: &str, groups: &[&str]) -> Host {
        Host::new(name, groups.iter().map(|g| g.to_string()).collect())
    }

    #[test]
    fn hosts_appear_under_every_declared_group() {
        let hosts = vec![host("a", &["web"]), host("b", &["web", "db"])];
        let snapshot = build_snapshot(&hosts);

        assert_eq!(snapshot.groups["web"], vec!["a".to_string(), "b".to_string()]);
        assert_eq!(snapshot.groups["db"], vec!["b".to_string()]);
        assert_eq!(snapshot.groups.len(), 2);
        assert_eq!(snapshot.meta.len(), 2);
    }

    #[test]
    fn hosts_appear_under_no_undeclared_group() {
        let hosts = vec![host("a", &["web"]), host("b", &["db"])];
        let snapshot = build_snapshot(&hosts);

        assert!(!snapshot.groups["web"].contains(&"b".to_string()));
        assert!(!snapshot.groups["db"].contains(&"a".to_string()));
    }

    #[test]
    fn hosts_without_groups_land_in_ungrouped() {
        let hosts = vec![host("a", &[]), host("b", &["web"])];
        let snapshot = build_snapshot(&hosts);

        assert_eq!(snapshot.groups["ungrouped"], vec!["a".to_string()]);
        assert!(snapshot.meta.contains_key("a"));
    }

    #[test]
    fn group_names_are_sanitized() {
        let hosts = vec![host("a", &["Web Servers (prod)"])];
        let snapshot = build_snapshot(&hosts);

        assert_eq!(
            snapshot.groups["Web_Servers__prod_"],
            vec!["a".to_string()]
        );
    }

    #[test]
    fn sanitization_collisions_do_not_duplicate_members() {
        let hosts = vec![host("a", &["app/web", "app web"])];
        let snapshot = build_snapshot(&hosts);

        assert_eq!(snapshot.groups["app_web"], vec!["a".to_string()]);
    }

    #[test]
    fn reserved_meta_group_is_folded_into_ungrouped() {
        let hosts = vec![host("a", &["_meta"])];
        let snapshot = build_snapshot(&hosts);

        assert!(!snapshot.groups.contains_key("_meta"));
        assert_eq!(snapshot.groups["ungrouped"], vec!["a".to_string()]);
    }

    #[test]
    fn member_order_follows_fetch_order() {
        let hosts = vec![host("z", &["web"]), host("a", &["web"]), host("m", &["web"])];
        let snapshot = build_snapshot(&hosts);

        assert_eq!(
            snapshot.groups["web"],
            vec!["z".to_string(), "a".to_string(), "m".to_string()]
        );
    }

    #[test]
    fn host_vars_are_carried_into_meta() {
        let mut vars = HostVars::new();
        vars.insert("ip".to_string(), serde_json::Value::String("10.0.0.1".into()));
        let hosts = vec![Host::new("a", vec!["web".to_string()]).with_vars(vars.clone())];

        let snapshot = build_snapshot(&hosts);
        assert_eq!(snapshot.meta["a"], vars);
    }
}
