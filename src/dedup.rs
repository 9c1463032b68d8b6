//! Membership deduplication.
//!
//! Every add/remove flow goes through this gate so the engine never
//! double-processes a user. The algorithm is two explicit passes: first
//! collapse the incoming list into an ordered map keyed by `user_id`
//! (last-write-wins when the same user appears with different roles), then
//! partition the collapsed ids against the group's persisted member list.

use crate::request::MemberSpec;
use crate::types::MemberEntry;
use std::collections::{HashMap, HashSet};

/// Incoming user ids split by current membership, each deduplicated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartitionedUserIds {
    /// Ids already present in the group's member list.
    pub existing: Vec<String>,
    /// Ids not yet in the group.
    pub new: Vec<String>,
}

/// Collapse duplicate user ids in an incoming member list.
///
/// Order of first occurrence is kept; when the same `user_id` appears more
/// than once, the last occurrence's `role_id` wins. This tie-break is a
/// documented policy, relied on by the add flow.
#[must_use]
pub fn normalize_member_specs(specs: &[MemberSpec]) -> Vec<MemberSpec> {
    let mut order: Vec<String> = Vec::with_capacity(specs.len());
    let mut roles: HashMap<String, String> = HashMap::with_capacity(specs.len());

    for spec in specs {
        if !roles.contains_key(&spec.user_id) {
            order.push(spec.user_id.clone());
        }
        // Last occurrence wins.
        roles.insert(spec.user_id.clone(), spec.role_id.clone());
    }

    order
        .into_iter()
        .map(|user_id| {
            let role_id = roles.remove(&user_id).unwrap_or_default();
            MemberSpec { user_id, role_id }
        })
        .collect()
}

/// Partition deduplicated incoming ids against the persisted member list.
///
/// The two returned sets are disjoint. Stored duplicates (legacy data) do
/// not produce duplicate ids in the output.
#[must_use]
pub fn partition_user_ids(
    incoming: &[MemberSpec],
    current: &[MemberEntry],
) -> PartitionedUserIds {
    let member_ids: HashSet<&str> = current.iter().map(|m| m.user_id.as_str()).collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut partitioned = PartitionedUserIds::default();

    for spec in incoming {
        if !seen.insert(spec.user_id.as_str()) {
            continue;
        }
        if member_ids.contains(spec.user_id.as_str()) {
            partitioned.existing.push(spec.user_id.clone());
        } else {
            partitioned.new.push(spec.user_id.clone());
        }
    }

    partitioned
}

/// Partition plain user ids (remove flow) against the persisted member list.
#[must_use]
pub fn partition_plain_user_ids(
    user_ids: &[String],
    current: &[MemberEntry],
) -> PartitionedUserIds {
    let specs: Vec<MemberSpec> = user_ids
        .iter()
        .map(|id| MemberSpec::new(id.clone(), String::new()))
        .collect();
    partition_user_ids(&specs, current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoleType;

    fn entry(user_id: &str) -> MemberEntry {
        MemberEntry {
            user_id: user_id.into(),
            role_id: "r1".into(),
            role_type: RoleType::WorkspaceMember,
        }
    }

    #[test]
    fn test_normalize_keeps_first_occurrence_order() {
        let specs = vec![
            MemberSpec::new("u1", "r1"),
            MemberSpec::new("u2", "r1"),
            MemberSpec::new("u1", "r2"),
        ];
        let normalized = normalize_member_specs(&specs);
        assert_eq!(
            normalized,
            vec![MemberSpec::new("u1", "r2"), MemberSpec::new("u2", "r1")]
        );
    }

    #[test]
    fn test_normalize_last_role_wins() {
        let specs = vec![
            MemberSpec::new("u1", "r1"),
            MemberSpec::new("u1", "r2"),
            MemberSpec::new("u1", "r3"),
        ];
        let normalized = normalize_member_specs(&specs);
        assert_eq!(normalized, vec![MemberSpec::new("u1", "r3")]);
    }

    #[test]
    fn test_partition_disjoint_sets() {
        let current = vec![entry("u1"), entry("u2")];
        let incoming = vec![
            MemberSpec::new("u2", "r1"),
            MemberSpec::new("u3", "r1"),
            MemberSpec::new("u2", "r2"),
        ];
        let p = partition_user_ids(&incoming, &current);
        assert_eq!(p.existing, vec!["u2".to_string()]);
        assert_eq!(p.new, vec!["u3".to_string()]);
    }

    #[test]
    fn test_partition_tolerates_stored_duplicates() {
        // Legacy data can carry the same user twice; partition output must not.
        let current = vec![entry("u1"), entry("u1")];
        let incoming = vec![MemberSpec::new("u1", "r1")];
        let p = partition_user_ids(&incoming, &current);
        assert_eq!(p.existing, vec!["u1".to_string()]);
        assert!(p.new.is_empty());
    }

    #[test]
    fn test_partition_plain_ids() {
        let current = vec![entry("u1")];
        let ids = vec!["u1".to_string(), "u9".to_string(), "u1".to_string()];
        let p = partition_plain_user_ids(&ids, &current);
        assert_eq!(p.existing, vec!["u1".to_string()]);
        assert_eq!(p.new, vec!["u9".to_string()]);
    }
}
