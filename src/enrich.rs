//! Read-time enrichment of member entries.
//!
//! The member list persists only (user, role, role-type); the display name
//! and state live in the user directory and are joined in here on every
//! read. Directory and group state can drift (a user may be deleted after
//! being added), so lookup misses yield empty strings instead of failing.

use crate::error::Result;
use crate::storage::UserDirectory;
use crate::types::{EnrichedGroup, EnrichedMember, WorkspaceGroup};
use std::collections::{HashMap, HashSet};

/// Join directory name/state onto a group's member list.
pub(crate) async fn enrich_group<D: UserDirectory>(
    directory: &D,
    group: &WorkspaceGroup,
) -> Result<EnrichedGroup> {
    let mut seen = HashSet::new();
    let user_ids: Vec<String> = group
        .users
        .iter()
        .filter(|m| seen.insert(m.user_id.as_str()))
        .map(|m| m.user_id.clone())
        .collect();

    let profiles = directory.filter_users(&user_ids, &group.domain_id).await?;
    let profile_map: HashMap<&str, (&str, &str)> = profiles
        .iter()
        .map(|p| (p.user_id.as_str(), (p.name.as_str(), p.state.as_str())))
        .collect();

    let users = group
        .users
        .iter()
        .map(|m| {
            let (name, state) = profile_map
                .get(m.user_id.as_str())
                .copied()
                .unwrap_or(("", ""));
            EnrichedMember {
                user_id: m.user_id.clone(),
                role_id: m.role_id.clone(),
                role_type: m.role_type,
                user_name: name.to_string(),
                state: state.to_string(),
            }
        })
        .collect();

    Ok(EnrichedGroup {
        workspace_group_id: group.workspace_group_id.clone(),
        name: group.name.clone(),
        tags: group.tags.clone(),
        users,
        workspace_count: group.workspace_count,
        domain_id: group.domain_id.clone(),
        created_by: group.created_by.clone(),
        updated_by: group.updated_by.clone(),
        created_at: group.created_at,
        updated_at: group.updated_at,
    })
}
