//! Group manager.
//!
//! CRUD, listing and statistics over workspace groups. Membership mutations
//! live in [`MembershipEngine`](crate::MembershipEngine); this manager owns
//! the group record lifecycle, including the cascade cleanup of owned role
//! bindings on delete.

use crate::config::GroupsConfig;
use crate::enrich::enrich_group;
use crate::error::{GroupError, Result, StoreError};
use crate::membership::recompute_user_counts;
use crate::request::{
    CreateGroupRequest, ListGroupsQuery, StatQuery, StatResult, UpdateGroupRequest,
};
use crate::storage::{GroupStore, RoleBindingFilter, RoleBindingStore, UserDirectory, WorkspaceStore};
use crate::types::{EnrichedGroup, WorkspaceGroup};
use crate::utils::{current_timestamp, new_group_id};
use tracing::{info, instrument};

/// Manager for the workspace group record itself.
///
/// # Example
///
/// ```rust,ignore
/// use workspace_groups::{CallerContext, CreateGroupRequest, GroupManager, GroupsConfig};
///
/// let manager = GroupManager::new(
///     group_store,
///     binding_store,
///     workspace_store,
///     directory,
///     GroupsConfig::default(),
/// );
///
/// let group = manager
///     .create_group(CreateGroupRequest {
///         name: "Platform".into(),
///         tags: Default::default(),
///         domain_id: "domain-1".into(),
///         caller: CallerContext::domain_admin("admin"),
///     })
///     .await?;
/// ```
pub struct GroupManager<G, B, W, D>
where
    G: GroupStore,
    B: RoleBindingStore,
    W: WorkspaceStore,
    D: UserDirectory,
{
    groups: G,
    bindings: B,
    workspaces: W,
    directory: D,
    config: GroupsConfig,
}

impl<G, B, W, D> GroupManager<G, B, W, D>
where
    G: GroupStore,
    B: RoleBindingStore,
    W: WorkspaceStore,
    D: UserDirectory,
{
    /// Create a new group manager.
    #[must_use]
    pub fn new(groups: G, bindings: B, workspaces: W, directory: D, config: GroupsConfig) -> Self {
        Self {
            groups,
            bindings,
            workspaces,
            directory,
            config,
        }
    }

    /// Get a reference to the group store.
    pub fn group_store(&self) -> &G {
        &self.groups
    }

    /// Create a workspace group with an empty member list.
    #[instrument(skip_all, fields(domain_id = %req.domain_id, name = %req.name))]
    pub async fn create_group(&self, req: CreateGroupRequest) -> Result<WorkspaceGroup> {
        let now = current_timestamp();
        let group = WorkspaceGroup {
            workspace_group_id: new_group_id(),
            name: req.name,
            tags: req.tags,
            users: Vec::new(),
            workspace_count: 0,
            domain_id: req.domain_id,
            created_by: req.caller.caller_id,
            updated_by: None,
            created_at: now,
            updated_at: now,
            version: 1,
        };

        self.groups.create_group(&group).await?;

        info!(workspace_group_id = %group.workspace_group_id, "Workspace group created");

        Ok(group)
    }

    /// Update a group's name and tags.
    #[instrument(
        skip_all,
        fields(workspace_group_id = %req.workspace_group_id, domain_id = %req.domain_id)
    )]
    pub async fn update_group(&self, req: UpdateGroupRequest) -> Result<WorkspaceGroup> {
        let group = self
            .get_group_record(&req.workspace_group_id, &req.domain_id)
            .await?;

        let mut updated = group.clone();
        if let Some(name) = req.name {
            updated.name = name;
        }
        if let Some(tags) = req.tags {
            updated.tags = tags;
        }
        updated.updated_by = Some(req.caller.caller_id);
        updated.updated_at = current_timestamp();
        updated.version = group.version + 1;

        let expected = self.config.optimistic_locking.then_some(group.version);
        self.groups
            .update_group(&updated, expected)
            .await
            .map_err(|err| match err {
                StoreError::Conflict(_) => {
                    GroupError::concurrent_modification(&updated.workspace_group_id)
                }
                other => GroupError::Storage(other),
            })?;

        info!("Workspace group updated");

        Ok(updated)
    }

    /// Delete a group.
    ///
    /// Every role binding owned by the group is deleted first so no orphan
    /// grants survive, and the affected workspaces' user counts are
    /// recomputed before the group record goes away.
    #[instrument(skip(self))]
    pub async fn delete_group(&self, workspace_group_id: &str, domain_id: &str) -> Result<()> {
        self.get_group_record(workspace_group_id, domain_id).await?;

        let filter = RoleBindingFilter::in_domain(domain_id).group(workspace_group_id);
        let owned = self.bindings.filter_bindings(&filter).await?;
        let swept = owned.len();
        for binding in owned {
            self.bindings.delete_binding(&binding.role_binding_id).await?;
        }

        let workspace_ids: Vec<String> = self
            .workspaces
            .list_group_workspaces(workspace_group_id, domain_id)
            .await?
            .into_iter()
            .map(|w| w.workspace_id)
            .collect();
        recompute_user_counts(&self.bindings, &self.workspaces, &workspace_ids, domain_id).await;

        self.groups.delete_group(workspace_group_id, domain_id).await?;

        info!(swept_bindings = swept, "Workspace group deleted");

        Ok(())
    }

    /// Get a group with the enriched member view.
    #[instrument(skip(self))]
    pub async fn get_group(
        &self,
        workspace_group_id: &str,
        domain_id: &str,
    ) -> Result<EnrichedGroup> {
        let group = self.get_group_record(workspace_group_id, domain_id).await?;
        enrich_group(&self.directory, &group).await
    }

    /// Filtered listing with the enriched member view applied to each result.
    #[instrument(skip_all, fields(domain_id = %query.domain_id))]
    pub async fn list_groups(
        &self,
        query: &ListGroupsQuery,
    ) -> Result<(Vec<EnrichedGroup>, u64)> {
        let (groups, total_count) = self.groups.list_groups(query).await?;

        let mut enriched = Vec::with_capacity(groups.len());
        for group in &groups {
            enriched.push(enrich_group(&self.directory, group).await?);
        }

        Ok((enriched, total_count))
    }

    /// Aggregation pass-through to the group store.
    #[instrument(skip_all, fields(domain_id = %query.domain_id))]
    pub async fn stat_groups(&self, query: &StatQuery) -> Result<StatResult> {
        self.groups.stat_groups(query).await.map_err(Into::into)
    }

    async fn get_group_record(
        &self,
        workspace_group_id: &str,
        domain_id: &str,
    ) -> Result<WorkspaceGroup> {
        self.groups
            .get_group(workspace_group_id, domain_id)
            .await?
            .ok_or_else(|| GroupError::group_not_found(workspace_group_id))
    }
}
