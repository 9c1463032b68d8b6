//! Membership reconciliation engine.
//!
//! Orchestrates add/remove/re-role operations on a workspace group: validates
//! inputs against the role catalog and user directory, fans binding changes
//! out across every workspace in the group, writes the consolidated member
//! list back, and recomputes per-workspace user counts.
//!
//! No cross-entity transaction wraps the fan-out: each binding write and each
//! count recompute is an independent store call. A failed group write unwinds
//! already-applied binding changes through the [`UndoLog`]; failed count
//! recomputes are collected and logged without aborting the remaining ones,
//! and the whole operation stays safe to re-invoke because the dedup gate
//! no-ops on already-applied changes.

use crate::compensation::UndoLog;
use crate::config::GroupsConfig;
use crate::dedup::{normalize_member_specs, partition_plain_user_ids, partition_user_ids};
use crate::enrich::enrich_group;
use crate::error::{GroupError, Result, StoreError};
use crate::request::{AddUsersRequest, MemberSpec, RemoveUsersRequest, UpdateRoleRequest};
use crate::storage::{
    GroupStore, RoleBindingFilter, RoleBindingStore, RoleCatalog, UserDirectory, WorkspaceStore,
};
use crate::types::{
    EnrichedGroup, MemberEntry, ResourceGroup, RoleBinding, RoleType, WorkspaceGroup,
};
use crate::utils::{current_timestamp, new_binding_id};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// The reconciliation engine for group membership.
///
/// Generic over the five collaborator stores; see the `storage` module for
/// the traits an embedding application implements.
///
/// # Example
///
/// ```rust,ignore
/// use workspace_groups::{AddUsersRequest, GroupsConfig, MemberSpec, MembershipEngine};
///
/// let engine = MembershipEngine::new(
///     group_store,
///     binding_store,
///     workspace_store,
///     directory,
///     role_catalog,
///     GroupsConfig::default(),
/// );
///
/// let group = engine
///     .add_users(AddUsersRequest::admin(
///         "wg-1",
///         "domain-1",
///         vec![MemberSpec::new("u1", "role-owner")],
///         "admin",
///     ))
///     .await?;
/// ```
pub struct MembershipEngine<G, B, W, D, R>
where
    G: GroupStore,
    B: RoleBindingStore,
    W: WorkspaceStore,
    D: UserDirectory,
    R: RoleCatalog,
{
    groups: G,
    bindings: B,
    workspaces: W,
    directory: D,
    roles: R,
    config: GroupsConfig,
}

impl<G, B, W, D, R> MembershipEngine<G, B, W, D, R>
where
    G: GroupStore,
    B: RoleBindingStore,
    W: WorkspaceStore,
    D: UserDirectory,
    R: RoleCatalog,
{
    /// Create a new engine.
    #[must_use]
    pub fn new(
        groups: G,
        bindings: B,
        workspaces: W,
        directory: D,
        roles: R,
        config: GroupsConfig,
    ) -> Self {
        Self {
            groups,
            bindings,
            workspaces,
            directory,
            roles,
            config,
        }
    }

    /// Get a reference to the engine configuration.
    pub fn config(&self) -> &GroupsConfig {
        &self.config
    }

    /// Add users to a group.
    ///
    /// Rejects targets that are already members, unknown users, and role ids
    /// that do not resolve to a workspace-owner or workspace-member role.
    /// When the group has workspaces, any stale binding the targets hold in
    /// those workspaces is swept before one fresh binding per
    /// (user, workspace) pair is created; when it has none, membership is
    /// recorded with bindings deferred until a workspace attaches.
    ///
    /// Workspace user counts are not recomputed here; removal flows and the
    /// workspace-attach path own the recompute.
    #[instrument(
        skip_all,
        fields(workspace_group_id = %req.workspace_group_id, domain_id = %req.domain_id)
    )]
    pub async fn add_users(&self, req: AddUsersRequest) -> Result<EnrichedGroup> {
        let group = self.get_group(&req.workspace_group_id, &req.domain_id).await?;

        let specs = normalize_member_specs(&req.users);
        let partitioned = partition_user_ids(&specs, &group.users);
        if !partitioned.existing.is_empty() {
            return Err(GroupError::AlreadyMember {
                user_ids: partitioned.existing,
            });
        }

        self.check_users_exist(&partitioned.new, &req.domain_id).await?;

        if req.caller.role_type == RoleType::User {
            self.check_self_service_caller(&group, &req.caller.caller_id)?;
        }

        if let Some(limit) = self.config.max_members_per_group {
            let current = group.users.len() as u32;
            if current + partitioned.new.len() as u32 > limit {
                return Err(GroupError::MemberLimitReached { current, limit });
            }
        }

        let role_map = self.resolve_role_map(&specs, &req.domain_id).await?;

        let workspace_ids = self
            .group_workspace_ids(&req.workspace_group_id, &req.domain_id)
            .await?;

        let mut undo = UndoLog::new();
        if !workspace_ids.is_empty() {
            // A target may still hold bindings in these workspaces from a
            // prior role; sweep them before creating fresh ones.
            let result = self
                .sweep_bindings(
                    RoleBindingFilter::in_domain(&req.domain_id)
                        .users(partitioned.new.iter().cloned())
                        .workspaces(workspace_ids.iter().cloned()),
                    &mut undo,
                )
                .await;
            if let Err(err) = result {
                undo.unwind(&self.bindings).await;
                return Err(err);
            }

            if let Err(err) = self
                .create_bindings(&specs, &role_map, &workspace_ids, &group, &mut undo)
                .await
            {
                undo.unwind(&self.bindings).await;
                return Err(err);
            }
        }

        let mut updated = group.clone();
        updated.users.extend(specs.iter().map(|spec| MemberEntry {
            user_id: spec.user_id.clone(),
            role_id: spec.role_id.clone(),
            role_type: role_map[&spec.role_id],
        }));
        updated.updated_by = Some(req.caller.caller_id.clone());
        updated.updated_at = current_timestamp();

        if let Err(err) = self.write_group(&mut updated, group.version).await {
            undo.unwind(&self.bindings).await;
            return Err(err);
        }
        undo.commit();

        info!(
            added = partitioned.new.len(),
            workspaces = workspace_ids.len(),
            "Users added to workspace group"
        );

        enrich_group(&self.directory, &updated).await
    }

    /// Remove users from a group.
    ///
    /// Sweeps every binding the targets hold across the whole group (a member
    /// may be bound in several workspaces), drops them from the member list,
    /// then recomputes user counts: for the one workspace named in the
    /// request, or for every workspace in the group when none is. A named
    /// workspace is resolved up front, before any binding is touched.
    #[instrument(
        skip_all,
        fields(workspace_group_id = %req.workspace_group_id, domain_id = %req.domain_id)
    )]
    pub async fn remove_users(&self, req: RemoveUsersRequest) -> Result<EnrichedGroup> {
        let group = self.get_group(&req.workspace_group_id, &req.domain_id).await?;

        let partitioned = partition_plain_user_ids(&req.user_ids, &group.users);
        if !partitioned.new.is_empty() {
            return Err(GroupError::NotMember {
                user_ids: partitioned.new,
            });
        }
        let targets = partitioned.existing;

        if let Some(workspace_id) = &req.workspace_id {
            self.workspaces
                .get_workspace(workspace_id, &req.domain_id)
                .await?
                .ok_or_else(|| GroupError::workspace_not_found(workspace_id))?;
        }

        let mut undo = UndoLog::new();
        let result = self
            .sweep_bindings(
                RoleBindingFilter::in_domain(&req.domain_id)
                    .users(targets.iter().cloned())
                    .group(&req.workspace_group_id),
                &mut undo,
            )
            .await;
        if let Err(err) = result {
            undo.unwind(&self.bindings).await;
            return Err(err);
        }

        let mut updated = group.clone();
        updated.users.retain(|m| !targets.contains(&m.user_id));
        updated.updated_by = Some(req.caller.caller_id.clone());
        updated.updated_at = current_timestamp();

        if let Err(err) = self.write_group(&mut updated, group.version).await {
            undo.unwind(&self.bindings).await;
            return Err(err);
        }
        undo.commit();

        match &req.workspace_id {
            Some(workspace_id) => {
                recompute_user_counts(
                    &self.bindings,
                    &self.workspaces,
                    std::slice::from_ref(workspace_id),
                    &req.domain_id,
                )
                .await;
            }
            None => {
                let workspace_ids = self
                    .group_workspace_ids(&req.workspace_group_id, &req.domain_id)
                    .await?;
                recompute_user_counts(
                    &self.bindings,
                    &self.workspaces,
                    &workspace_ids,
                    &req.domain_id,
                )
                .await;
            }
        }

        info!(removed = targets.len(), "Users removed from workspace group");

        enrich_group(&self.directory, &updated).await
    }

    /// Change one member's role.
    ///
    /// The member's bindings across all of the group's workspaces are patched
    /// in place (no delete/recreate), then the single member entry is
    /// updated. Disabled or deleted users are rejected before any mutation.
    #[instrument(
        skip_all,
        fields(
            workspace_group_id = %req.workspace_group_id,
            domain_id = %req.domain_id,
            user_id = %req.user_id
        )
    )]
    pub async fn update_role(&self, req: UpdateRoleRequest) -> Result<EnrichedGroup> {
        let group = self.get_group(&req.workspace_group_id, &req.domain_id).await?;
        if !group.has_member(&req.user_id) {
            return Err(GroupError::NotMember {
                user_ids: vec![req.user_id.clone()],
            });
        }

        let user = self
            .directory
            .get_user(&req.user_id, &req.domain_id)
            .await?
            .ok_or_else(|| GroupError::users_not_found(vec![req.user_id.clone()]))?;
        if !user.state.allows_role_change() {
            return Err(GroupError::not_allowed_user_state(
                &req.user_id,
                user.state.as_str(),
            ));
        }

        // Resolve without a type constraint so an inadmissible type is
        // reported as such rather than as an unknown role.
        let role_ids = vec![req.role_id.clone()];
        let resolved = self
            .roles
            .filter_roles(&role_ids, &req.domain_id, &[])
            .await?;
        let role = resolved
            .iter()
            .find(|r| r.role_id == req.role_id)
            .ok_or_else(|| GroupError::invalid_role(&req.role_id))?;
        if !role.role_type.is_group_assignable() {
            return Err(GroupError::NotAllowedRoleType {
                role_type: role.role_type,
            });
        }

        let filter = RoleBindingFilter::in_domain(&req.domain_id)
            .users([req.user_id.clone()])
            .group(&req.workspace_group_id);
        for binding in self.bindings.filter_bindings(&filter).await? {
            self.bindings
                .update_binding_role(&binding.role_binding_id, &req.role_id, role.role_type)
                .await?;
        }

        let mut updated = group.clone();
        // Uniqueness invariant: at most one entry matches.
        if let Some(entry) = updated.users.iter_mut().find(|m| m.user_id == req.user_id) {
            entry.role_id = req.role_id.clone();
            entry.role_type = role.role_type;
        }
        updated.updated_by = Some(req.caller.caller_id.clone());
        updated.updated_at = current_timestamp();

        self.write_group(&mut updated, group.version).await?;

        info!(role_id = %req.role_id, "Member role updated");

        enrich_group(&self.directory, &updated).await
    }

    async fn get_group(
        &self,
        workspace_group_id: &str,
        domain_id: &str,
    ) -> Result<WorkspaceGroup> {
        self.groups
            .get_group(workspace_group_id, domain_id)
            .await?
            .ok_or_else(|| GroupError::group_not_found(workspace_group_id))
    }

    async fn check_users_exist(&self, user_ids: &[String], domain_id: &str) -> Result<()> {
        let profiles = self.directory.filter_users(user_ids, domain_id).await?;
        if profiles.len() != user_ids.len() {
            let missing: Vec<String> = user_ids
                .iter()
                .filter(|id| !profiles.iter().any(|p| &p.user_id == *id))
                .cloned()
                .collect();
            return Err(GroupError::users_not_found(missing));
        }
        Ok(())
    }

    /// Self-service gate: a plain-user caller may only manage a group where
    /// their own member entry carries the workspace-owner classification.
    ///
    /// This applies to empty groups as well: a caller with no entry is
    /// rejected, so seeding the first member of a group stays an
    /// administrative operation.
    fn check_self_service_caller(&self, group: &WorkspaceGroup, caller_id: &str) -> Result<()> {
        match group.member(caller_id) {
            Some(entry) if entry.role_type == RoleType::WorkspaceOwner => Ok(()),
            Some(entry) => Err(GroupError::NotAllowedRoleType {
                role_type: entry.role_type,
            }),
            None => Err(GroupError::NotMember {
                user_ids: vec![caller_id.to_string()],
            }),
        }
    }

    /// Resolve the requested role ids to role types, admitting only
    /// workspace-owner and workspace-member roles.
    async fn resolve_role_map(
        &self,
        specs: &[MemberSpec],
        domain_id: &str,
    ) -> Result<HashMap<String, RoleType>> {
        let mut role_ids: Vec<String> = specs.iter().map(|s| s.role_id.clone()).collect();
        role_ids.sort();
        role_ids.dedup();

        let resolved = self
            .roles
            .filter_roles(
                &role_ids,
                domain_id,
                &[RoleType::WorkspaceOwner, RoleType::WorkspaceMember],
            )
            .await?;
        let role_map: HashMap<String, RoleType> = resolved
            .into_iter()
            .map(|r| (r.role_id, r.role_type))
            .collect();

        for role_id in &role_ids {
            if !role_map.contains_key(role_id) {
                return Err(GroupError::invalid_role(role_id));
            }
        }

        Ok(role_map)
    }

    async fn group_workspace_ids(
        &self,
        workspace_group_id: &str,
        domain_id: &str,
    ) -> Result<Vec<String>> {
        Ok(self
            .workspaces
            .list_group_workspaces(workspace_group_id, domain_id)
            .await?
            .into_iter()
            .map(|w| w.workspace_id)
            .collect())
    }

    /// Delete every binding matching the filter, recording each for undo.
    async fn sweep_bindings(
        &self,
        filter: RoleBindingFilter,
        undo: &mut UndoLog,
    ) -> Result<()> {
        for binding in self.bindings.filter_bindings(&filter).await? {
            self.bindings.delete_binding(&binding.role_binding_id).await?;
            undo.deleted_binding(binding);
        }
        Ok(())
    }

    /// Create one binding per (new user, workspace) pair.
    async fn create_bindings(
        &self,
        specs: &[MemberSpec],
        role_map: &HashMap<String, RoleType>,
        workspace_ids: &[String],
        group: &WorkspaceGroup,
        undo: &mut UndoLog,
    ) -> Result<()> {
        let now = current_timestamp();
        for workspace_id in workspace_ids {
            for spec in specs {
                let binding = RoleBinding {
                    role_binding_id: new_binding_id(),
                    user_id: spec.user_id.clone(),
                    role_id: spec.role_id.clone(),
                    role_type: role_map[&spec.role_id],
                    resource_group: ResourceGroup::Workspace,
                    workspace_group_id: Some(group.workspace_group_id.clone()),
                    workspace_id: workspace_id.clone(),
                    domain_id: group.domain_id.clone(),
                    created_at: now,
                };
                self.bindings.create_binding(&binding).await?;
                undo.created_binding(binding.role_binding_id);
            }
        }
        Ok(())
    }

    /// Bump the version and write the group back, honoring the optimistic
    /// locking configuration.
    async fn write_group(&self, group: &mut WorkspaceGroup, read_version: u64) -> Result<()> {
        group.version = read_version + 1;
        let expected = self.config.optimistic_locking.then_some(read_version);
        self.groups
            .update_group(group, expected)
            .await
            .map_err(|err| match err {
                StoreError::Conflict(_) => {
                    GroupError::concurrent_modification(&group.workspace_group_id)
                }
                other => GroupError::Storage(other),
            })
    }
}

/// Recompute the distinct-user binding count for each workspace and write it
/// back.
///
/// Every workspace is attempted even if one fails; failures are collected
/// and logged so the caller's already-applied membership change stands.
pub(crate) async fn recompute_user_counts<B, W>(
    bindings: &B,
    workspaces: &W,
    workspace_ids: &[String],
    domain_id: &str,
) where
    B: RoleBindingStore,
    W: WorkspaceStore,
{
    let mut failed: Vec<&str> = Vec::new();
    for workspace_id in workspace_ids {
        let result = async {
            let count = bindings.count_distinct_users(workspace_id, domain_id).await?;
            workspaces
                .update_user_count(workspace_id, domain_id, count)
                .await
        }
        .await;

        if let Err(err) = result {
            warn!(%workspace_id, %err, "Failed to recompute workspace user count");
            failed.push(workspace_id);
        }
    }

    if !failed.is_empty() {
        warn!(
            ?failed,
            total = workspace_ids.len(),
            "Partial failure recomputing workspace user counts"
        );
    }
}
