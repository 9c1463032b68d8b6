//! Role binding storage trait.

use crate::error::StoreResult;
use crate::types::{RoleBinding, RoleType};
use async_trait::async_trait;

/// Filter over role bindings. Empty vectors and `None` fields place no
/// constraint on the corresponding attribute; `domain_id` is always required.
#[derive(Clone, Debug, Default)]
pub struct RoleBindingFilter {
    /// Owning domain (required).
    pub domain_id: String,
    /// Restrict to these users.
    pub user_ids: Vec<String>,
    /// Restrict to these workspaces.
    pub workspace_ids: Vec<String>,
    /// Restrict to bindings owned by this group.
    pub workspace_group_id: Option<String>,
}

impl RoleBindingFilter {
    /// Filter scoped to a domain with no further constraints.
    #[must_use]
    pub fn in_domain(domain_id: impl Into<String>) -> Self {
        Self {
            domain_id: domain_id.into(),
            ..Self::default()
        }
    }

    /// Restrict to the given users.
    #[must_use]
    pub fn users<I, S>(mut self, user_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.user_ids = user_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to the given workspaces.
    #[must_use]
    pub fn workspaces<I, S>(mut self, workspace_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.workspace_ids = workspace_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to bindings owned by the given group.
    #[must_use]
    pub fn group(mut self, workspace_group_id: impl Into<String>) -> Self {
        self.workspace_group_id = Some(workspace_group_id.into());
        self
    }

    /// Whether a binding matches this filter.
    #[must_use]
    pub fn matches(&self, binding: &RoleBinding) -> bool {
        if binding.domain_id != self.domain_id {
            return false;
        }
        if !self.user_ids.is_empty() && !self.user_ids.contains(&binding.user_id) {
            return false;
        }
        if !self.workspace_ids.is_empty() && !self.workspace_ids.contains(&binding.workspace_id)
        {
            return false;
        }
        if let Some(group_id) = &self.workspace_group_id {
            if binding.workspace_group_id.as_deref() != Some(group_id.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Trait for role binding persistence and aggregation.
#[async_trait]
pub trait RoleBindingStore: Send + Sync {
    /// List bindings matching the filter.
    async fn filter_bindings(&self, filter: &RoleBindingFilter) -> StoreResult<Vec<RoleBinding>>;

    /// Persist a new binding.
    async fn create_binding(&self, binding: &RoleBinding) -> StoreResult<()>;

    /// Delete a binding by id.
    async fn delete_binding(&self, role_binding_id: &str) -> StoreResult<()>;

    /// Patch a binding's role in place.
    async fn update_binding_role(
        &self,
        role_binding_id: &str,
        role_id: &str,
        role_type: RoleType,
    ) -> StoreResult<()>;

    /// Count distinct users holding at least one binding in the workspace.
    async fn count_distinct_users(
        &self,
        workspace_id: &str,
        domain_id: &str,
    ) -> StoreResult<u32>;
}
