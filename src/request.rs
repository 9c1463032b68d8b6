//! Normalized request types.
//!
//! Mutation requests arrive from two boundaries: the administrative API and
//! the self-service path where a user manages a group they own. Both are
//! normalized into a single struct shape with a [`CallerContext`]
//! discriminant, so the engine has one input contract instead of
//! shape-sniffing at each call site.

use crate::types::{RoleType, Tags};
use serde::{Deserialize, Serialize};

/// Identity of the caller, injected by the surrounding auth layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallerContext {
    /// Authenticated user id of the caller.
    pub caller_id: String,
    /// Role type the caller acts under.
    pub role_type: RoleType,
}

impl CallerContext {
    /// Caller acting as a domain administrator.
    #[must_use]
    pub fn domain_admin(caller_id: impl Into<String>) -> Self {
        Self {
            caller_id: caller_id.into(),
            role_type: RoleType::DomainAdmin,
        }
    }

    /// Caller acting as a plain user (self-service path).
    #[must_use]
    pub fn user(caller_id: impl Into<String>) -> Self {
        Self {
            caller_id: caller_id.into(),
            role_type: RoleType::User,
        }
    }
}

/// A (user, role) pair requested for addition to a group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberSpec {
    /// Directory user id.
    pub user_id: String,
    /// Role to grant.
    pub role_id: String,
}

impl MemberSpec {
    /// Convenience constructor.
    #[must_use]
    pub fn new(user_id: impl Into<String>, role_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role_id: role_id.into(),
        }
    }
}

/// Request to create a workspace group.
#[derive(Clone, Debug)]
pub struct CreateGroupRequest {
    /// Display name.
    pub name: String,
    /// Free-form tags.
    pub tags: Tags,
    /// Owning domain.
    pub domain_id: String,
    /// Caller identity.
    pub caller: CallerContext,
}

/// Request to update a group's name and tags.
#[derive(Clone, Debug)]
pub struct UpdateGroupRequest {
    /// Target group.
    pub workspace_group_id: String,
    /// Owning domain.
    pub domain_id: String,
    /// New name, if changing.
    pub name: Option<String>,
    /// New tags, if changing.
    pub tags: Option<Tags>,
    /// Caller identity.
    pub caller: CallerContext,
}

/// Request to add users to a group.
#[derive(Clone, Debug)]
pub struct AddUsersRequest {
    /// Target group.
    pub workspace_group_id: String,
    /// Owning domain.
    pub domain_id: String,
    /// Users to add with their roles.
    pub users: Vec<MemberSpec>,
    /// Caller identity; `RoleType::User` callers go through the
    /// self-service gate.
    pub caller: CallerContext,
}

impl AddUsersRequest {
    /// Build an administrative add request.
    #[must_use]
    pub fn admin(
        workspace_group_id: impl Into<String>,
        domain_id: impl Into<String>,
        users: Vec<MemberSpec>,
        caller_id: impl Into<String>,
    ) -> Self {
        Self {
            workspace_group_id: workspace_group_id.into(),
            domain_id: domain_id.into(),
            users,
            caller: CallerContext::domain_admin(caller_id),
        }
    }

    /// Build a self-service add request (caller is a plain user).
    #[must_use]
    pub fn self_service(
        workspace_group_id: impl Into<String>,
        domain_id: impl Into<String>,
        users: Vec<MemberSpec>,
        caller_id: impl Into<String>,
    ) -> Self {
        Self {
            workspace_group_id: workspace_group_id.into(),
            domain_id: domain_id.into(),
            users,
            caller: CallerContext::user(caller_id),
        }
    }
}

/// Request to remove users from a group.
#[derive(Clone, Debug)]
pub struct RemoveUsersRequest {
    /// Target group.
    pub workspace_group_id: String,
    /// Owning domain.
    pub domain_id: String,
    /// Users to remove.
    pub user_ids: Vec<String>,
    /// When set, only this workspace's user count is recomputed; otherwise
    /// every workspace in the group is.
    pub workspace_id: Option<String>,
    /// Caller identity.
    pub caller: CallerContext,
}

/// Request to change one member's role.
#[derive(Clone, Debug)]
pub struct UpdateRoleRequest {
    /// Target group.
    pub workspace_group_id: String,
    /// Owning domain.
    pub domain_id: String,
    /// Member whose role changes.
    pub user_id: String,
    /// New role to grant.
    pub role_id: String,
    /// Caller identity.
    pub caller: CallerContext,
}

/// Filtered listing query for groups.
#[derive(Clone, Debug, Default)]
pub struct ListGroupsQuery {
    /// Owning domain (required).
    pub domain_id: String,
    /// Exact group id filter.
    pub workspace_group_id: Option<String>,
    /// Exact name filter.
    pub name: Option<String>,
    /// Creator filter.
    pub created_by: Option<String>,
    /// Substring keyword over id and name.
    pub keyword: Option<String>,
    /// Pagination offset.
    pub offset: Option<u32>,
    /// Pagination limit.
    pub limit: Option<u32>,
}

impl ListGroupsQuery {
    /// Query scoped to a domain with no further filters.
    #[must_use]
    pub fn in_domain(domain_id: impl Into<String>) -> Self {
        Self {
            domain_id: domain_id.into(),
            ..Self::default()
        }
    }
}

/// Equality filter used in statistics queries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatFilter {
    /// Field key.
    pub key: String,
    /// Value the field must equal.
    pub value: serde_json::Value,
}

/// Statistics query, passed through to the group store.
#[derive(Clone, Debug, Default)]
pub struct StatQuery {
    /// Owning domain (required).
    pub domain_id: String,
    /// Field to collect distinct values of.
    pub distinct: Option<String>,
    /// Equality filters applied before aggregation.
    pub filter: Vec<StatFilter>,
}

/// Aggregation result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatResult {
    /// Aggregated values.
    pub results: Vec<serde_json::Value>,
    /// Total count of aggregated values.
    pub total_count: u64,
}
