//! Domain types for workspace groups and role bindings.
//!
//! These are the records the engine keeps consistent: the group with its
//! embedded member list, the per-workspace role bindings, and the workspace
//! user counts derived from them. External collaborators (user directory,
//! role catalog, workspace inventory) are represented by lightweight
//! read-model structs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Role-type classification resolved from a role id.
///
/// Only [`RoleType::WorkspaceOwner`] and [`RoleType::WorkspaceMember`] are
/// admissible for group membership; see [`RoleType::is_group_assignable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleType {
    /// Domain-level administrator.
    DomainAdmin,
    /// Full permissions within a workspace.
    WorkspaceOwner,
    /// Regular member of a workspace.
    WorkspaceMember,
    /// Plain user with no standing grant.
    User,
}

impl RoleType {
    /// String form as stored and exchanged with collaborators.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DomainAdmin => "DOMAIN_ADMIN",
            Self::WorkspaceOwner => "WORKSPACE_OWNER",
            Self::WorkspaceMember => "WORKSPACE_MEMBER",
            Self::User => "USER",
        }
    }

    /// Whether this role type may be bound through a workspace group.
    #[must_use]
    pub fn is_group_assignable(&self) -> bool {
        matches!(self, Self::WorkspaceOwner | Self::WorkspaceMember)
    }
}

/// Error returned when parsing a role-type string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleTypeError {
    invalid_value: String,
}

impl fmt::Display for ParseRoleTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid role type: '{}'", self.invalid_value)
    }
}

impl std::error::Error for ParseRoleTypeError {}

impl FromStr for RoleType {
    type Err = ParseRoleTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DOMAIN_ADMIN" => Ok(Self::DomainAdmin),
            "WORKSPACE_OWNER" => Ok(Self::WorkspaceOwner),
            "WORKSPACE_MEMBER" => Ok(Self::WorkspaceMember),
            "USER" => Ok(Self::User),
            _ => Err(ParseRoleTypeError {
                invalid_value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a directory user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserState {
    /// Active user.
    Enabled,
    /// Administratively disabled.
    Disabled,
    /// Soft-deleted.
    Deleted,
    /// Invited but not yet activated.
    Pending,
}

impl UserState {
    /// String form as stored and exchanged with collaborators.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "ENABLED",
            Self::Disabled => "DISABLED",
            Self::Deleted => "DELETED",
            Self::Pending => "PENDING",
        }
    }

    /// Whether a member in this state may have their role changed.
    #[must_use]
    pub fn allows_role_change(&self) -> bool {
        !matches!(self, Self::Disabled | Self::Deleted)
    }
}

impl fmt::Display for UserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scope a role binding applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceGroup {
    /// Domain-wide grant.
    Domain,
    /// Single-workspace grant.
    Workspace,
}

/// A member record embedded in [`WorkspaceGroup::users`].
///
/// Carries only the persisted triple; display name and state are joined in
/// at read time (see [`EnrichedMember`]) and never stored here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberEntry {
    /// Directory user id.
    pub user_id: String,
    /// Role granted within every workspace of the group.
    pub role_id: String,
    /// Classification resolved from `role_id` at assignment time.
    pub role_type: RoleType,
}

/// Free-form tags attached to a group.
pub type Tags = HashMap<String, serde_json::Value>;

/// A named collection of workspaces sharing one membership list.
///
/// Invariant: each `user_id` appears at most once in `users`. The engine
/// enforces this on every mutation; legacy duplicates in stored data are
/// tolerated on read and collapsed by the dedup pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkspaceGroup {
    /// Unique id, domain-scoped (`wg-` prefixed).
    pub workspace_group_id: String,
    /// Display name.
    pub name: String,
    /// Free-form tags.
    pub tags: Tags,
    /// Membership list; ordered, one entry per user.
    pub users: Vec<MemberEntry>,
    /// Denormalized count of workspaces in the group.
    pub workspace_count: u32,
    /// Owning domain.
    pub domain_id: String,
    /// Caller that created the group.
    pub created_by: String,
    /// Caller of the most recent update.
    pub updated_by: Option<String>,
    /// Creation time, Unix seconds.
    pub created_at: u64,
    /// Last update time, Unix seconds.
    pub updated_at: u64,
    /// Monotonic counter used for compare-and-swap updates.
    pub version: u64,
}

impl WorkspaceGroup {
    /// Find the member entry for a user, if present.
    #[must_use]
    pub fn member(&self, user_id: &str) -> Option<&MemberEntry> {
        self.users.iter().find(|m| m.user_id == user_id)
    }

    /// Whether the user is currently a member.
    #[must_use]
    pub fn has_member(&self, user_id: &str) -> bool {
        self.member(user_id).is_some()
    }
}

/// A persisted grant of a role to a user within one workspace.
///
/// Bindings with `workspace_group_id` set are owned by this engine and must
/// not be mutated by unrelated workspace-management code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleBinding {
    /// Internal id (`rb-` prefixed).
    pub role_binding_id: String,
    /// Bound user.
    pub user_id: String,
    /// Granted role.
    pub role_id: String,
    /// Classification of the granted role.
    pub role_type: RoleType,
    /// Scope of the grant.
    pub resource_group: ResourceGroup,
    /// Set when the binding originates from a group.
    pub workspace_group_id: Option<String>,
    /// Workspace the grant applies to.
    pub workspace_id: String,
    /// Owning domain.
    pub domain_id: String,
    /// Creation time, Unix seconds.
    pub created_at: u64,
}

/// Directory record for a user, as returned by the user directory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    /// Directory user id.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Lifecycle state.
    pub state: UserState,
    /// Owning domain.
    pub domain_id: String,
}

/// Role record as returned by the role catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleRecord {
    /// Role id.
    pub role_id: String,
    /// Classification of the role.
    pub role_type: RoleType,
    /// Owning domain.
    pub domain_id: String,
}

/// Workspace record as seen by this engine.
///
/// Only `user_count` is ever written back; everything else is read-only
/// context owned by the workspace module.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkspaceRecord {
    /// Workspace id.
    pub workspace_id: String,
    /// Group the workspace belongs to, if any.
    pub workspace_group_id: Option<String>,
    /// Owning domain.
    pub domain_id: String,
    /// Distinct count of users with a role binding in the workspace.
    pub user_count: u32,
}

/// A member entry with directory name/state joined in at read time.
///
/// `user_name` and `state` are empty strings when the directory no longer
/// knows the user; directory and group state can drift and a miss is not an
/// error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMember {
    /// Directory user id.
    pub user_id: String,
    /// Role granted within the group.
    pub role_id: String,
    /// Classification of the granted role.
    pub role_type: RoleType,
    /// Display name from the directory, empty on a miss.
    pub user_name: String,
    /// Lifecycle state from the directory, empty on a miss.
    pub state: String,
}

/// Read model of a group returned to callers: group attributes plus the
/// enriched member list. Never persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnrichedGroup {
    /// Unique id, domain-scoped.
    pub workspace_group_id: String,
    /// Display name.
    pub name: String,
    /// Free-form tags.
    pub tags: Tags,
    /// Enriched membership list, in stored order.
    pub users: Vec<EnrichedMember>,
    /// Denormalized count of workspaces in the group.
    pub workspace_count: u32,
    /// Owning domain.
    pub domain_id: String,
    /// Caller that created the group.
    pub created_by: String,
    /// Caller of the most recent update.
    pub updated_by: Option<String>,
    /// Creation time, Unix seconds.
    pub created_at: u64,
    /// Last update time, Unix seconds.
    pub updated_at: u64,
}
