//! Error types.
//!
//! Two layers, mirroring the storage/domain split: [`StoreError`] is what
//! store implementations return, [`GroupError`] is what engine operations
//! surface to callers. Store errors convert into the domain layer via
//! `#[from]`.

use crate::types::RoleType;
use thiserror::Error;

/// Errors returned by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A compare-and-swap update lost against a concurrent writer.
    #[error("Version conflict: {0}")]
    Conflict(String),

    /// Serialization failure while reading or writing a record.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend failure (connection, query, timeout).
    #[error("Database error: {0}")]
    Database(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum GroupError {
    /// Workspace group does not exist in the domain.
    #[error("Workspace group not found: {workspace_group_id}")]
    GroupNotFound {
        /// The id that was not found.
        workspace_group_id: String,
    },

    /// Workspace does not exist in the domain.
    #[error("Workspace not found: {workspace_id}")]
    WorkspaceNotFound {
        /// The id that was not found.
        workspace_id: String,
    },

    /// One or more target users are missing from the domain directory.
    #[error("Users not found in domain: {user_ids:?}")]
    UsersNotFound {
        /// The ids that did not resolve.
        user_ids: Vec<String>,
    },

    /// Target users are not members of the group.
    #[error("Users are not members of this workspace group: {user_ids:?}")]
    NotMember {
        /// The ids that are not members.
        user_ids: Vec<String>,
    },

    /// Target users are already members of the group.
    #[error("Users are already in this workspace group: {user_ids:?}")]
    AlreadyMember {
        /// The ids already present.
        user_ids: Vec<String>,
    },

    /// A role id did not resolve to an admissible role in the domain.
    #[error("Invalid role: {role_id}")]
    InvalidRole {
        /// The offending role id.
        role_id: String,
    },

    /// The resolved role type is not admissible for group membership.
    #[error("Role type {role_type} is not allowed for workspace group members")]
    NotAllowedRoleType {
        /// The rejected role type.
        role_type: RoleType,
    },

    /// The target user's directory state forbids the operation.
    #[error("User {user_id} is in state {state} and cannot be updated")]
    NotAllowedUserState {
        /// Target user.
        user_id: String,
        /// The blocking state.
        state: String,
    },

    /// Adding the users would exceed the configured member limit.
    #[error("Workspace group member limit reached ({current}/{limit})")]
    MemberLimitReached {
        /// Current member count.
        current: u32,
        /// Configured maximum.
        limit: u32,
    },

    /// The group record was changed by a concurrent writer mid-operation.
    #[error("Workspace group {workspace_group_id} was modified concurrently, retry the operation")]
    ConcurrentModification {
        /// The contested group.
        workspace_group_id: String,
    },

    /// Store-layer failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl GroupError {
    /// Create a group-not-found error.
    pub fn group_not_found(workspace_group_id: impl Into<String>) -> Self {
        Self::GroupNotFound {
            workspace_group_id: workspace_group_id.into(),
        }
    }

    /// Create a workspace-not-found error.
    pub fn workspace_not_found(workspace_id: impl Into<String>) -> Self {
        Self::WorkspaceNotFound {
            workspace_id: workspace_id.into(),
        }
    }

    /// Create a users-not-found error.
    pub fn users_not_found(user_ids: Vec<String>) -> Self {
        Self::UsersNotFound { user_ids }
    }

    /// Create an invalid-role error.
    pub fn invalid_role(role_id: impl Into<String>) -> Self {
        Self::InvalidRole {
            role_id: role_id.into(),
        }
    }

    /// Create a not-allowed-user-state error.
    pub fn not_allowed_user_state(
        user_id: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self::NotAllowedUserState {
            user_id: user_id.into(),
            state: state.into(),
        }
    }

    /// Create a concurrent-modification error.
    pub fn concurrent_modification(workspace_group_id: impl Into<String>) -> Self {
        Self::ConcurrentModification {
            workspace_group_id: workspace_group_id.into(),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, GroupError>;
