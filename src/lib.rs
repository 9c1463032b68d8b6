//! Workspace group membership and role-binding consistency engine.
//!
//! A workspace group is a named collection of workspaces sharing one
//! membership list; each member holds exactly one role that applies in every
//! workspace of the group. This crate keeps three otherwise-independent
//! records mutually consistent across membership changes:
//!
//! - the group's embedded member list,
//! - the per-workspace role-binding rows, and
//! - the per-workspace distinct-user counts derived from them.
//!
//! Persistence, the user directory, the role catalog and the workspace
//! inventory are external collaborators behind the traits in [`storage`];
//! the embedding application implements them for its own database layer.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use workspace_groups::{
//!     AddUsersRequest, GroupsConfig, MemberSpec, MembershipEngine,
//! };
//!
//! let engine = MembershipEngine::new(
//!     group_store,
//!     binding_store,
//!     workspace_store,
//!     directory,
//!     role_catalog,
//!     GroupsConfig::default(),
//! );
//!
//! let group = engine
//!     .add_users(AddUsersRequest::admin(
//!         "wg-1",
//!         "domain-1",
//!         vec![MemberSpec::new("u1", "role-workspace-owner")],
//!         "admin",
//!     ))
//!     .await?;
//! ```
//!
//! # Features
//!
//! - `test-groups` - In-memory stores for testing embedding applications

mod compensation;
mod config;
pub mod dedup;
mod enrich;
mod error;
mod manager;
mod membership;
mod request;
pub mod storage;
mod types;
mod utils;


// Configuration exports
pub use config::GroupsConfig;

// Error exports
pub use error::{GroupError, Result, StoreError, StoreResult};

// Manager exports
pub use manager::GroupManager;
pub use membership::MembershipEngine;

// Request exports
pub use request::{
    AddUsersRequest, CallerContext, CreateGroupRequest, ListGroupsQuery, MemberSpec,
    RemoveUsersRequest, StatFilter, StatQuery, StatResult, UpdateGroupRequest, UpdateRoleRequest,
};

// Type exports
pub use types::{
    EnrichedGroup, EnrichedMember, MemberEntry, ParseRoleTypeError, ResourceGroup, RoleBinding,
    RoleRecord, RoleType, Tags, UserProfile, UserState, WorkspaceGroup, WorkspaceRecord,
};

// Test exports
#[cfg(any(test, feature = "test-groups"))]
pub use test::InMemoryIdentityStore;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging with sensible defaults.
///
/// Call early in your application, before the engine handles requests.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "workspace_groups=debug")
/// - `WORKSPACE_GROUPS_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("WORKSPACE_GROUPS_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
