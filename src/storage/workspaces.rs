//! Workspace inventory trait.

use crate::error::StoreResult;
use crate::types::WorkspaceRecord;
use async_trait::async_trait;

/// Trait for reading a group's workspaces and writing back derived counts.
///
/// Workspace lifecycle (create, attach, detach) belongs to the workspace
/// module; this engine only enumerates fan-out targets and maintains
/// `user_count`.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// List the workspaces currently belonging to a group.
    async fn list_group_workspaces(
        &self,
        workspace_group_id: &str,
        domain_id: &str,
    ) -> StoreResult<Vec<WorkspaceRecord>>;

    /// Fetch a single workspace.
    async fn get_workspace(
        &self,
        workspace_id: &str,
        domain_id: &str,
    ) -> StoreResult<Option<WorkspaceRecord>>;

    /// Write back the derived distinct-user count.
    async fn update_user_count(
        &self,
        workspace_id: &str,
        domain_id: &str,
        user_count: u32,
    ) -> StoreResult<()>;
}
