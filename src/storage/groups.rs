//! Workspace group storage trait.

use crate::error::StoreResult;
use crate::request::{ListGroupsQuery, StatQuery, StatResult};
use crate::types::WorkspaceGroup;
use async_trait::async_trait;

/// Trait for workspace group persistence.
///
/// # Example
///
/// ```rust,ignore
/// use workspace_groups::storage::GroupStore;
/// use async_trait::async_trait;
///
/// struct MyStore { db: DatabasePool }
///
/// #[async_trait]
/// impl GroupStore for MyStore {
///     async fn create_group(&self, group: &WorkspaceGroup) -> StoreResult<()> {
///         self.db.insert("workspace_group", group).await
///     }
///     // ... implement other methods
/// }
/// ```
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Persist a new group.
    async fn create_group(&self, group: &WorkspaceGroup) -> StoreResult<()>;

    /// Fetch a group by id within a domain.
    async fn get_group(
        &self,
        workspace_group_id: &str,
        domain_id: &str,
    ) -> StoreResult<Option<WorkspaceGroup>>;

    /// Replace a stored group.
    ///
    /// When `expected_version` is `Some`, the write must only apply if the
    /// stored record still carries that version, and fail with
    /// [`StoreError::Conflict`](crate::StoreError::Conflict) otherwise. The
    /// group passed in already carries the incremented version.
    async fn update_group(
        &self,
        group: &WorkspaceGroup,
        expected_version: Option<u64>,
    ) -> StoreResult<()>;

    /// Delete a group by id within a domain.
    async fn delete_group(&self, workspace_group_id: &str, domain_id: &str) -> StoreResult<()>;

    /// Filtered, paginated listing. Returns the page and the total count of
    /// matches before pagination.
    async fn list_groups(
        &self,
        query: &ListGroupsQuery,
    ) -> StoreResult<(Vec<WorkspaceGroup>, u64)>;

    /// Aggregation query over groups.
    async fn stat_groups(&self, query: &StatQuery) -> StoreResult<StatResult>;
}
