//! Role catalog lookup trait.

use crate::error::StoreResult;
use crate::types::{RoleRecord, RoleType};
use async_trait::async_trait;

/// Trait for resolving role ids against the domain's role catalog.
#[async_trait]
pub trait RoleCatalog: Send + Sync {
    /// Batch-resolve role ids within a domain.
    ///
    /// When `role_types` is non-empty, only roles of those types are
    /// returned. Unknown ids are simply absent from the result.
    async fn filter_roles(
        &self,
        role_ids: &[String],
        domain_id: &str,
        role_types: &[RoleType],
    ) -> StoreResult<Vec<RoleRecord>>;
}
