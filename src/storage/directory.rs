//! User directory lookup trait.

use crate::error::StoreResult;
use crate::types::UserProfile;
use async_trait::async_trait;

/// Trait for resolving user ids against the domain's user directory.
///
/// The directory is owned by the surrounding identity service; this engine
/// only reads existence, state and display name from it.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Batch-resolve user ids within a domain.
    ///
    /// Unknown ids are simply absent from the result; the caller decides
    /// whether a miss is an error.
    async fn filter_users(
        &self,
        user_ids: &[String],
        domain_id: &str,
    ) -> StoreResult<Vec<UserProfile>>;

    /// Resolve a single user within a domain.
    async fn get_user(&self, user_id: &str, domain_id: &str)
        -> StoreResult<Option<UserProfile>>;
}
