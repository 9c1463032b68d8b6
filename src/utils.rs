//! Internal utilities.

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Get current Unix timestamp in seconds.
#[inline]
pub(crate) fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}

/// Generate a workspace group id.
#[inline]
pub(crate) fn new_group_id() -> String {
    format!("wg-{}", Uuid::new_v4().simple())
}

/// Generate a role binding id.
#[inline]
pub(crate) fn new_binding_id() -> String {
    format!("rb-{}", Uuid::new_v4().simple())
}
