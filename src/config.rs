//! Engine configuration.

/// Configuration for the workspace-group engine.
///
/// # Example
///
/// ```rust
/// use workspace_groups::GroupsConfig;
///
/// let config = GroupsConfig::new()
///     .optimistic_locking(true)
///     .max_members_per_group(Some(500));
/// ```
#[derive(Clone, Debug)]
pub struct GroupsConfig {
    /// Guard group updates with a version compare-and-swap.
    ///
    /// When enabled, a membership write that races with another writer fails
    /// with `ConcurrentModification` instead of silently clobbering the other
    /// write. Disable only for stores that cannot implement the version check.
    pub optimistic_locking: bool,

    /// Maximum members per group (None = unlimited).
    pub max_members_per_group: Option<u32>,
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            optimistic_locking: true,
            max_members_per_group: None,
        }
    }
}

impl GroupsConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether group updates use the version compare-and-swap guard.
    #[must_use]
    pub fn optimistic_locking(mut self, enabled: bool) -> Self {
        self.optimistic_locking = enabled;
        self
    }

    /// Set the maximum members per group.
    #[must_use]
    pub fn max_members_per_group(mut self, max: Option<u32>) -> Self {
        self.max_members_per_group = max;
        self
    }
}
