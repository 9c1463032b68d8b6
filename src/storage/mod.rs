//! Storage traits for the engine's external collaborators.
//!
//! Persistence, the user directory, the role catalog and the workspace
//! inventory are all behind these traits; the embedding application
//! implements them for its database and services.

mod bindings;
mod directory;
mod groups;
mod roles;
mod workspaces;

pub use bindings::{RoleBindingFilter, RoleBindingStore};
pub use directory::UserDirectory;
pub use groups::GroupStore;
pub use roles::RoleCatalog;
pub use workspaces::WorkspaceStore;
