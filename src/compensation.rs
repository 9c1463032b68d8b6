//! Compensating actions for multi-step mutations.
//!
//! Role-binding fan-out is not wrapped in a cross-entity transaction: each
//! binding create/delete is an independent store call. Mutating steps push a
//! compensating action with its captured state onto an [`UndoLog`]; if a later
//! step fails, the log is unwound in reverse order to put the binding store
//! back where it started. Unwind failures are logged and skipped so the
//! remaining actions still run.

use crate::storage::RoleBindingStore;
use crate::types::RoleBinding;
use tracing::warn;

/// A single compensating action with its captured state.
#[derive(Clone, Debug)]
pub(crate) enum UndoAction {
    /// Undo a binding creation.
    DeleteBinding { role_binding_id: String },
    /// Undo a binding deletion.
    RestoreBinding { binding: RoleBinding },
}

/// Request-scoped stack of compensating actions.
#[derive(Debug, Default)]
pub(crate) struct UndoLog {
    actions: Vec<UndoAction>,
}

impl UndoLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record that a binding was created and must be deleted on unwind.
    pub(crate) fn created_binding(&mut self, role_binding_id: impl Into<String>) {
        self.actions.push(UndoAction::DeleteBinding {
            role_binding_id: role_binding_id.into(),
        });
    }

    /// Record that a binding was deleted and must be re-created on unwind.
    pub(crate) fn deleted_binding(&mut self, binding: RoleBinding) {
        self.actions.push(UndoAction::RestoreBinding { binding });
    }

    /// Number of recorded actions.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.actions.len()
    }

    /// Discard the log; applied changes stand.
    pub(crate) fn commit(self) {}

    /// Apply all compensating actions in reverse order.
    pub(crate) async fn unwind<B: RoleBindingStore>(self, bindings: &B) {
        for action in self.actions.into_iter().rev() {
            match action {
                UndoAction::DeleteBinding { role_binding_id } => {
                    if let Err(err) = bindings.delete_binding(&role_binding_id).await {
                        warn!(%role_binding_id, %err, "Failed to undo binding creation");
                    }
                }
                UndoAction::RestoreBinding { binding } => {
                    let role_binding_id = binding.role_binding_id.clone();
                    if let Err(err) = bindings.create_binding(&binding).await {
                        warn!(%role_binding_id, %err, "Failed to undo binding deletion");
                    }
                }
            }
        }
    }
}
