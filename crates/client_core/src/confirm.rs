//! Two-step gate in front of `delete_by_id`.
//!
//! `Hidden -> Confirming -> (Hidden | Deleting)`, and `Deleting` always returns to `Hidden`.
//! The only way to obtain an id to delete is [`DeleteConfirmation::confirm`] from `Confirming`.

use shared::domain::{Creator, CreatorId};
use tracing::{info, warn};

use crate::{CreatorStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePhase {
    Hidden,
    Confirming,
    Deleting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    NotConfirmed,
    Deleted(CreatorId),
    Failed(StoreError),
}

#[derive(Debug, Clone)]
pub struct DeleteConfirmation {
    target: CreatorId,
    target_name: String,
    phase: DeletePhase,
    last_error: Option<String>,
}

impl DeleteConfirmation {
    pub fn new(target: CreatorId, target_name: impl Into<String>) -> Self {
        Self {
            target,
            target_name: target_name.into(),
            phase: DeletePhase::Hidden,
            last_error: None,
        }
    }

    pub fn for_creator(creator: &Creator) -> Self {
        Self::new(creator.id, creator.name.clone())
    }

    pub fn target(&self) -> CreatorId {
        self.target
    }

    pub fn phase(&self) -> DeletePhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != DeletePhase::Hidden
    }

    /// Confirm and cancel are disabled while the delete is in flight.
    pub fn controls_enabled(&self) -> bool {
        self.phase == DeletePhase::Confirming
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn prompt(&self) -> String {
        format!("Are you sure you want to delete {}?", self.target_name)
    }

    pub fn request(&mut self) -> bool {
        if self.phase != DeletePhase::Hidden {
            return false;
        }
        self.phase = DeletePhase::Confirming;
        self.last_error = None;
        true
    }

    pub fn cancel(&mut self) -> bool {
        if self.phase != DeletePhase::Confirming {
            return false;
        }
        self.phase = DeletePhase::Hidden;
        true
    }

    /// Moves to `Deleting` and hands out the id to delete, once.
    pub fn confirm(&mut self) -> Option<CreatorId> {
        if self.phase != DeletePhase::Confirming {
            return None;
        }
        self.phase = DeletePhase::Deleting;
        Some(self.target)
    }

    pub fn finish(&mut self, result: Result<(), StoreError>) -> DeleteOutcome {
        if self.phase != DeletePhase::Deleting {
            return DeleteOutcome::NotConfirmed;
        }
        self.phase = DeletePhase::Hidden;
        match result {
            Ok(()) => {
                info!(id = self.target.0, "creator deleted");
                DeleteOutcome::Deleted(self.target)
            }
            Err(err) => {
                warn!(id = self.target.0, error = %err, "error deleting creator");
                self.last_error = Some(format!("Error deleting creator: {err}"));
                DeleteOutcome::Failed(err)
            }
        }
    }

    pub async fn confirm_and_delete(&mut self, store: &dyn CreatorStore) -> DeleteOutcome {
        let Some(id) = self.confirm() else {
            return DeleteOutcome::NotConfirmed;
        };
        let result = store.delete_by_id(id).await;
        self.finish(result)
    }
}

#[cfg(test)]
#[path = "tests/confirm_tests.rs"]
mod tests;
