//! Draft state for the create and edit forms.

use shared::{
    domain::{Creator, CreatorId},
    schema::{CreatorDraft, CreatorField, CreatorRecord, FieldViolation},
};
use tracing::{debug, warn};

use crate::{route::Route, CreatorStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(CreatorId),
}

impl FormMode {
    /// Where to go once a submit succeeded.
    pub fn success_route(self, saved: &Creator) -> Route {
        match self {
            Self::Create => Route::List,
            Self::Edit(_) => Route::Detail(saved.id),
        }
    }

    fn action(self) -> &'static str {
        match self {
            Self::Create => "adding",
            Self::Edit(_) => "updating",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    /// Edit data not fetched yet; input is blocked.
    Loading,
    LoadFailed(String),
    Idle,
    Submitting,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejection {
    InFlight,
    NotEditable,
    Invalid(Vec<FieldViolation>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub mode: FormMode,
    pub record: CreatorRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored,
    Invalid(Vec<FieldViolation>),
    Saved { creator: Creator, next: Route },
    Failed(StoreError),
}

#[derive(Debug, Clone)]
pub struct FormController {
    mode: FormMode,
    phase: FormPhase,
    draft: CreatorDraft,
    baseline: CreatorDraft,
    violations: Vec<FieldViolation>,
    last_error: Option<String>,
}

impl FormController {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            phase: FormPhase::Idle,
            draft: CreatorDraft::empty(),
            baseline: CreatorDraft::empty(),
            violations: Vec::new(),
            last_error: None,
        }
    }

    pub fn edit(id: CreatorId) -> Self {
        Self {
            mode: FormMode::Edit(id),
            phase: FormPhase::Loading,
            ..Self::create()
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn draft(&self) -> &CreatorDraft {
        &self.draft
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn violation_for(&self, field: CreatorField) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field == field)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_editable(&self) -> bool {
        self.phase == FormPhase::Idle
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.baseline
    }

    /// Seeds an edit form. Ignored for other ids, for create forms, and once input is open.
    pub fn load_initial(&mut self, creator: &Creator) -> bool {
        let FormMode::Edit(id) = self.mode else {
            return false;
        };
        if creator.id != id || !matches!(self.phase, FormPhase::Loading | FormPhase::LoadFailed(_)) {
            return false;
        }
        self.draft = CreatorDraft::from(creator);
        self.baseline = self.draft.clone();
        self.phase = FormPhase::Idle;
        true
    }

    pub fn load_failed(&mut self, err: &StoreError) {
        if !matches!(self.phase, FormPhase::Loading) {
            return;
        }
        warn!(mode = ?self.mode, error = %err, "error loading creator for edit");
        let message = match err {
            StoreError::NotFound { .. } => "Creator not found.".to_string(),
            other => format!("Error loading creator: {other}"),
        };
        self.phase = FormPhase::LoadFailed(message);
    }

    /// Returns whether the value was taken; input is refused outside `Idle`.
    pub fn set_field(&mut self, field: CreatorField, value: impl Into<String>) -> bool {
        if !self.is_editable() {
            return false;
        }
        self.draft.set(field, value);
        self.violations.retain(|v| v.field != field);
        true
    }

    pub fn begin_submit(&mut self) -> Result<SubmitRequest, SubmitRejection> {
        match self.phase {
            FormPhase::Submitting => return Err(SubmitRejection::InFlight),
            FormPhase::Idle => {}
            _ => return Err(SubmitRejection::NotEditable),
        }
        if let Err(violations) = self.draft.validate() {
            self.violations = violations.clone();
            return Err(SubmitRejection::Invalid(violations));
        }
        self.violations.clear();
        self.last_error = None;
        self.phase = FormPhase::Submitting;
        Ok(SubmitRequest {
            mode: self.mode,
            record: self.draft.to_record(),
        })
    }

    /// Failure returns to `Idle` with the draft untouched so the user can retry.
    pub fn finish_submit(&mut self, result: Result<Creator, StoreError>) -> SubmitOutcome {
        if self.phase != FormPhase::Submitting {
            debug!(mode = ?self.mode, "dropping submit result for a form that is not submitting");
            return SubmitOutcome::Ignored;
        }
        match result {
            Ok(creator) => {
                self.phase = FormPhase::Completed;
                self.baseline = self.draft.clone();
                let next = self.mode.success_route(&creator);
                SubmitOutcome::Saved { creator, next }
            }
            Err(err) => {
                warn!(mode = ?self.mode, error = %err, "error {} creator", self.mode.action());
                self.phase = FormPhase::Idle;
                self.last_error = Some(format!(
                    "Error {} creator. Please try again. ({err})",
                    self.mode.action()
                ));
                SubmitOutcome::Failed(err)
            }
        }
    }

    pub async fn submit(&mut self, store: &dyn CreatorStore) -> SubmitOutcome {
        let request = match self.begin_submit() {
            Ok(request) => request,
            Err(SubmitRejection::Invalid(violations)) => return SubmitOutcome::Invalid(violations),
            Err(SubmitRejection::InFlight | SubmitRejection::NotEditable) => {
                return SubmitOutcome::Ignored
            }
        };
        let result = match request.mode {
            FormMode::Create => store.insert(&request.record).await,
            FormMode::Edit(id) => store.update(id, &request.record).await,
        };
        self.finish_submit(result)
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
