//! Load state of the list, detail and edit pages.
//!
//! Every mount draws a fresh [`LoadToken`]. A result carrying any other token belongs to a
//! page the user already left and is dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use shared::domain::{Creator, CreatorId};
use tracing::{debug, warn};

use crate::{confirm::DeleteConfirmation, form::FormController, CreatorStore, StoreError};

static NEXT_LOAD_TOKEN: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadToken(u64);

impl LoadToken {
    pub fn next() -> Self {
        Self(NEXT_LOAD_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    NotFound,
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn from_result(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(StoreError::NotFound { .. }) => Self::NotFound,
            Err(err) => Self::Failed(err.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatorCard {
    pub creator: Creator,
    pub delete: DeleteConfirmation,
}

impl CreatorCard {
    pub fn new(creator: Creator) -> Self {
        let delete = DeleteConfirmation::for_creator(&creator);
        Self { creator, delete }
    }
}

#[derive(Debug, Clone)]
pub struct ListView {
    token: LoadToken,
    state: LoadState<Vec<CreatorCard>>,
}

impl ListView {
    pub fn mount() -> Self {
        Self {
            token: LoadToken::next(),
            state: LoadState::Loading,
        }
    }

    pub fn token(&self) -> LoadToken {
        self.token
    }

    pub fn state(&self) -> &LoadState<Vec<CreatorCard>> {
        &self.state
    }

    /// Starts over with a new token; results of the previous load will be dropped.
    pub fn reload(&mut self) -> LoadToken {
        self.token = LoadToken::next();
        self.state = LoadState::Loading;
        self.token
    }

    pub fn apply_loaded(&mut self, token: LoadToken, result: Result<Vec<Creator>, StoreError>) -> bool {
        if token != self.token {
            debug!(?token, "dropping stale creator list");
            return false;
        }
        self.state = match result {
            Ok(mut creators) => {
                creators.sort_by_key(|creator| creator.id);
                LoadState::Ready(creators.into_iter().map(CreatorCard::new).collect())
            }
            Err(err) => {
                warn!(error = %err, "error loading creators");
                LoadState::Failed(format!("Error loading creators: {err}"))
            }
        };
        true
    }

    pub fn is_empty_state(&self) -> bool {
        matches!(&self.state, LoadState::Ready(cards) if cards.is_empty())
    }

    pub fn cards(&self) -> &[CreatorCard] {
        match &self.state {
            LoadState::Ready(cards) => cards,
            _ => &[],
        }
    }

    pub fn card_mut(&mut self, id: CreatorId) -> Option<&mut CreatorCard> {
        match &mut self.state {
            LoadState::Ready(cards) => cards.iter_mut().find(|card| card.creator.id == id),
            _ => None,
        }
    }

    /// Drops one card after its delete went through, keeping the rest as loaded.
    pub fn remove(&mut self, id: CreatorId) -> Option<Creator> {
        let LoadState::Ready(cards) = &mut self.state else {
            return None;
        };
        let index = cards.iter().position(|card| card.creator.id == id)?;
        Some(cards.remove(index).creator)
    }

    pub async fn load(&mut self, store: &dyn CreatorStore) {
        let token = self.token;
        let result = store.list_all().await;
        self.apply_loaded(token, result);
    }
}

#[derive(Debug, Clone)]
pub struct DetailView {
    id: CreatorId,
    token: LoadToken,
    state: LoadState<Creator>,
    delete: Option<DeleteConfirmation>,
}

impl DetailView {
    pub fn mount(id: CreatorId) -> Self {
        Self {
            id,
            token: LoadToken::next(),
            state: LoadState::Loading,
            delete: None,
        }
    }

    pub fn id(&self) -> CreatorId {
        self.id
    }

    pub fn token(&self) -> LoadToken {
        self.token
    }

    pub fn state(&self) -> &LoadState<Creator> {
        &self.state
    }

    pub fn creator(&self) -> Option<&Creator> {
        self.state.ready()
    }

    pub fn delete_flow(&self) -> Option<&DeleteConfirmation> {
        self.delete.as_ref()
    }

    pub fn delete_flow_mut(&mut self) -> Option<&mut DeleteConfirmation> {
        self.delete.as_mut()
    }

    pub fn apply_loaded(&mut self, token: LoadToken, result: Result<Creator, StoreError>) -> bool {
        if token != self.token {
            debug!(?token, id = self.id.0, "dropping stale creator detail");
            return false;
        }
        if let Err(err) = &result {
            if !err.is_not_found() {
                warn!(id = self.id.0, error = %err, "error loading creator");
            }
        }
        self.state = LoadState::from_result(result);
        self.delete = self.state.ready().map(DeleteConfirmation::for_creator);
        true
    }

    pub async fn load(&mut self, store: &dyn CreatorStore) {
        let token = self.token;
        let result = store.get_by_id(self.id).await;
        self.apply_loaded(token, result);
    }
}

/// Edit page: a form that stays blocked until the record arrives, plus its delete gate.
#[derive(Debug, Clone)]
pub struct EditView {
    id: CreatorId,
    token: LoadToken,
    form: FormController,
    delete: Option<DeleteConfirmation>,
}

impl EditView {
    pub fn mount(id: CreatorId) -> Self {
        Self {
            id,
            token: LoadToken::next(),
            form: FormController::edit(id),
            delete: None,
        }
    }

    pub fn id(&self) -> CreatorId {
        self.id
    }

    pub fn token(&self) -> LoadToken {
        self.token
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    pub fn delete_flow(&self) -> Option<&DeleteConfirmation> {
        self.delete.as_ref()
    }

    pub fn delete_flow_mut(&mut self) -> Option<&mut DeleteConfirmation> {
        self.delete.as_mut()
    }

    pub fn apply_loaded(&mut self, token: LoadToken, result: Result<Creator, StoreError>) -> bool {
        if token != self.token {
            debug!(?token, id = self.id.0, "dropping stale creator for edit");
            return false;
        }
        match result {
            Ok(creator) => {
                self.form.load_initial(&creator);
                self.delete = Some(DeleteConfirmation::for_creator(&creator));
            }
            Err(err) => self.form.load_failed(&err),
        }
        true
    }

    pub async fn load(&mut self, store: &dyn CreatorStore) {
        let token = self.token;
        let result = store.get_by_id(self.id).await;
        self.apply_loaded(token, result);
    }
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
