//! Page state and the transitions driven by backend events.
//!
//! Nothing here touches egui; the UI reads the current [`Page`] and feeds user intents and
//! [`UiEvent`]s back in.

use client_core::{
    DeleteConfirmation, DeleteOutcome, DetailView, EditView, FormController, ListView,
    LoadToken, Route, StoreError, SubmitOutcome, SubmitRejection,
};
use shared::domain::CreatorId;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiErrorContext, UiEvent},
};

#[derive(Debug, Clone)]
pub struct NewPage {
    pub token: LoadToken,
    pub form: FormController,
}

#[derive(Debug, Clone)]
pub enum Page {
    List(ListView),
    New(NewPage),
    Detail(DetailView),
    Edit(EditView),
}

impl Page {
    pub fn token(&self) -> LoadToken {
        match self {
            Self::List(view) => view.token(),
            Self::New(page) => page.token,
            Self::Detail(view) => view.token(),
            Self::Edit(view) => view.token(),
        }
    }

    pub fn form(&self) -> Option<&FormController> {
        match self {
            Self::New(page) => Some(&page.form),
            Self::Edit(view) => Some(view.form()),
            Self::List(_) | Self::Detail(_) => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut FormController> {
        match self {
            Self::New(page) => Some(&mut page.form),
            Self::Edit(view) => Some(view.form_mut()),
            Self::List(_) | Self::Detail(_) => None,
        }
    }

    /// The delete gate for `id`, if this page shows one.
    pub fn delete_flow_mut(&mut self, id: CreatorId) -> Option<&mut DeleteConfirmation> {
        let flow = match self {
            Self::List(view) => return view.card_mut(id).map(|card| &mut card.delete),
            Self::Detail(view) => view.delete_flow_mut(),
            Self::Edit(view) => view.delete_flow_mut(),
            Self::New(_) => None,
        };
        flow.filter(|flow| flow.target() == id)
    }
}

/// What the shell should do after a transition.
#[derive(Debug, Clone)]
pub enum Effect {
    None,
    Navigate(Route),
    Notice(String),
    Failure(UiError),
}

#[derive(Debug, Clone)]
pub struct PageState {
    route: Route,
    page: Page,
}

impl PageState {
    /// Mounts the page for `route` and returns the command that loads it.
    pub fn open(route: Route) -> (Self, Option<BackendCommand>) {
        let (page, load) = mount(route);
        (Self { route, page }, load)
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    /// Replaces the current page. Anything still in flight for the old one is dropped on arrival.
    pub fn navigate(&mut self, route: Route) -> Option<BackendCommand> {
        let (page, load) = mount(route);
        tracing::debug!(from = %self.route, to = %route, "navigating");
        self.route = route;
        self.page = page;
        load
    }

    pub fn reload(&mut self) -> Option<BackendCommand> {
        self.navigate(self.route)
    }

    pub fn submit(&mut self) -> Option<BackendCommand> {
        let token = self.page.token();
        let form = self.page.form_mut()?;
        match form.begin_submit() {
            Ok(request) => Some(match request.mode {
                client_core::FormMode::Create => BackendCommand::Insert {
                    token,
                    record: request.record,
                },
                client_core::FormMode::Edit(id) => BackendCommand::Update {
                    token,
                    id,
                    record: request.record,
                },
            }),
            Err(SubmitRejection::Invalid(violations)) => {
                tracing::debug!(count = violations.len(), "draft rejected before submit");
                None
            }
            Err(SubmitRejection::InFlight | SubmitRejection::NotEditable) => None,
        }
    }

    pub fn confirm_delete(&mut self, id: CreatorId) -> Option<BackendCommand> {
        let token = self.page.token();
        let id = self.page.delete_flow_mut(id)?.confirm()?;
        Some(BackendCommand::Delete { token, id })
    }

    pub fn apply(&mut self, event: UiEvent) -> Effect {
        match event {
            UiEvent::Info(message) => Effect::Notice(message),
            UiEvent::Error(err) => Effect::Failure(err),
            UiEvent::ListLoaded { token, result } => {
                let Page::List(view) = &mut self.page else {
                    return Effect::None;
                };
                let failure = result
                    .as_ref()
                    .err()
                    .map(|err| UiError::from_store_error(UiErrorContext::LoadList, err));
                match (view.apply_loaded(token, result), failure) {
                    (true, Some(err)) => Effect::Failure(err),
                    _ => Effect::None,
                }
            }
            UiEvent::CreatorLoaded { token, result } => {
                let failure = result
                    .as_ref()
                    .err()
                    .filter(|err| !err.is_not_found())
                    .map(|err| UiError::from_store_error(UiErrorContext::LoadCreator, err));
                let applied = match &mut self.page {
                    Page::Detail(view) => view.apply_loaded(token, result),
                    Page::Edit(view) => view.apply_loaded(token, result),
                    Page::List(_) | Page::New(_) => false,
                };
                match (applied, failure) {
                    (true, Some(err)) => Effect::Failure(err),
                    _ => Effect::None,
                }
            }
            UiEvent::Saved { token, result } => {
                if token != self.page.token() {
                    tracing::debug!(?token, "dropping save result for a page no longer shown");
                    return Effect::None;
                }
                let Some(form) = self.page.form_mut() else {
                    return Effect::None;
                };
                match form.finish_submit(result) {
                    SubmitOutcome::Saved { next, .. } => Effect::Navigate(next),
                    SubmitOutcome::Failed(err) => {
                        Effect::Failure(UiError::from_store_error(UiErrorContext::Save, &err))
                    }
                    SubmitOutcome::Ignored | SubmitOutcome::Invalid(_) => Effect::None,
                }
            }
            UiEvent::Deleted { token, id, result } => {
                if token != self.page.token() {
                    tracing::debug!(?token, id = id.0, "dropping delete result for a page no longer shown");
                    return Effect::None;
                }
                let Some(flow) = self.page.delete_flow_mut(id) else {
                    return Effect::None;
                };
                match flow.finish(result) {
                    DeleteOutcome::Deleted(id) => match &mut self.page {
                        Page::List(view) => {
                            let name = view.remove(id).map(|creator| creator.name);
                            Effect::Notice(format!("Deleted {}", name.unwrap_or_default()))
                        }
                        _ => Effect::Navigate(Route::List),
                    },
                    DeleteOutcome::Failed(err) => {
                        Effect::Failure(UiError::from_store_error(UiErrorContext::Delete, &err))
                    }
                    DeleteOutcome::NotConfirmed => Effect::None,
                }
            }
            UiEvent::ImageLoaded { .. } | UiEvent::ImageFailed { .. } => Effect::None,
        }
    }
}

/// The event a command would have produced had the backend failed it; used when it never got queued.
pub fn undelivered(cmd: BackendCommand, reason: &str) -> UiEvent {
    let err = StoreError::backend(reason);
    match cmd {
        BackendCommand::LoadAll { token } => UiEvent::ListLoaded {
            token,
            result: Err(err),
        },
        BackendCommand::LoadOne { token, .. } => UiEvent::CreatorLoaded {
            token,
            result: Err(err),
        },
        BackendCommand::Insert { token, .. } | BackendCommand::Update { token, .. } => {
            UiEvent::Saved {
                token,
                result: Err(err),
            }
        }
        BackendCommand::Delete { token, id } => UiEvent::Deleted {
            token,
            id,
            result: Err(err),
        },
        BackendCommand::FetchImage { url } => UiEvent::ImageFailed {
            url,
            reason: reason.to_string(),
        },
    }
}

fn mount(route: Route) -> (Page, Option<BackendCommand>) {
    match route {
        Route::List => {
            let view = ListView::mount();
            let token = view.token();
            (Page::List(view), Some(BackendCommand::LoadAll { token }))
        }
        Route::New => (
            Page::New(NewPage {
                token: LoadToken::next(),
                form: FormController::create(),
            }),
            None,
        ),
        Route::Detail(id) => {
            let view = DetailView::mount(id);
            let token = view.token();
            (Page::Detail(view), Some(BackendCommand::LoadOne { token, id }))
        }
        Route::Edit(id) => {
            let view = EditView::mount(id);
            let token = view.token();
            (Page::Edit(view), Some(BackendCommand::LoadOne { token, id }))
        }
    }
}
