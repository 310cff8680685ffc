use std::{collections::HashMap, time::Duration};

use client_core::{
    CreatorCard, DeleteConfirmation, DeletePhase, DetailView, EditView, FormController, FormMode,
    FormPhase, ListView, LoadState, Route,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use shared::{
    domain::{Creator, CreatorId},
    schema::CreatorField,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{PreviewImage, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{undelivered, Effect, Page, PageState};

const CARD_IMAGE_EDGE: f32 = 96.0;
const DETAIL_IMAGE_EDGE: f32 = 240.0;

enum ImageSlot {
    Pending,
    Ready(TextureHandle),
    Failed,
}

/// User intents collected while drawing a frame and applied once drawing is done.
#[derive(Debug, Clone, PartialEq)]
enum UiAction {
    Navigate(Route),
    Reload,
    SetField(CreatorField, String),
    Submit,
    RequestDelete(CreatorId),
    CancelDelete(CreatorId),
    ConfirmDelete(CreatorId),
    FetchImage(String),
}

struct StatusBanner {
    message: String,
}

pub struct CreatorverseApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    pages: PageState,
    images: HashMap<String, ImageSlot>,
    status: String,
    status_banner: Option<StatusBanner>,
}

impl CreatorverseApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, start: Route) -> Self {
        let (pages, load) = PageState::open(start);
        let mut app = Self {
            cmd_tx,
            ui_rx,
            pages,
            images: HashMap::new(),
            status: String::new(),
            status_banner: None,
        };
        if let Some(cmd) = load {
            app.queue(cmd);
        }
        app
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::ImageLoaded { url, image } => {
                    let texture = upload_texture(ctx, &url, &image);
                    self.images.insert(url, ImageSlot::Ready(texture));
                }
                UiEvent::ImageFailed { url, .. } => {
                    self.images.insert(url, ImageSlot::Failed);
                }
                other => {
                    let effect = self.pages.apply(other);
                    self.apply_effect(effect);
                }
            }
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Navigate(route) => self.navigate(route),
            Effect::Notice(message) => self.status = message,
            Effect::Failure(err) => {
                tracing::warn!(context = ?err.context(), category = ?err.category(), "{}", err.message());
                self.status = err.summary();
                self.status_banner = Some(StatusBanner {
                    message: self.status.clone(),
                });
            }
        }
    }

    fn navigate(&mut self, route: Route) {
        self.status_banner = None;
        if let Some(cmd) = self.pages.navigate(route) {
            self.queue(cmd);
        }
    }

    fn queue(&mut self, cmd: BackendCommand) {
        if dispatch_backend_command(&self.cmd_tx, cmd.clone(), &mut self.status) {
            return;
        }
        let reason = self.status.clone();
        match undelivered(cmd, &reason) {
            UiEvent::ImageFailed { url, .. } => {
                self.images.insert(url, ImageSlot::Failed);
            }
            event => {
                let effect = self.pages.apply(event);
                self.apply_effect(effect);
            }
        }
    }

    fn apply_actions(&mut self, actions: Vec<UiAction>) {
        for action in actions {
            match action {
                UiAction::Navigate(route) => self.navigate(route),
                UiAction::Reload => {
                    self.status_banner = None;
                    if let Some(cmd) = self.pages.reload() {
                        self.queue(cmd);
                    }
                }
                UiAction::SetField(field, value) => {
                    if let Some(form) = self.pages.page_mut().form_mut() {
                        form.set_field(field, value);
                    }
                }
                UiAction::Submit => {
                    if let Some(cmd) = self.pages.submit() {
                        self.status = "Saving...".to_string();
                        self.queue(cmd);
                    }
                }
                UiAction::RequestDelete(id) => {
                    if let Some(flow) = self.pages.page_mut().delete_flow_mut(id) {
                        flow.request();
                    }
                }
                UiAction::CancelDelete(id) => {
                    if let Some(flow) = self.pages.page_mut().delete_flow_mut(id) {
                        flow.cancel();
                    }
                }
                UiAction::ConfirmDelete(id) => {
                    if let Some(cmd) = self.pages.confirm_delete(id) {
                        self.queue(cmd);
                    }
                }
                UiAction::FetchImage(url) => {
                    if !self.images.contains_key(&url) {
                        self.images.insert(url.clone(), ImageSlot::Pending);
                        self.queue(BackendCommand::FetchImage { url });
                    }
                }
            }
        }
    }

    fn show_top_bar(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let route = self.pages.route();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Creatorverse");
                ui.separator();
                if ui
                    .selectable_label(route == Route::List, "View All Creators")
                    .clicked()
                {
                    actions.push(UiAction::Navigate(Route::List));
                }
                if ui
                    .selectable_label(route == Route::New, "Add a Creator")
                    .clicked()
                {
                    actions.push(UiAction::Navigate(Route::New));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(route.path());
                });
            });
            ui.add_space(4.0);
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            if let Some(banner) = &self.status_banner {
                let mut dismissed = false;
                egui::Frame::NONE
                    .fill(egui::Color32::from_rgb(111, 53, 53))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(10, 8))
                    .show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(
                                egui::RichText::new(&banner.message).color(egui::Color32::WHITE),
                            );
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                dismissed = ui.button("Dismiss").clicked();
                            });
                        });
                    });
                if dismissed {
                    self.status_banner = None;
                }
            } else {
                ui.small(&self.status);
            }
        });
    }

    fn show_page(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        match self.pages.page() {
            Page::List(view) => self.show_list(ui, view, actions),
            Page::New(page) => {
                ui.heading("Add a Creator");
                ui.add_space(8.0);
                show_form(ui, &page.form, actions);
            }
            Page::Detail(view) => self.show_detail(ui, view, actions),
            Page::Edit(view) => show_edit(ui, view, actions),
        }
    }

    fn show_list(&self, ui: &mut egui::Ui, view: &ListView, actions: &mut Vec<UiAction>) {
        match view.state() {
            LoadState::Loading => loading(ui, "Loading creators..."),
            LoadState::Failed(message) => failed(ui, message, actions),
            LoadState::NotFound => failed(ui, "Creators table not found.", actions),
            LoadState::Ready(_) if view.is_empty_state() => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.heading("No creators yet");
                    ui.weak("Add the people whose content you love.");
                    ui.add_space(8.0);
                    if ui.button("Add a Creator").clicked() {
                        actions.push(UiAction::Navigate(Route::New));
                    }
                });
            }
            LoadState::Ready(cards) => {
                for card in cards {
                    self.show_card(ui, card, actions);
                    ui.add_space(10.0);
                }
            }
        }
    }

    fn show_card(&self, ui: &mut egui::Ui, card: &CreatorCard, actions: &mut Vec<UiAction>) {
        let creator = &card.creator;
        egui::Frame::group(ui.style())
            .corner_radius(10.0)
            .inner_margin(egui::Margin::symmetric(14, 12))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    self.show_creator_image(ui, creator, CARD_IMAGE_EDGE, actions);
                    ui.vertical(|ui| {
                        creator_heading(ui, creator);
                        ui.hyperlink_to(&creator.url, &creator.url);
                        ui.label(&creator.description);
                        ui.add_space(4.0);
                        ui.horizontal(|ui| {
                            if ui.button("View").clicked() {
                                actions.push(UiAction::Navigate(Route::Detail(creator.id)));
                            }
                            if ui.button("Edit").clicked() {
                                actions.push(UiAction::Navigate(Route::Edit(creator.id)));
                            }
                            delete_button(ui, &card.delete, actions);
                        });
                        delete_error(ui, &card.delete);
                    });
                });
            });
        show_delete_dialog(ui.ctx(), &card.delete, actions);
    }

    fn show_detail(&self, ui: &mut egui::Ui, view: &DetailView, actions: &mut Vec<UiAction>) {
        match view.state() {
            LoadState::Loading => loading(ui, "Loading creator..."),
            LoadState::NotFound => not_found(ui, view.id(), actions),
            LoadState::Failed(message) => failed(ui, message, actions),
            LoadState::Ready(creator) => {
                ui.horizontal(|ui| {
                    self.show_creator_image(ui, creator, DETAIL_IMAGE_EDGE, actions);
                    ui.vertical(|ui| {
                        creator_heading(ui, creator);
                        ui.hyperlink_to(&creator.url, &creator.url);
                        if let Some(created_at) = creator.created_at {
                            ui.weak(format!("Added {}", created_at.format("%Y-%m-%d")));
                        }
                    });
                });
                ui.add_space(10.0);
                ui.label(&creator.description);
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if ui.button("Edit").clicked() {
                        actions.push(UiAction::Navigate(Route::Edit(creator.id)));
                    }
                    if let Some(flow) = view.delete_flow() {
                        delete_button(ui, flow, actions);
                    }
                    if ui.button("Back to all creators").clicked() {
                        actions.push(UiAction::Navigate(Route::List));
                    }
                });
                if let Some(flow) = view.delete_flow() {
                    delete_error(ui, flow);
                    show_delete_dialog(ui.ctx(), flow, actions);
                }
            }
        }
    }

    fn show_creator_image(
        &self,
        ui: &mut egui::Ui,
        creator: &Creator,
        edge: f32,
        actions: &mut Vec<UiAction>,
    ) {
        let size = egui::vec2(edge, edge);
        let Some(url) = creator.image_url.as_deref().filter(|_| creator.has_image()) else {
            platform_badge(ui, creator, size);
            return;
        };
        match self.images.get(url) {
            Some(ImageSlot::Ready(texture)) => {
                ui.add(
                    egui::Image::from_texture(egui::load::SizedTexture::from_handle(texture))
                        .max_size(size),
                );
            }
            Some(ImageSlot::Pending) => {
                ui.allocate_ui(size, |ui| {
                    ui.centered_and_justified(|ui| ui.spinner());
                });
            }
            Some(ImageSlot::Failed) => platform_badge(ui, creator, size),
            None => {
                actions.push(UiAction::FetchImage(url.to_string()));
                ui.allocate_ui(size, |ui| {
                    ui.centered_and_justified(|ui| ui.spinner());
                });
            }
        }
    }
}

impl eframe::App for CreatorverseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);

        let mut actions = Vec::new();
        self.show_top_bar(ctx, &mut actions);
        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| self.show_page(ui, &mut actions));
        });
        self.apply_actions(actions);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn show_edit(ui: &mut egui::Ui, view: &EditView, actions: &mut Vec<UiAction>) {
    let form = view.form();
    match form.phase() {
        FormPhase::Loading => loading(ui, "Loading creator..."),
        FormPhase::LoadFailed(message) => {
            ui.label(message);
            if ui.button("Back to all creators").clicked() {
                actions.push(UiAction::Navigate(Route::List));
            }
        }
        FormPhase::Idle | FormPhase::Submitting | FormPhase::Completed => {
            ui.heading(format!("Edit {}", form.draft().name));
            ui.add_space(8.0);
            show_form(ui, form, actions);
            if let Some(flow) = view.delete_flow() {
                ui.add_space(16.0);
                ui.separator();
                delete_button(ui, flow, actions);
                delete_error(ui, flow);
                show_delete_dialog(ui.ctx(), flow, actions);
            }
        }
    }
}

fn field_caption(field: CreatorField) -> String {
    if field.is_required() {
        format!("{} *", field.label())
    } else {
        format!("{} (optional)", field.label())
    }
}

fn show_form(ui: &mut egui::Ui, form: &FormController, actions: &mut Vec<UiAction>) {
    let editable = form.is_editable();
    for field in CreatorField::ALL {
        ui.label(egui::RichText::new(field_caption(field)).strong());

        let mut value = form.draft().get(field).to_string();
        let edit = if field.is_multiline() {
            egui::TextEdit::multiline(&mut value).desired_rows(4)
        } else {
            egui::TextEdit::singleline(&mut value)
        }
        .id_salt(field.wire_name())
        .hint_text(field_hint(field))
        .desired_width(f32::INFINITY);
        if ui.add_enabled(editable, edit).changed() {
            actions.push(UiAction::SetField(field, value));
        }
        if let Some(violation) = form.violation_for(field) {
            ui.colored_label(ui.visuals().error_fg_color, violation.to_string());
        }
        ui.add_space(6.0);
    }

    ui.horizontal(|ui| {
        let label = match form.mode() {
            FormMode::Create => "Submit",
            FormMode::Edit(_) => "Save changes",
        };
        if ui.add_enabled(editable, egui::Button::new(label)).clicked() {
            actions.push(UiAction::Submit);
        }
        if form.is_submitting() {
            ui.spinner();
            ui.weak("Saving...");
        }
        let back = match form.mode() {
            FormMode::Create => Route::List,
            FormMode::Edit(id) => Route::Detail(id),
        };
        if ui
            .add_enabled(!form.is_submitting(), egui::Button::new("Cancel"))
            .clicked()
        {
            actions.push(UiAction::Navigate(back));
        }
    });
    if let Some(error) = form.last_error() {
        ui.colored_label(ui.visuals().error_fg_color, error);
    }
}

fn field_hint(field: CreatorField) -> &'static str {
    match field {
        CreatorField::Name => "Creator name",
        CreatorField::Url => "https://www.youtube.com/@channel",
        CreatorField::Description => "What do they make?",
        CreatorField::ImageUrl => "https://example.com/avatar.png",
    }
}

fn delete_button(ui: &mut egui::Ui, flow: &DeleteConfirmation, actions: &mut Vec<UiAction>) {
    if ui
        .add_enabled(!flow.is_open(), egui::Button::new("Delete"))
        .clicked()
    {
        actions.push(UiAction::RequestDelete(flow.target()));
    }
}

fn delete_error(ui: &mut egui::Ui, flow: &DeleteConfirmation) {
    if let Some(error) = flow.last_error() {
        ui.colored_label(ui.visuals().error_fg_color, error);
    }
}

fn show_delete_dialog(ctx: &egui::Context, flow: &DeleteConfirmation, actions: &mut Vec<UiAction>) {
    if !flow.is_open() {
        return;
    }
    let id = flow.target();
    egui::Window::new("Delete creator")
        .id(egui::Id::new(("delete_dialog", id.0)))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(flow.prompt());
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let enabled = flow.controls_enabled();
                if ui
                    .add_enabled(enabled, egui::Button::new("Yes, delete"))
                    .clicked()
                {
                    actions.push(UiAction::ConfirmDelete(id));
                }
                if ui.add_enabled(enabled, egui::Button::new("Cancel")).clicked() {
                    actions.push(UiAction::CancelDelete(id));
                }
                if flow.phase() == DeletePhase::Deleting {
                    ui.spinner();
                    ui.weak("Deleting...");
                }
            });
        });
}

fn creator_heading(ui: &mut egui::Ui, creator: &Creator) {
    ui.horizontal(|ui| {
        ui.heading(&creator.name);
        ui.weak(creator.platform().label());
    });
}

fn platform_badge(ui: &mut egui::Ui, creator: &Creator, size: egui::Vec2) {
    ui.allocate_ui(size, |ui| {
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new(creator.platform().icon()).size(size.y * 0.4));
        });
    });
}

fn loading(ui: &mut egui::Ui, message: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(message);
    });
}

fn failed(ui: &mut egui::Ui, message: &str, actions: &mut Vec<UiAction>) {
    ui.colored_label(ui.visuals().error_fg_color, message);
    if ui.button("Retry").clicked() {
        actions.push(UiAction::Reload);
    }
}

fn not_found(ui: &mut egui::Ui, id: CreatorId, actions: &mut Vec<UiAction>) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.heading("Creator not found");
        ui.weak(format!("There is no creator with id {id}."));
        ui.add_space(8.0);
        if ui.button("Back to all creators").clicked() {
            actions.push(UiAction::Navigate(Route::List));
        }
    });
}

fn upload_texture(ctx: &egui::Context, url: &str, image: &PreviewImage) -> TextureHandle {
    let color_image =
        egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
    ctx.load_texture(
        format!("creator_image:{url}"),
        color_image,
        egui::TextureOptions::LINEAR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::{LoadToken, StoreError};
    use crossbeam_channel::bounded;

    fn app_at(route: Route) -> (CreatorverseApp, Receiver<BackendCommand>, Sender<UiEvent>) {
        let (cmd_tx, cmd_rx) = bounded(16);
        let (ui_tx, ui_rx) = bounded(16);
        (CreatorverseApp::new(cmd_tx, ui_rx, route), cmd_rx, ui_tx)
    }

    fn creator(id: i64, name: &str, image: Option<&str>) -> Creator {
        Creator {
            id: CreatorId(id),
            name: name.to_string(),
            url: "https://www.instagram.com/someone".to_string(),
            description: "photos".to_string(),
            image_url: image.map(str::to_string),
            created_at: None,
        }
    }

    fn list_token(cmd_rx: &Receiver<BackendCommand>) -> LoadToken {
        match cmd_rx.try_recv() {
            Ok(BackendCommand::LoadAll { token }) => token,
            other => panic!("expected list load, got {other:?}"),
        }
    }

    #[test]
    fn form_captions_mark_requirement_once() {
        assert_eq!(field_caption(CreatorField::Name), "Name *");
        assert_eq!(field_caption(CreatorField::ImageUrl), "Image URL (optional)");
    }

    #[test]
    fn startup_queues_the_first_page_load() {
        let (_app, cmd_rx, _ui_tx) = app_at(Route::Detail(CreatorId(4)));
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::LoadOne { id: CreatorId(4), .. })
        ));
    }

    #[test]
    fn saved_create_returns_to_a_fresh_list() {
        let (mut app, cmd_rx, ui_tx) = app_at(Route::New);
        app.apply_actions(vec![
            UiAction::SetField(CreatorField::Name, "Ada".to_string()),
            UiAction::SetField(CreatorField::Url, "https://x.com/ada".to_string()),
            UiAction::SetField(CreatorField::Description, "Pioneer".to_string()),
            UiAction::Submit,
            UiAction::Submit,
        ]);
        let token = match cmd_rx.try_recv() {
            Ok(BackendCommand::Insert { token, .. }) => token,
            other => panic!("expected insert, got {other:?}"),
        };
        assert!(cmd_rx.try_recv().is_err());

        ui_tx
            .send(UiEvent::Saved {
                token,
                result: Ok(creator(1, "Ada", None)),
            })
            .expect("send");
        app.process_ui_events(&egui::Context::default());

        assert_eq!(app.pages.route(), Route::List);
        list_token(&cmd_rx);
    }

    #[test]
    fn list_images_are_fetched_once() {
        let (mut app, cmd_rx, _ui_tx) = app_at(Route::List);
        let _ = list_token(&cmd_rx);
        app.apply_actions(vec![
            UiAction::FetchImage("https://img.example/a.png".to_string()),
            UiAction::FetchImage("https://img.example/a.png".to_string()),
        ]);
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::FetchImage { .. })
        ));
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn decoded_image_becomes_a_texture() {
        let (mut app, _cmd_rx, ui_tx) = app_at(Route::List);
        let url = "https://img.example/a.png".to_string();
        ui_tx
            .send(UiEvent::ImageLoaded {
                url: url.clone(),
                image: PreviewImage {
                    width: 1,
                    height: 1,
                    rgba: vec![255, 0, 0, 255],
                },
            })
            .expect("send");
        app.process_ui_events(&egui::Context::default());
        assert!(matches!(app.images.get(&url), Some(ImageSlot::Ready(_))));
    }

    #[test]
    fn load_failure_raises_a_banner_and_retry_reloads() {
        let (mut app, cmd_rx, ui_tx) = app_at(Route::List);
        let token = list_token(&cmd_rx);
        ui_tx
            .send(UiEvent::ListLoaded {
                token,
                result: Err(StoreError::Backend {
                    status: None,
                    message: "error sending request".to_string(),
                }),
            })
            .expect("send");
        app.process_ui_events(&egui::Context::default());
        assert!(app.status_banner.is_some());

        app.apply_actions(vec![UiAction::Reload]);
        assert!(app.status_banner.is_none());
        assert_ne!(list_token(&cmd_rx), token);
    }

    #[test]
    fn delete_from_list_waits_for_confirmation() {
        let (mut app, cmd_rx, ui_tx) = app_at(Route::List);
        let token = list_token(&cmd_rx);
        ui_tx
            .send(UiEvent::ListLoaded {
                token,
                result: Ok(vec![creator(1, "Ada", None), creator(2, "Grace", None)]),
            })
            .expect("send");
        app.process_ui_events(&egui::Context::default());

        app.apply_actions(vec![UiAction::ConfirmDelete(CreatorId(1))]);
        assert!(cmd_rx.try_recv().is_err());

        app.apply_actions(vec![
            UiAction::RequestDelete(CreatorId(1)),
            UiAction::ConfirmDelete(CreatorId(1)),
        ]);
        let (token, id) = match cmd_rx.try_recv() {
            Ok(BackendCommand::Delete { token, id }) => (token, id),
            other => panic!("expected delete, got {other:?}"),
        };
        ui_tx
            .send(UiEvent::Deleted {
                token,
                id,
                result: Ok(()),
            })
            .expect("send");
        app.process_ui_events(&egui::Context::default());

        let Page::List(view) = app.pages.page() else {
            panic!("still on list");
        };
        assert_eq!(view.cards().len(), 1);
        assert_eq!(app.status, "Deleted Ada");
    }
}
