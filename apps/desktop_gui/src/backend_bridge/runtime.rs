//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread, time::Duration};

use client_core::{BackendConfig, CreatorStore, HttpCreatorStore};
use crossbeam_channel::{Receiver, Sender};
use reqwest::Client as HttpClient;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{PreviewImage, UiError, UiErrorContext, UiEvent};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_IMAGE_EDGE: u32 = 512;

/// Spawns the worker thread. It exits once every `BackendCommand` sender is gone.
pub fn launch(config: BackendConfig, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let http = match HttpClient::builder().timeout(REQUEST_TIMEOUT).build() {
                Ok(http) => http,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("failed to build http client: {err}"),
                    )));
                    tracing::error!("failed to build http client: {err}");
                    return;
                }
            };
            tracing::info!(table = %config.table_url(), keyed = config.api_key.is_some(), "backend worker ready");
            let _ = ui_tx.try_send(UiEvent::Info(format!("Backend: {}", config.base_url)));
            let store: Arc<dyn CreatorStore> =
                Arc::new(HttpCreatorStore::with_client(http.clone(), config));

            // `recv` blocks this runtime thread; the store calls run on the worker pool.
            while let Ok(cmd) = cmd_rx.recv() {
                let store = Arc::clone(&store);
                let http = http.clone();
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let event = execute(store.as_ref(), &http, cmd).await;
                    // A full queue waits for the next frame instead of losing the result.
                    let _ = tokio::task::spawn_blocking(move || deliver(&ui_tx, event)).await;
                });
            }
            tracing::info!("command queue closed; backend worker stopping");
        });
    });
}

/// Blocks until the UI has room for `event`. Fails only once the UI side is gone.
pub fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) -> bool {
    match ui_tx.send(event) {
        Ok(()) => true,
        Err(_) => {
            tracing::debug!("ui closed; discarding backend result");
            false
        }
    }
}

/// Runs one command to completion and turns its result into the event the UI expects.
pub async fn execute(store: &dyn CreatorStore, http: &HttpClient, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::LoadAll { token } => UiEvent::ListLoaded {
            token,
            result: store.list_all().await,
        },
        BackendCommand::LoadOne { token, id } => UiEvent::CreatorLoaded {
            token,
            result: store.get_by_id(id).await,
        },
        BackendCommand::Insert { token, record } => UiEvent::Saved {
            token,
            result: store.insert(&record).await,
        },
        BackendCommand::Update { token, id, record } => UiEvent::Saved {
            token,
            result: store.update(id, &record).await,
        },
        BackendCommand::Delete { token, id } => UiEvent::Deleted {
            token,
            id,
            result: store.delete_by_id(id).await,
        },
        BackendCommand::FetchImage { url } => match fetch_image(http, &url).await {
            Ok(image) => UiEvent::ImageLoaded { url, image },
            Err(reason) => {
                tracing::debug!(%url, %reason, "creator image unavailable");
                UiEvent::ImageFailed { url, reason }
            }
        },
    }
}

async fn fetch_image(http: &HttpClient, url: &str) -> Result<PreviewImage, String> {
    let bytes = http
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| format!("failed to download image: {err}"))?
        .bytes()
        .await
        .map_err(|err| format!("failed to read image body: {err}"))?;
    decode_preview_image(&bytes)
}

pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = dynamic.thumbnail(MAX_IMAGE_EDGE, MAX_IMAGE_EDGE).to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}
