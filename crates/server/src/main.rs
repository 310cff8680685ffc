use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use server_api::{
    delete_creators, insert_creator, select_creators, update_creators, ApiContext, TableQuery,
};
use shared::{
    domain::Creator,
    error::{ApiError, ErrorCode},
    protocol::{creators_route, PREFER_HEADER, RETURN_REPRESENTATION},
    schema::CreatorRecord,
};
use storage::Storage;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, prepare_database_url};

const MAX_BODY_BYTES: usize = 64 * 1024;

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    if settings.api_key.is_none() {
        warn!("no api key configured; the creators table is open to any client");
    }

    let state = AppState {
        api: ApiContext { storage },
        api_key: settings.api_key,
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "creators backend listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            &creators_route(),
            get(http_select_creators)
                .post(http_insert_creator)
                .patch(http_update_creators)
                .delete(http_delete_creators),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Response {
    match state.api.storage.health_check().await {
        Ok(()) => "ok".into_response(),
        Err(error) => {
            error!(%error, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "storage unavailable").into_response()
        }
    }
}

async fn http_select_creators(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Creator>>> {
    state.authorize(&headers).map_err(reject)?;
    let query = TableQuery::parse(&params).map_err(reject)?;
    let rows = select_creators(&state.api, &query).await.map_err(reject)?;
    Ok(Json(rows))
}

async fn http_insert_creator(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CreatorRecord>, JsonRejection>,
) -> ApiResult<Response> {
    state.authorize(&headers).map_err(reject)?;
    let record = record_body(payload).map_err(reject)?;
    let created = insert_creator(&state.api, record).await.map_err(reject)?;
    Ok(representation(&headers, StatusCode::CREATED, vec![created]))
}

async fn http_update_creators(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    payload: Result<Json<CreatorRecord>, JsonRejection>,
) -> ApiResult<Response> {
    state.authorize(&headers).map_err(reject)?;
    let record = record_body(payload).map_err(reject)?;
    let query = TableQuery::parse(&params).map_err(reject)?;
    let updated = update_creators(&state.api, &query, record)
        .await
        .map_err(reject)?;
    Ok(representation(&headers, StatusCode::OK, updated))
}

async fn http_delete_creators(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<StatusCode> {
    state.authorize(&headers).map_err(reject)?;
    let query = TableQuery::parse(&params).map_err(reject)?;
    delete_creators(&state.api, &query).await.map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Malformed or incomplete bodies become `validation` errors in the table's error shape.
fn record_body(payload: Result<Json<CreatorRecord>, JsonRejection>) -> Result<CreatorRecord, ApiError> {
    payload.map(|Json(record)| record).map_err(|rejection| {
        warn!(status = %rejection.status(), "rejected creator body");
        ApiError::new(ErrorCode::Validation, rejection.body_text())
    })
}

/// Rows are echoed back only when the client asked for `return=representation`.
fn representation(headers: &HeaderMap, status: StatusCode, rows: Vec<Creator>) -> Response {
    let wants_rows = headers
        .get_all(PREFER_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|pref| pref.trim() == RETURN_REPRESENTATION);

    if wants_rows {
        (status, Json(rows)).into_response()
    } else if status == StatusCode::CREATED {
        status.into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => {
            error!(message = %err.message, "creators backend internal error");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
