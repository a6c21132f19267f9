use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{
    domain::{Item, ItemId},
    error::{ApiError, ErrorCode},
    protocol::{CreateItemRequest, HealthResponse, ItemPatch},
};
use storage::Storage;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::ApiContext;
use app_state::AppState;
use config::load_settings;

const MAX_BODY_BYTES: usize = 64 * 1024;

type HttpResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let database_url = settings.database_url.clone();
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "items api listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("items api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for ctrl-c; serving until killed");
        std::future::pending::<()>().await;
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health/", get(http_health))
        .route("/items/", get(http_list_items).post(http_create_item))
        .route(
            "/items/:item_id/",
            get(http_get_item)
                .patch(http_update_item)
                .delete(http_delete_item),
        );

    Router::new()
        .nest("/api", api)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn http_error(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => {
            error!(message = %err.message, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(err))
}

/// Malformed bodies and ids answer like any other validation failure.
fn rejected(message: String) -> (StatusCode, Json<ApiError>) {
    http_error(ApiError::new(ErrorCode::Validation, message))
}

fn item_id(path: Result<Path<i64>, PathRejection>) -> HttpResult<ItemId> {
    let Path(item_id) = path.map_err(|rejection| rejected(rejection.body_text()))?;
    Ok(ItemId(item_id))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> HttpResult<T> {
    let Json(value) = body.map_err(|rejection| rejected(rejection.body_text()))?;
    Ok(value)
}

async fn http_health(State(state): State<Arc<AppState>>) -> HttpResult<Json<HealthResponse>> {
    api::health(&state.api).await.map(Json).map_err(http_error)
}

async fn http_list_items(State(state): State<Arc<AppState>>) -> HttpResult<Json<Vec<Item>>> {
    api::list_items(&state.api)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_create_item(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateItemRequest>, JsonRejection>,
) -> HttpResult<(StatusCode, Json<Item>)> {
    let req = json_body(body)?;
    let item = api::create_item(&state.api, req)
        .await
        .map_err(http_error)?;
    info!(item_id = item.id.0, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn http_get_item(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> HttpResult<Json<Item>> {
    api::get_item(&state.api, item_id(path)?)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_update_item(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<ItemPatch>, JsonRejection>,
) -> HttpResult<Json<Item>> {
    let id = item_id(path)?;
    let patch = json_body(body)?;
    api::update_item(&state.api, id, patch)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_delete_item(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> HttpResult<StatusCode> {
    let id = item_id(path)?;
    api::delete_item(&state.api, id)
        .await
        .map_err(http_error)?;
    info!(item_id = id.0, "item deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
