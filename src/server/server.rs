use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{log_requests, metrics, state::*, ServerConfig};
use crate::fetcher::{FetcherError, JobSpec};

#[derive(Deserialize, Debug)]
struct PutFetcherBody {
    pub url: String,
    pub interval: u64,
    pub id: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PutFetcherResponse {
    pub id: i64,
}

impl IntoResponse for FetcherError {
    fn into_response(self) -> Response {
        let status = match self {
            FetcherError::NotFound(_) => StatusCode::NOT_FOUND,
            FetcherError::InvalidSpec(_) => StatusCode::BAD_REQUEST,
            FetcherError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, self.to_string()).into_response()
    }
}

async fn put_fetcher(State(registry): State<GuardedJobRegistry>, body: Bytes) -> Response {
    let body: PutFetcherBody = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };
    info!("Input: {:?}", body);

    let spec = JobSpec {
        id: body.id.unwrap_or(0),
        url: body.url,
        interval: body.interval,
    };
    match registry.put(spec).await {
        Ok(spec) => Json(PutFetcherResponse { id: spec.id }).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn delete_fetcher(
    State(registry): State<GuardedJobRegistry>,
    Path(id): Path<i64>,
) -> Response {
    info!("Deleting id: {}", id);
    match registry.remove(id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => err.into_response(),
    }
}

async fn list_fetchers(State(registry): State<GuardedJobRegistry>) -> impl IntoResponse {
    Json(registry.list_specs().await)
}

async fn get_fetcher_history(
    State(registry): State<GuardedJobRegistry>,
    Path(id): Path<i64>,
) -> Response {
    info!("History for id: {}", id);
    match registry.get_history(id).await {
        Ok(history) => Json(history).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn make_app(config: ServerConfig, registry: GuardedJobRegistry) -> Router {
    let state = ServerState::new(config.clone(), registry);

    let fetcher_routes: Router = Router::new()
        .route("/", get(list_fetchers).post(put_fetcher))
        .route("/{id}", delete(delete_fetcher))
        .route("/{id}/history", get(get_fetcher_history))
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .with_state(state.clone());

    Router::new()
        .nest("/api/fetcher", fetcher_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics::metrics_handler))
}

/// Serve the management API and the metrics endpoint until `shutdown` is cancelled.
pub async fn run_server(
    config: ServerConfig,
    registry: GuardedJobRegistry,
    shutdown: CancellationToken,
) -> Result<()> {
    let app = make_app(config.clone(), registry);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind API port {}", config.port))?;
    let metrics_listener = tokio::net::TcpListener::bind(("0.0.0.0", config.metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", config.metrics_port))?;

    info!("Listening on port {}", config.port);
    info!("Metrics available at port {}", config.metrics_port);

    let api = axum::serve(listener, app).with_graceful_shutdown(shutdown.clone().cancelled_owned());
    let metrics = axum::serve(metrics_listener, make_metrics_app())
        .with_graceful_shutdown(shutdown.cancelled_owned());

    tokio::try_join!(
        async { api.await.context("API server failed") },
        async { metrics.await.context("Metrics server failed") },
    )?;

    Ok(())
}
