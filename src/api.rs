use axum::{
    extract::{Json as AxumJson, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::engine::{ConfigLoader, LoadState, TrustStore};
use crate::server::{QueryHandler, QueryRequest, SupportDetails};

struct ApiState {
    handler: QueryHandler,
    loader: Arc<ConfigLoader>,
    store: Arc<TrustStore>,
}

pub fn router(
    handler: QueryHandler,
    loader: Arc<ConfigLoader>,
    store: Arc<TrustStore>,
) -> Router {
    let state = Arc::new(ApiState {
        handler,
        loader,
        store,
    });

    Router::new()
        .route("/api/query", post(handle_query))
        .route("/api/status", get(get_status))
        .route("/api/config", get(get_config))
        .route("/api/refresh", post(trigger_refresh))
        .with_state(state)
}

pub async fn start_api_server(
    handler: QueryHandler,
    loader: Arc<ConfigLoader>,
    store: Arc<TrustStore>,
    listener: tokio::net::TcpListener,
) {
    let app = router(handler, loader, store);
    tracing::info!(
        "API Server listening on http://{}",
        listener.local_addr().expect("listener has no local addr")
    );
    axum::serve(listener, app).await.expect("API server failed");
}

async fn handle_query(
    State(state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<QueryRequest>,
) -> impl IntoResponse {
    Json(state.handler.handle(request).await)
}

async fn get_status(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let load_state = match state.loader.state() {
        LoadState::Unloaded => "unloaded",
        LoadState::Loading => "loading",
        LoadState::Loaded => "loaded",
        LoadState::Failed => "failed",
    };
    Json(serde_json::json!({
        "load_state": load_state,
        "pattern_count": state.store.pattern_count(),
    }))
}

async fn get_config(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let config = state.store.config();
    Json(SupportDetails::from(config.as_ref()))
}

async fn trigger_refresh(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    match state.loader.refresh_now().await {
        Ok(()) => Json(serde_json::json!({ "status": "refreshed" })),
        Err(e) => Json(serde_json::json!({ "status": "failed", "error": e.to_string() })),
    }
}
