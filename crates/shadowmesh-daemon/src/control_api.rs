//! Local control API: a small HTTP surface the operator (or a CLI front
//! end) uses to drive connect/disconnect and read status, bound to
//! `daemon.listen_address`.

use crate::manager::DaemonManager;
use crate::state::DaemonStatus;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// State shared across control API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub manager: Arc<DaemonManager>,
}

/// Builds the router: `/health`, `/status`, `/connect`, `/disconnect`.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(get_status))
        .route("/connect", post(connect))
        .route("/disconnect", post(disconnect))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Binds and serves the control API until the listener is dropped.
pub async fn serve(listen_address: SocketAddr, state: ApiState) -> std::io::Result<()> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(listen_address).await?;
    tracing::info!(%listen_address, "control API listening");
    axum::serve(listener, router).await
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "service": "shadowmeshd" }))
}

async fn get_status(State(state): State<ApiState>) -> Json<DaemonStatus> {
    Json(state.manager.status().await)
}

#[derive(Debug, Deserialize)]
struct ConnectRequest {
    peer_addr: SocketAddr,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

async fn connect(State(state): State<ApiState>, Json(request): Json<ConnectRequest>) -> Response {
    match state.manager.connect(request.peer_addr).await {
        Ok(()) => (StatusCode::OK, Json(state.manager.status().await)).into_response(),
        Err(err) => (StatusCode::BAD_GATEWAY, Json(ErrorResponse { error: err.to_string() })).into_response(),
    }
}

async fn disconnect(State(state): State<ApiState>) -> Response {
    match state.manager.disconnect().await {
        Ok(()) => (StatusCode::OK, Json(state.manager.status().await)).into_response(),
        Err(err) => (StatusCode::CONFLICT, Json(ErrorResponse { error: err.to_string() })).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::DaemonManager;
    use axum::body::Body;
    use axum::http::Request;
    use shadowmesh_net::config::ShadowMeshConfig;
    use shadowmesh_net::crypto::keypair::HybridKeypair;
    use tower::ServiceExt;

    fn test_state() -> ApiState {
        let identity = HybridKeypair::generate().expect("keypair generation");
        let manager = Arc::new(DaemonManager::new(ShadowMeshConfig::default(), Arc::new(identity)));
        ApiState { manager }
    }

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let router = create_router(test_state());
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn status_reports_disconnected_before_any_connect() {
        let router = create_router(test_state());
        let response = router
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn disconnect_without_a_connection_is_rejected() {
        let router = create_router(test_state());
        let response = router
            .oneshot(Request::builder().method("POST").uri("/disconnect").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
