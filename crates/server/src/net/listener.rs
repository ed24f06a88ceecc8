//! axum HTTP server: the `/ws` game socket plus small JSON endpoints.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::net::TcpListener;

use crate::block::{BLOCK_TYPES, BlockType};
use crate::metrics::MetricsSnapshot;
use crate::state::ServerState;

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/ws", get(ws_upgrade))
        .route("/metrics", get(metrics))
        .route("/blocks", get(blocks))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}

/// Bind and serve until the listener fails.
pub async fn run(state: Arc<ServerState>, bind_addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Listening on {}", bind_addr);

    let app = router(state).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app).await?;
    Ok(())
}

/// Upgrade an HTTP request to a game WebSocket.
async fn ws_upgrade(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    tracing::info!("Connection from {}", addr);
    ws.on_upgrade(move |socket| super::connection::handle(socket, state, addr))
}

async fn metrics(State(state): State<Arc<ServerState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics_snapshot())
}

async fn blocks() -> Json<&'static [BlockType]> {
    Json(&BLOCK_TYPES[..])
}
