//! Per-client WebSocket handler.
//!
//! Drives one [`WorldSession`]: sends the welcome, then multiplexes inbound
//! frames and registry broadcasts until the socket closes.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::ws::{Message, WebSocket};
use tokio::sync::broadcast::error::RecvError;

use crate::error::SessionError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::WorldSession;
use crate::state::ServerState;

/// Handle a single client connection from open to close.
pub async fn handle(mut socket: WebSocket, state: Arc<ServerState>, addr: SocketAddr) {
    // Subscribe first so no event between registration and the loop is lost.
    let mut events = state.players.subscribe();
    let mut session = WorldSession::new(Arc::clone(&state));

    let welcome = match session.connect() {
        Ok(welcome) => welcome,
        Err(e) => {
            tracing::warn!("Handshake with {} failed: {}", addr, e);
            return;
        }
    };
    if send(&mut socket, &state, &welcome).await.is_err() {
        session.disconnect();
        return;
    }

    loop {
        tokio::select! {
            frame = socket.recv() => {
                let text = match frame {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Binary(_))) => {
                        state.metrics.malformed();
                        tracing::debug!("Player {}: ignoring binary frame", session.id());
                        continue;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue, // ping/pong
                    Some(Err(e)) => {
                        tracing::debug!("Player {}: socket error: {}", session.id(), e);
                        break;
                    }
                };

                let started = Instant::now();
                let result = ClientMessage::parse(&text).and_then(|msg| session.handle(msg));
                state.metrics.record_event(started.elapsed());

                match result {
                    Ok(Some(reply)) => {
                        if send(&mut socket, &state, &reply).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e @ SessionError::Malformed(_)) => {
                        state.metrics.malformed();
                        tracing::debug!("Player {}: {}", session.id(), e);
                    }
                    Err(e) => {
                        tracing::warn!("Player {}: {}", session.id(), e);
                    }
                }
            }

            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Some(out) = session.relay(&event) {
                            if send(&mut socket, &state, &out).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        tracing::warn!("Player {} lagged, {} player events dropped; resyncing", session.id(), n);
                        state.metrics.resynced();
                        // Whatever is still queued predates the snapshot.
                        events = events.resubscribe();
                        let mut failed = false;
                        for out in session.resync() {
                            if send(&mut socket, &state, &out).await.is_err() {
                                failed = true;
                                break;
                            }
                        }
                        if failed {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    session.disconnect();
    tracing::info!("Connection from {} closed", addr);
}

/// Encode and send one message. An encoding failure is counted and
/// reported as an error like a dead socket, so the connection closes and
/// the client reconnects with a fresh welcome.
async fn send(socket: &mut WebSocket, state: &ServerState, msg: &ServerMessage) -> Result<(), ()> {
    let text = match msg.to_json() {
        Ok(text) => text,
        Err(e) => {
            state.metrics.encode_failed();
            tracing::error!("Failed to encode outbound message: {}", e);
            return Err(());
        }
    };
    socket.send(Message::Text(text.into())).await.map_err(|_| ())
}
