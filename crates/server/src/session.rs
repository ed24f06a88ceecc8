//! Per-connection session state machine.
//!
//! Connecting -> Active -> Closed
//!
//! The session is transport-agnostic: it consumes decoded [`ClientMessage`]s
//! and registry [`PlayerEvent`]s and produces [`ServerMessage`]s. The
//! WebSocket binding in `net::connection` only moves frames.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use voxsync_engine::world::position::ChunkPos;

use crate::error::SessionError;
use crate::player_registry::{PlayerEvent, PlayerId, PlayerInfo};
use crate::protocol::{ChunkPayload, ClientMessage, OtherPlayer, ServerMessage, Vec3};
use crate::spawn;
use crate::state::ServerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Socket open, no player registered yet.
    Connecting,
    /// Player registered; chunk requests and moves are accepted.
    Active,
    /// Terminal. The player has been removed from the registry.
    Closed,
}

pub struct WorldSession {
    id: PlayerId,
    state: SessionState,
    shared: Arc<ServerState>,
    /// Other players this client has been told about and not yet told left.
    announced: BTreeSet<PlayerId>,
}

impl WorldSession {
    pub fn new(shared: Arc<ServerState>) -> Self {
        Self {
            id: shared.players.allocate_id(),
            state: SessionState::Connecting,
            shared,
            announced: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Handshake: materialize the spawn neighborhood, place the player and
    /// build the welcome message.
    ///
    /// Registers the player, which broadcasts `Joined` to everyone else.
    /// Subscribe to the registry before calling this.
    pub fn connect(&mut self) -> Result<ServerMessage, SessionError> {
        if self.state != SessionState::Connecting {
            return Err(SessionError::InvalidState(self.state));
        }
        let shared = &self.shared;

        let around: Vec<ChunkPos> = shared.config.spawn_chunk().neighborhood(1);
        let chunks = shared.chunks.get_many(&around);
        let chunk_data: BTreeMap<String, ChunkPayload> = around
            .iter()
            .zip(chunks)
            .map(|(pos, chunk)| (pos.to_string(), ChunkPayload(chunk)))
            .collect();

        let start_position = spawn::find_safe_spawn(&shared.chunks, &shared.config);

        let other_players: BTreeMap<PlayerId, OtherPlayer> = shared
            .players
            .snapshot()
            .into_iter()
            .filter(|p| p.id != self.id)
            .map(|p| (p.id, OtherPlayer { position: p.position }))
            .collect();

        shared.players.register(PlayerInfo {
            id: self.id,
            position: start_position,
            facing: None,
        });
        shared.metrics.player_joined();
        self.announced = other_players.keys().copied().collect();
        self.state = SessionState::Active;

        tracing::info!(
            "Player {} joined at ({}, {}, {}), {} others online",
            self.id,
            start_position.x,
            start_position.y,
            start_position.z,
            other_players.len()
        );

        Ok(ServerMessage::Welcome {
            player_id: self.id,
            start_position,
            chunk_data,
            other_players,
        })
    }

    /// Dispatch one client event. Returns the direct reply, if any; broadcasts
    /// to other sessions go through the registry.
    ///
    /// Rejected events leave shared state untouched.
    pub fn handle(&mut self, msg: ClientMessage) -> Result<Option<ServerMessage>, SessionError> {
        if self.state != SessionState::Active {
            return Err(SessionError::InvalidState(self.state));
        }
        msg.validate()?;

        match msg {
            ClientMessage::RequestChunk { chunk_x, chunk_z } => {
                let chunk = self.shared.chunks.get(ChunkPos::new(chunk_x, chunk_z));
                self.shared.metrics.chunk_requested();
                Ok(Some(ServerMessage::Chunk {
                    chunk_x,
                    chunk_z,
                    data: ChunkPayload(chunk),
                }))
            }
            ClientMessage::Move { position, facing } => {
                if self.shared.players.update_position(self.id, position, facing) {
                    self.shared.metrics.move_relayed();
                }
                Ok(None)
            }
        }
    }

    /// Turn a registry broadcast into an outbound message for this client.
    /// Drops the session's own events and anything arriving while not Active.
    pub fn relay(&mut self, event: &PlayerEvent) -> Option<ServerMessage> {
        if self.state != SessionState::Active || event.origin() == self.id {
            return None;
        }
        Some(match *event {
            PlayerEvent::Joined { id, position } => {
                self.announced.insert(id);
                ServerMessage::PlayerJoined {
                    player_id: id,
                    position,
                }
            }
            PlayerEvent::Moved {
                id,
                position,
                facing,
            } => ServerMessage::PlayerMoved {
                player_id: id,
                position,
                facing,
            },
            PlayerEvent::Left { id } => {
                self.announced.remove(&id);
                ServerMessage::PlayerLeft { player_id: id }
            }
        })
    }

    /// Bring the client's roster back in line with the registry after
    /// broadcast events were lost.
    ///
    /// Announces players the client has not seen, refreshes the position of
    /// those it has, and reports players that left in the meantime. The
    /// caller must discard any events still queued from before the gap
    /// (resubscribe) before calling this.
    pub fn resync(&mut self) -> Vec<ServerMessage> {
        if self.state != SessionState::Active {
            return Vec::new();
        }
        let current: Vec<PlayerInfo> = self
            .shared
            .players
            .snapshot()
            .into_iter()
            .filter(|p| p.id != self.id)
            .collect();

        let mut out = Vec::with_capacity(current.len());
        let gone: Vec<PlayerId> = self
            .announced
            .iter()
            .copied()
            .filter(|id| !current.iter().any(|p| p.id == *id))
            .collect();
        for id in gone {
            self.announced.remove(&id);
            out.push(ServerMessage::PlayerLeft { player_id: id });
        }

        for p in current {
            if self.announced.insert(p.id) {
                out.push(ServerMessage::PlayerJoined {
                    player_id: p.id,
                    position: p.position,
                });
            } else {
                out.push(ServerMessage::PlayerMoved {
                    player_id: p.id,
                    position: p.position,
                    facing: p.facing,
                });
            }
        }

        tracing::debug!("Player {}: resynced {} roster entries", self.id, out.len());
        out
    }

    /// Close the session, removing the player and broadcasting `Left`.
    ///
    /// Idempotent: returns `false` (and broadcasts nothing) when the player
    /// was not registered, e.g. a second call or a session that never
    /// finished connecting.
    pub fn disconnect(&mut self) -> bool {
        if self.state == SessionState::Closed {
            return false;
        }
        self.state = SessionState::Closed;
        let removed = self.shared.players.deregister(self.id);
        if removed {
            self.shared.metrics.player_left();
            tracing::info!("Player {} left", self.id);
        }
        removed
    }

    /// Last known position, if the player is registered.
    pub fn position(&self) -> Option<Vec3> {
        self.shared.players.get(self.id).map(|p| p.position)
    }
}

/// A session dropped without an explicit disconnect (task aborted, early
/// return) still removes its player.
impl Drop for WorldSession {
    fn drop(&mut self) {
        self.disconnect();
    }
}
