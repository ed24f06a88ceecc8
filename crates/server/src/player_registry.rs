//! Shared player registry for multiplayer visibility.
//!
//! Tracks all connected players and broadcasts join/move/leave events so
//! that every connection can relay them to its client.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::protocol::Vec3;

/// Broadcast capacity. Must absorb bursts of movement events from every
/// player between two polls of the slowest connection.
pub const EVENT_CAPACITY: usize = 1024;

/// Opaque per-connection player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Information about a connected player, stored in the registry.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub position: Vec3,
    pub facing: Option<Vec3>,
}

/// Lifecycle events broadcast to all connections.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerEvent {
    Joined {
        id: PlayerId,
        position: Vec3,
    },
    /// Sent for every accepted move, at whatever rate clients report.
    Moved {
        id: PlayerId,
        position: Vec3,
        facing: Option<Vec3>,
    },
    Left {
        id: PlayerId,
    },
}

impl PlayerEvent {
    /// The player the event is about. Connections skip their own events.
    pub fn origin(&self) -> PlayerId {
        match self {
            PlayerEvent::Joined { id, .. }
            | PlayerEvent::Moved { id, .. }
            | PlayerEvent::Left { id } => *id,
        }
    }
}

/// Thread-safe registry of all connected players.
///
/// Uses `std::sync::RwLock` because every operation is brief (no awaits while
/// the lock is held) and the access pattern is read-heavy.
pub struct PlayerRegistry {
    players: RwLock<HashMap<PlayerId, PlayerInfo>>,
    next_id: AtomicU64,
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            players: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            event_tx,
        }
    }

    /// Allocate a unique id for a new connection.
    pub fn allocate_id(&self) -> PlayerId {
        PlayerId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a player and broadcast `PlayerEvent::Joined`.
    ///
    /// Subscribe *before* registering so the newcomer sees every later event;
    /// its own join comes back too and must be filtered by [`PlayerEvent::origin`].
    pub fn register(&self, info: PlayerInfo) {
        let event = PlayerEvent::Joined {
            id: info.id,
            position: info.position,
        };
        self.players
            .write()
            .expect("player registry poisoned")
            .insert(info.id, info);
        // Best-effort: if no subscribers yet, the send fails silently.
        let _ = self.event_tx.send(event);
    }

    /// Update a player's position and facing, broadcasting
    /// `PlayerEvent::Moved`. Unknown ids are ignored; returns whether the
    /// player existed.
    pub fn update_position(&self, id: PlayerId, position: Vec3, facing: Option<Vec3>) -> bool {
        {
            let mut players = self.players.write().expect("player registry poisoned");
            let Some(info) = players.get_mut(&id) else {
                return false;
            };
            info.position = position;
            info.facing = facing;
        }
        let _ = self.event_tx.send(PlayerEvent::Moved {
            id,
            position,
            facing,
        });
        true
    }

    /// Remove a player and broadcast `PlayerEvent::Left`. Removing an id that
    /// is not registered is a silent no-op; returns whether anything was
    /// removed.
    pub fn deregister(&self, id: PlayerId) -> bool {
        let removed = self
            .players
            .write()
            .expect("player registry poisoned")
            .remove(&id);
        if removed.is_none() {
            return false;
        }
        let _ = self.event_tx.send(PlayerEvent::Left { id });
        true
    }

    pub fn get(&self, id: PlayerId) -> Option<PlayerInfo> {
        self.players
            .read()
            .expect("player registry poisoned")
            .get(&id)
            .cloned()
    }

    /// Snapshot of all currently registered players.
    pub fn snapshot(&self) -> Vec<PlayerInfo> {
        self.players
            .read()
            .expect("player registry poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Number of currently connected players.
    pub fn player_count(&self) -> usize {
        self.players
            .read()
            .expect("player registry poisoned")
            .len()
    }

    /// Subscribe to player lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
