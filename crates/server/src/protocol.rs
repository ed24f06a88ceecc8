//! JSON wire protocol.
//!
//! Every frame is a JSON object tagged by `"type"` with camelCase fields.
//! Connect and disconnect have no message of their own: they are the
//! socket opening and closing.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use voxsync_engine::world::block::BlockId;
use voxsync_engine::world::chunk::Chunk;

use crate::error::SessionError;
use crate::player_registry::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ── Client → server ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    RequestChunk {
        chunk_x: i32,
        chunk_z: i32,
    },
    Move {
        position: Vec3,
        #[serde(default)]
        facing: Option<Vec3>,
    },
}

impl ClientMessage {
    /// Decode and validate one text frame.
    pub fn parse(text: &str) -> Result<Self, SessionError> {
        let msg: ClientMessage = serde_json::from_str(text)?;
        msg.validate()?;
        Ok(msg)
    }

    /// Reject values JSON can carry but the world cannot use.
    pub fn validate(&self) -> Result<(), SessionError> {
        match self {
            ClientMessage::RequestChunk { .. } => Ok(()),
            ClientMessage::Move { position, facing } => {
                if !position.is_finite() {
                    return Err(SessionError::Malformed("non-finite position".into()));
                }
                if facing.is_some_and(|f| !f.is_finite()) {
                    return Err(SessionError::Malformed("non-finite facing".into()));
                }
                Ok(())
            }
        }
    }
}

// ── Server → client ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Welcome {
        player_id: PlayerId,
        start_position: Vec3,
        /// Keyed by `"{chunkX}_{chunkZ}"`.
        chunk_data: BTreeMap<String, ChunkPayload>,
        other_players: BTreeMap<PlayerId, OtherPlayer>,
    },
    Chunk {
        chunk_x: i32,
        chunk_z: i32,
        data: ChunkPayload,
    },
    PlayerJoined {
        player_id: PlayerId,
        position: Vec3,
    },
    PlayerMoved {
        player_id: PlayerId,
        position: Vec3,
        facing: Option<Vec3>,
    },
    PlayerLeft {
        player_id: PlayerId,
    },
}

impl ServerMessage {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OtherPlayer {
    pub position: Vec3,
}

/// A shared chunk, encoded as nested arrays `[localX][localZ][y]` of ids.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkPayload(pub Arc<Chunk>);

impl Serialize for ChunkPayload {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let size = self.0.dims().chunk_size;
        let mut rows = s.serialize_seq(Some(size as usize))?;
        for x in 0..size {
            rows.serialize_element(&Row { chunk: &self.0, x })?;
        }
        rows.end()
    }
}

/// All columns with the same local x.
struct Row<'a> {
    chunk: &'a Chunk,
    x: u32,
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let size = self.chunk.dims().chunk_size;
        s.collect_seq((0..size).map(|z| Column(self.chunk.column(self.x, z))))
    }
}

struct Column<'a>(&'a [BlockId]);

impl Serialize for Column<'_> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(self.0.iter().map(|b| b.0))
    }
}
