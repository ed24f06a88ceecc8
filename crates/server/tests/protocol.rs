//! JSON wire shapes of the sync protocol.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Value, json};
use voxsync_engine::world::block::BlockId;
use voxsync_engine::world::chunk::{Chunk, Dimensions};
use voxsync_server::error::SessionError;
use voxsync_server::player_registry::PlayerId;
use voxsync_server::protocol::{ChunkPayload, ClientMessage, OtherPlayer, ServerMessage, Vec3};

const DIMS: Dimensions = Dimensions::new(16, 48);

fn encode(msg: &ServerMessage) -> Value {
    serde_json::from_str(&msg.to_json().unwrap()).unwrap()
}

#[test]
fn parses_request_chunk() {
    let msg = ClientMessage::parse(r#"{"type":"requestChunk","chunkX":-3,"chunkZ":7}"#).unwrap();
    assert_eq!(
        msg,
        ClientMessage::RequestChunk {
            chunk_x: -3,
            chunk_z: 7
        }
    );
}

#[test]
fn parses_move_with_and_without_facing() {
    let with = ClientMessage::parse(
        r#"{"type":"move","position":{"x":1,"y":2.5,"z":-3},"facing":{"x":0,"y":0,"z":1}}"#,
    )
    .unwrap();
    assert_eq!(
        with,
        ClientMessage::Move {
            position: Vec3::new(1.0, 2.5, -3.0),
            facing: Some(Vec3::new(0.0, 0.0, 1.0)),
        }
    );

    let without = ClientMessage::parse(r#"{"type":"move","position":{"x":0,"y":0,"z":0}}"#).unwrap();
    assert_eq!(
        without,
        ClientMessage::Move {
            position: Vec3::new(0.0, 0.0, 0.0),
            facing: None,
        }
    );
}

#[test]
fn rejects_malformed_frames() {
    for text in [
        "not json",
        r#"{"chunkX":0,"chunkZ":0}"#,
        r#"{"type":"teleport"}"#,
        r#"{"type":"requestChunk","chunkX":"zero","chunkZ":0}"#,
        r#"{"type":"move"}"#,
        r#"{"type":"move","position":{"x":1,"y":2}}"#,
    ] {
        assert!(
            matches!(ClientMessage::parse(text), Err(SessionError::Malformed(_))),
            "accepted {text}"
        );
    }
}

#[test]
fn rejects_non_finite_coordinates() {
    let position = ClientMessage::Move {
        position: Vec3::new(f64::INFINITY, 0.0, 0.0),
        facing: None,
    };
    assert!(matches!(position.validate(), Err(SessionError::Malformed(_))));

    let facing = ClientMessage::Move {
        position: Vec3::new(0.0, 0.0, 0.0),
        facing: Some(Vec3::new(0.0, f64::NAN, 0.0)),
    };
    assert!(matches!(facing.validate(), Err(SessionError::Malformed(_))));
}

#[test]
fn chunk_is_nested_x_z_y() {
    let mut chunk = Chunk::new_empty(DIMS);
    chunk.set(3, 5, 7, BlockId::new(2));
    chunk.set(15, 0, 47, BlockId::new(8));

    let json = encode(&ServerMessage::Chunk {
        chunk_x: -1,
        chunk_z: 2,
        data: ChunkPayload(Arc::new(chunk)),
    });

    assert_eq!(json["type"], "chunk");
    assert_eq!(json["chunkX"], -1);
    assert_eq!(json["chunkZ"], 2);

    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 16);
    for row in data {
        let row = row.as_array().unwrap();
        assert_eq!(row.len(), 16);
        for column in row {
            assert_eq!(column.as_array().unwrap().len(), 48);
        }
    }
    assert_eq!(json["data"][3][5][7], 2);
    assert_eq!(json["data"][5][3][7], 0);
    assert_eq!(json["data"][15][0][47], 8);
    assert_eq!(json["data"][0][0][0], 0);
}

#[test]
fn welcome_shape() {
    let chunk = Arc::new(Chunk::new_filled(DIMS, BlockId::new(1)));
    let mut chunk_data = BTreeMap::new();
    chunk_data.insert("2_-1".to_string(), ChunkPayload(chunk));
    let mut other_players = BTreeMap::new();
    other_players.insert(
        PlayerId(4),
        OtherPlayer {
            position: Vec3::new(1.0, 2.0, 3.0),
        },
    );

    let json = encode(&ServerMessage::Welcome {
        player_id: PlayerId(7),
        start_position: Vec3::new(32.5, 11.0, 32.5),
        chunk_data,
        other_players,
    });

    assert_eq!(json["type"], "welcome");
    assert_eq!(json["playerId"], 7);
    assert_eq!(json["startPosition"], json!({"x": 32.5, "y": 11.0, "z": 32.5}));
    assert_eq!(json["chunkData"]["2_-1"][0][0][0], 1);
    assert_eq!(
        json["otherPlayers"],
        json!({"4": {"position": {"x": 1.0, "y": 2.0, "z": 3.0}}})
    );
}

#[test]
fn player_event_shapes() {
    let joined = encode(&ServerMessage::PlayerJoined {
        player_id: PlayerId(2),
        position: Vec3::new(0.5, 1.0, 0.5),
    });
    assert_eq!(
        joined,
        json!({"type": "playerJoined", "playerId": 2, "position": {"x": 0.5, "y": 1.0, "z": 0.5}})
    );

    let moved = encode(&ServerMessage::PlayerMoved {
        player_id: PlayerId(2),
        position: Vec3::new(1.0, 2.0, 3.0),
        facing: Some(Vec3::new(0.0, 0.0, 1.0)),
    });
    assert_eq!(moved["type"], "playerMoved");
    assert_eq!(moved["facing"], json!({"x": 0.0, "y": 0.0, "z": 1.0}));

    let still = encode(&ServerMessage::PlayerMoved {
        player_id: PlayerId(2),
        position: Vec3::new(1.0, 2.0, 3.0),
        facing: None,
    });
    assert_eq!(still["facing"], Value::Null);

    let left = encode(&ServerMessage::PlayerLeft {
        player_id: PlayerId(2),
    });
    assert_eq!(left, json!({"type": "playerLeft", "playerId": 2}));
}
