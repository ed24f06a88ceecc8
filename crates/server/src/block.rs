//! Block type registry: ids, names and the properties clients need to render
//! and collide with each block.
//!
//! Ids are small and sequential; the engine stores them opaquely.

use serde::Serialize;
use voxsync_engine::world::block::BlockId;
use voxsync_engine::worldgen::Palette;

pub const AIR: BlockId = BlockId(0);
pub const DIRT: BlockId = BlockId(1);
pub const STONE: BlockId = BlockId(2);
pub const GLASS: BlockId = BlockId(3);
pub const QUANTUM: BlockId = BlockId(4);
pub const TELEPORT: BlockId = BlockId(5);
pub const GRASS: BlockId = BlockId(6);
pub const SAND: BlockId = BlockId(7);
pub const WATER: BlockId = BlockId(8);

/// Behavior tag for blocks with gameplay semantics beyond solid/transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Special {
    Teleport,
    Liquid,
}

/// Static metadata for one block type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockType {
    #[serde(serialize_with = "serialize_id")]
    pub id: BlockId,
    /// Lookup key, e.g. `"stone"`.
    pub key: &'static str,
    /// Display name, e.g. `"Stone"`.
    pub name: &'static str,
    pub transparent: bool,
    pub walkable: bool,
    /// Seconds to break; `None` for unbreakable blocks.
    pub break_time: Option<f32>,
    pub glow: bool,
    pub special: Option<Special>,
}

fn serialize_id<S: serde::Serializer>(id: &BlockId, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u16(id.0)
}

const fn block(
    id: BlockId,
    key: &'static str,
    name: &'static str,
    transparent: bool,
    walkable: bool,
    break_time: Option<f32>,
) -> BlockType {
    BlockType {
        id,
        key,
        name,
        transparent,
        walkable,
        break_time,
        glow: false,
        special: None,
    }
}

/// Every known block, indexed by id.
pub static BLOCK_TYPES: [BlockType; 9] = [
    block(AIR, "air", "Air", true, true, None),
    block(DIRT, "dirt", "Dirt", false, false, Some(0.5)),
    block(STONE, "stone", "Stone", false, false, Some(1.0)),
    block(GLASS, "glass", "Glass", true, false, Some(0.3)),
    BlockType {
        glow: true,
        ..block(QUANTUM, "quantum", "Quantum Block", false, false, Some(2.0))
    },
    BlockType {
        special: Some(Special::Teleport),
        ..block(TELEPORT, "teleport", "Teleport Block", true, false, Some(1.5))
    },
    block(GRASS, "grass", "Grass", false, false, Some(0.5)),
    block(SAND, "sand", "Sand", false, false, Some(0.4)),
    BlockType {
        special: Some(Special::Liquid),
        ..block(WATER, "water", "Water", true, true, None)
    },
];

/// Look up a block id by key (`"stone"`, `"water"`, ...).
pub fn id_of(key: &str) -> Option<BlockId> {
    BLOCK_TYPES.iter().find(|b| b.key == key).map(|b| b.id)
}

/// Metadata for an id, if it names a known block.
pub fn get(id: BlockId) -> Option<&'static BlockType> {
    BLOCK_TYPES.get(id.0 as usize)
}

pub fn is_valid(id: BlockId) -> bool {
    get(id).is_some()
}

/// Human-readable name, `"Unknown"` for ids outside the table.
pub fn name(id: BlockId) -> &'static str {
    get(id).map_or("Unknown", |b| b.name)
}

/// Is this a fluid?
pub fn is_fluid(id: BlockId) -> bool {
    get(id).is_some_and(|b| b.special == Some(Special::Liquid))
}

/// Can a player occupy this space?
pub fn is_replaceable(id: BlockId) -> bool {
    id == AIR || is_fluid(id)
}

/// Is this block solid ground a player can stand on?
pub fn is_solid(id: BlockId) -> bool {
    !is_replaceable(id)
}

/// The ids terrain synthesis writes.
pub fn terrain_palette() -> Palette {
    Palette {
        air: AIR,
        stone: STONE,
        dirt: DIRT,
        grass: GRASS,
        sand: SAND,
        water: WATER,
        rare: QUANTUM,
    }
}
