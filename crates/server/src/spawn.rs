//! Spawn point search.

use voxsync_engine::world::ChunkStore;
use voxsync_engine::world::position::BlockPos;

use crate::block;
use crate::config::WorldConfig;
use crate::protocol::Vec3;

/// Used when the spawn column has no solid ground at all.
pub const FALLBACK_SPAWN: Vec3 = Vec3::new(32.5, 11.0, 32.5);

/// Scan the spawn column from the top down for the first solid block and
/// return the position one block above it, centered in the column.
///
/// Air and water don't count as ground. Falls back to [`FALLBACK_SPAWN`]
/// when the column is empty; that is a degraded but valid outcome.
pub fn find_safe_spawn(chunks: &ChunkStore, config: &WorldConfig) -> Vec3 {
    let (cx, cz) = config.center_column();
    for y in (0..config.world_height as i64).rev() {
        let id = chunks.get_block(BlockPos::new(cx, y, cz));
        if block::is_solid(id) {
            let spawn = Vec3::new(cx as f64 + 0.5, (y + 1) as f64, cz as f64 + 0.5);
            tracing::debug!(
                "Spawn at ({}, {}, {}) above {}",
                spawn.x,
                spawn.y,
                spawn.z,
                block::name(id)
            );
            return spawn;
        }
    }
    tracing::warn!("No safe spawn found in column ({}, {}), using fallback", cx, cz);
    FALLBACK_SPAWN
}
