//! Process-wide world service shared by every session via `Arc<ServerState>`.

use voxsync_engine::world::{ChunkGenerator, ChunkStore};
use voxsync_engine::worldgen::TerrainGenerator;

use crate::block;
use crate::config::WorldConfig;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::player_registry::PlayerRegistry;

/// The single shared world and roster every session observes.
///
/// Both halves are internally synchronized (`ChunkStore` per coordinate,
/// `PlayerRegistry` behind an `RwLock`), so sessions on different tasks may
/// use it concurrently.
pub struct ServerState {
    pub config: WorldConfig,
    pub chunks: ChunkStore,
    pub players: PlayerRegistry,
    pub metrics: Metrics,
}

impl ServerState {
    /// A world generated by the standard terrain synthesizer.
    pub fn new(config: WorldConfig) -> Self {
        let generator = TerrainGenerator::new(
            config.seed,
            config.dimensions(),
            block::terrain_palette(),
        );
        Self::with_generator(config, Box::new(generator))
    }

    /// A world backed by a custom generator (flat test worlds and the like).
    pub fn with_generator(config: WorldConfig, generator: Box<dyn ChunkGenerator>) -> Self {
        Self {
            chunks: ChunkStore::new(config.dimensions(), generator),
            players: PlayerRegistry::new(),
            metrics: Metrics::new(),
            config,
        }
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot(
            self.chunks.chunk_count() as u64,
            self.chunks.generated_count(),
        )
    }
}
