pub mod block;
pub mod chunk;
pub mod position;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use block::BlockId;
use chunk::{Chunk, Dimensions};
use dashmap::DashMap;
use position::{BlockPos, ChunkPos};
use rayon::prelude::*;

/// Produces the contents of a chunk that has never been requested before.
///
/// Implementations must be pure with respect to `pos`: the store calls
/// `generate` at most once per coordinate and caches the result forever.
pub trait ChunkGenerator: Send + Sync + 'static {
    fn generate(&self, pos: ChunkPos) -> Chunk;
}

/// Slot for one coordinate. Empty until the first caller finishes generating.
type ChunkSlot = Arc<OnceLock<Arc<Chunk>>>;

/// The block world: a memoizing, lock-sharded map from chunk coordinate to
/// generated chunk.
///
/// Chunks are generated lazily on first request and are immutable afterwards.
/// Every method takes `&self`; `DashMap` shards guard the slot table and each
/// slot's `OnceLock` guarantees that concurrent requests for the same
/// uncached coordinate run the generator exactly once. Late arrivals block
/// until the in-flight result is ready and then share it.
pub struct ChunkStore {
    dims: Dimensions,
    generator: Box<dyn ChunkGenerator>,
    chunks: DashMap<ChunkPos, ChunkSlot>,
    generated: AtomicU64,
}

impl ChunkStore {
    pub fn new(dims: Dimensions, generator: Box<dyn ChunkGenerator>) -> Self {
        Self {
            dims,
            generator,
            chunks: DashMap::new(),
            generated: AtomicU64::new(0),
        }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Fetch a chunk, generating it first if this is the first request.
    pub fn get(&self, pos: ChunkPos) -> Arc<Chunk> {
        // Fast path: read lock only.
        if let Some(slot) = self.chunks.get(&pos) {
            if let Some(chunk) = slot.get() {
                return Arc::clone(chunk);
            }
        }

        // Clone the slot out so the shard lock is released before generating.
        let slot: ChunkSlot = Arc::clone(self.chunks.entry(pos).or_default().value());
        let chunk = slot.get_or_init(|| {
            let started = Instant::now();
            let chunk = self.generator.generate(pos);
            debug_assert_eq!(chunk.dims(), self.dims, "generator returned mis-sized chunk");
            self.generated.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Generated chunk {} in {:?}", pos, started.elapsed());
            Arc::new(chunk)
        });
        Arc::clone(chunk)
    }

    /// Fetch several chunks, generating the missing ones in parallel.
    /// Results are returned in the order of `positions`.
    pub fn get_many(&self, positions: &[ChunkPos]) -> Vec<Arc<Chunk>> {
        positions.par_iter().map(|&pos| self.get(pos)).collect()
    }

    /// Read a block at an absolute position, generating its chunk if needed.
    /// Heights outside `0..world_height` are air.
    pub fn get_block(&self, pos: BlockPos) -> BlockId {
        let chunk = self.get(pos.chunk(self.dims.chunk_size));
        let local = pos.local(self.dims.chunk_size);
        chunk.get(local.x, local.z, local.y)
    }

    /// Whether a chunk has already been generated for `pos`.
    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks
            .get(&pos)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of chunks currently cached.
    pub fn chunk_count(&self) -> usize {
        self.chunks.iter().filter(|slot| slot.get().is_some()).count()
    }

    /// Total number of generator invocations since the store was created.
    pub fn generated_count(&self) -> u64 {
        self.generated.load(Ordering::Relaxed)
    }
}
