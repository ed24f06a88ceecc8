//! Column-by-column terrain synthesis.
//!
//! Each world column `(x, z)` is classified into a [`Biome`], given a surface
//! height, filled with stone/subsurface/water, carved by 3D cave noise,
//! sprinkled with rare blocks, capped with the biome's surface block, and
//! occasionally topped by a tree.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::fractal::{BIOME_OCTAVES, CAVE_OCTAVES, Fbm, HEIGHT_OCTAVES};
use super::noise::NoiseField;
use crate::world::ChunkGenerator;
use crate::world::block::BlockId;
use crate::world::chunk::{Chunk, Dimensions};
use crate::world::position::ChunkPos;

pub const BIOME_SCALE: f64 = 0.005;
pub const TERRAIN_SCALE: f64 = 0.05;
pub const CAVE_SCALE: f64 = 0.1;
pub const SEA_LEVEL: u32 = 10;
pub const SNOW_LEVEL: u32 = 20;

/// Biome signal cut-offs; forest lies between them.
const DESERT_THRESHOLD: f64 = -0.3;
const MOUNTAIN_THRESHOLD: f64 = 0.3;
/// Cave noise above this carves air.
const CAVE_THRESHOLD: f64 = 0.5;

/// Per-voxel chance of a rare block deep below the surface.
pub const RARE_BLOCK_CHANCE: f64 = 0.001;
/// Per-column chance of a tree in forests.
pub const TREE_CHANCE: f64 = 0.015;

/// Block ids the synthesizer writes. Supplied by the game layer so the
/// engine never hard-codes a block table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub air: BlockId,
    pub stone: BlockId,
    pub dirt: BlockId,
    pub grass: BlockId,
    pub sand: BlockId,
    pub water: BlockId,
    /// Rare deposit placed deep underground.
    pub rare: BlockId,
}

/// Column classification. Computed on the fly, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biome {
    Desert,
    Mountain,
    Forest,
}

impl Biome {
    /// Classify a biome fBm sample.
    pub fn from_signal(signal: f64) -> Self {
        if signal < DESERT_THRESHOLD {
            Biome::Desert
        } else if signal > MOUNTAIN_THRESHOLD {
            Biome::Mountain
        } else {
            Biome::Forest
        }
    }

    pub const fn height_multiplier(self) -> f64 {
        match self {
            Biome::Desert => 0.5,
            Biome::Mountain => 1.5,
            Biome::Forest => 1.0,
        }
    }

    /// `(surface, subsurface)` blocks for this biome.
    pub const fn layers(self, palette: &Palette) -> (BlockId, BlockId) {
        match self {
            Biome::Desert => (palette.sand, palette.sand),
            Biome::Mountain => (palette.stone, palette.stone),
            Biome::Forest => (palette.grass, palette.dirt),
        }
    }
}

/// Deterministic terrain synthesizer.
///
/// Noise-driven fields (biome, height, caves) come from [`NoiseField`]. The
/// random features (rare blocks, trees) draw from a ChaCha stream seeded by
/// the world seed and the column's world coordinates, so regenerating a
/// column always yields the same blocks.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    noise: NoiseField,
    dims: Dimensions,
    palette: Palette,
    biome_fbm: Fbm,
    height_fbm: Fbm,
    cave_fbm: Fbm,
}

impl TerrainGenerator {
    pub fn new(seed: i64, dims: Dimensions, palette: Palette) -> Self {
        Self {
            noise: NoiseField::new(seed),
            dims,
            palette,
            biome_fbm: Fbm::new(BIOME_OCTAVES),
            height_fbm: Fbm::new(HEIGHT_OCTAVES),
            cave_fbm: Fbm::new(CAVE_OCTAVES),
        }
    }

    pub fn biome_signal(&self, x: i64, z: i64) -> f64 {
        self.biome_fbm
            .sample_2d(&self.noise, x as f64 * BIOME_SCALE, z as f64 * BIOME_SCALE)
    }

    pub fn biome_at(&self, x: i64, z: i64) -> Biome {
        Biome::from_signal(self.biome_signal(x, z))
    }

    /// Height of the surface block for a column in the given biome, clamped
    /// to `0..world_height`.
    pub fn surface_height(&self, x: i64, z: i64, biome: Biome) -> u32 {
        let signal = self
            .height_fbm
            .sample_2d(&self.noise, x as f64 * TERRAIN_SCALE, z as f64 * TERRAIN_SCALE);
        let base = (signal + 1.0) * 12.0 + 4.0;
        let height = (base * biome.height_multiplier()).floor();
        let top = self.dims.world_height.saturating_sub(1) as f64;
        height.clamp(0.0, top) as u32
    }

    /// 3D cave density at a voxel. Values above 0.5 are carved.
    pub fn cave_signal(&self, x: i64, y: u32, z: i64) -> f64 {
        self.cave_fbm.sample_3d(
            &self.noise,
            x as f64 * CAVE_SCALE,
            y as f64 * CAVE_SCALE,
            z as f64 * CAVE_SCALE,
        )
    }

    /// Synthesize one vertical column, bottom first.
    pub fn column(&self, x: i64, z: i64) -> Vec<BlockId> {
        let mut column = vec![self.palette.air; self.dims.world_height as usize];
        self.fill_column(x, z, &mut column);
        column
    }

    fn fill_column(&self, x: i64, z: i64, column: &mut [BlockId]) {
        let p = &self.palette;
        let height = column.len();
        let biome = self.biome_at(x, z);
        let (surface, subsurface) = biome.layers(p);
        let h = self.surface_height(x, z, biome) as usize;
        let mut rng = column_rng(self.noise.seed(), x, z);

        for (y, slot) in column.iter_mut().enumerate() {
            let mut block = p.air;
            if y < h {
                block = if y + 3 < h { p.stone } else { subsurface };
                if y + 1 < h && self.cave_signal(x, y as u32, z) > CAVE_THRESHOLD {
                    block = p.air;
                }
                // Rolled after carving: a rare block can sit inside a cave.
                if y + 5 < h && rng.gen_bool(RARE_BLOCK_CHANCE) {
                    block = p.rare;
                }
            } else if y < SEA_LEVEL as usize {
                block = p.water;
            }
            *slot = block;
        }

        if h >= height {
            return;
        }
        column[h] = if biome == Biome::Mountain && h >= SNOW_LEVEL as usize {
            p.stone
        } else {
            surface
        };

        if biome == Biome::Forest && h + 5 < height && rng.gen_bool(TREE_CHANCE) {
            let tree_height: usize = rng.gen_range(3..=5);
            for slot in &mut column[h + 1..h + tree_height] {
                *slot = p.stone;
            }
            if h + tree_height < height {
                column[h + tree_height] = p.dirt;
            }
        }
    }
}

impl ChunkGenerator for TerrainGenerator {
    fn generate(&self, pos: ChunkPos) -> Chunk {
        let size = self.dims.chunk_size;
        let mut chunk = Chunk::new_filled(self.dims, self.palette.air);
        let origin = pos.block_origin(size, 0);
        for lx in 0..size {
            for lz in 0..size {
                let column = chunk.column_mut(lx, lz);
                self.fill_column(origin.x + lx as i64, origin.z + lz as i64, column);
            }
        }
        chunk
    }
}

/// Independent random stream for one world column.
fn column_rng(seed: i64, x: i64, z: i64) -> ChaCha8Rng {
    let mut h = seed as u64;
    h ^= (x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    h = h.rotate_left(27) ^ (z as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    ChaCha8Rng::seed_from_u64(h)
}
