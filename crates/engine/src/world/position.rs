use std::fmt;

/// Absolute block position in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl BlockPos {
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// The chunk column this block belongs to. Floors toward negative
    /// infinity, so `x = -1` lands in chunk `-1`, not `0`.
    pub const fn chunk(&self, chunk_size: u32) -> ChunkPos {
        let size = chunk_size as i64;
        ChunkPos {
            x: self.x.div_euclid(size) as i32,
            z: self.z.div_euclid(size) as i32,
        }
    }

    /// Position within the chunk. `x` and `z` are always in `0..chunk_size`.
    pub const fn local(&self, chunk_size: u32) -> LocalBlockPos {
        let size = chunk_size as i64;
        LocalBlockPos {
            x: self.x.rem_euclid(size) as u32,
            y: self.y,
            z: self.z.rem_euclid(size) as u32,
        }
    }
}

/// Chunk column position, in chunk units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// World position of the chunk's `(0, y, 0)` corner.
    pub const fn block_origin(&self, chunk_size: u32, y: i64) -> BlockPos {
        let size = chunk_size as i64;
        BlockPos::new(self.x as i64 * size, y, self.z as i64 * size)
    }

    /// Inverse of [`BlockPos::local`]: rebuild the absolute position.
    pub const fn to_world(&self, chunk_size: u32, local: LocalBlockPos) -> BlockPos {
        let origin = self.block_origin(chunk_size, local.y);
        BlockPos::new(origin.x + local.x as i64, local.y, origin.z + local.z as i64)
    }

    /// The square of chunks within `radius` of this one (inclusive), row by
    /// row in x then z. Radius 1 gives the 3x3 neighborhood.
    pub fn neighborhood(&self, radius: i32) -> Vec<ChunkPos> {
        let side = (2 * radius + 1).max(0) as usize;
        let mut out = Vec::with_capacity(side * side);
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                out.push(ChunkPos::new(self.x + dx, self.z + dz));
            }
        }
        out
    }
}

/// Wire key form: `"{x}_{z}"`.
impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.x, self.z)
    }
}

/// Block position local to a chunk (x, z in 0..chunk_size).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalBlockPos {
    pub x: u32,
    pub y: i64,
    pub z: u32,
}
