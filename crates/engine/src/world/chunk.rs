use super::block::BlockId;

/// Horizontal and vertical extent shared by every chunk in a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Blocks along x and z.
    pub chunk_size: u32,
    /// Blocks along y; valid heights are `0..world_height`.
    pub world_height: u32,
}

impl Dimensions {
    pub const fn new(chunk_size: u32, world_height: u32) -> Self {
        Self {
            chunk_size,
            world_height,
        }
    }

    pub const fn volume(&self) -> usize {
        self.chunk_size as usize * self.chunk_size as usize * self.world_height as usize
    }

    pub const fn contains_y(&self, y: i64) -> bool {
        y >= 0 && y < self.world_height as i64
    }
}

/// A dense `chunk_size x chunk_size x world_height` column of blocks.
///
/// Stored as a flat array in `[x][z][y]` order so a whole vertical column is
/// one contiguous slice: terrain synthesis writes columns, spawn search and
/// the wire encoder read them.
#[derive(Clone, PartialEq, Eq)]
pub struct Chunk {
    dims: Dimensions,
    blocks: Box<[BlockId]>,
}

impl Chunk {
    pub fn new_filled(dims: Dimensions, block: BlockId) -> Self {
        Self {
            dims,
            blocks: vec![block; dims.volume()].into_boxed_slice(),
        }
    }

    pub fn new_empty(dims: Dimensions) -> Self {
        Self::new_filled(dims, BlockId::AIR)
    }

    #[inline]
    fn column_start(&self, x: u32, z: u32) -> usize {
        debug_assert!(x < self.dims.chunk_size && z < self.dims.chunk_size);
        (x as usize * self.dims.chunk_size as usize + z as usize) * self.dims.world_height as usize
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Block at local `(x, z)` and height `y`. Heights outside the chunk read
    /// as air.
    #[inline]
    pub fn get(&self, x: u32, z: u32, y: i64) -> BlockId {
        if !self.dims.contains_y(y) {
            return BlockId::AIR;
        }
        self.blocks[self.column_start(x, z) + y as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, z: u32, y: u32, block: BlockId) {
        let idx = self.column_start(x, z) + y as usize;
        self.blocks[idx] = block;
    }

    /// The full vertical column at local `(x, z)`, bottom first.
    pub fn column(&self, x: u32, z: u32) -> &[BlockId] {
        let start = self.column_start(x, z);
        &self.blocks[start..start + self.dims.world_height as usize]
    }

    pub fn column_mut(&mut self, x: u32, z: u32) -> &mut [BlockId] {
        let start = self.column_start(x, z);
        let height = self.dims.world_height as usize;
        &mut self.blocks[start..start + height]
    }

    /// Number of non-air blocks.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| **b != BlockId::AIR).count()
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("dims", &self.dims)
            .field("solid", &self.solid_count())
            .finish()
    }
}
