/// Opaque block identifier. The engine stores these without interpreting them.
/// Game-specific layers assign meaning to specific IDs (e.g. 0 = air, 7 = sand).
///
/// The only semantic the engine relies on is that `BlockId::AIR` (0) is the
/// "empty" block: out-of-range reads resolve to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BlockId(pub u16);

impl BlockId {
    /// The universal "empty" block.
    pub const AIR: BlockId = BlockId(0);

    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }
}
