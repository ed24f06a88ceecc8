pub mod world;
pub mod worldgen;
