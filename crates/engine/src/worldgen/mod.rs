//! Deterministic terrain generation.
//!
//! Layered leaves-first: [`noise`] (lattice value noise) feeds [`fractal`]
//! (multi-octave fBm), which feeds [`terrain`] (biome, height and column
//! synthesis). The whole pipeline is a pure function of the world seed.

pub mod fractal;
pub mod noise;
pub mod terrain;

pub use fractal::Fbm;
pub use noise::NoiseField;
pub use terrain::{Biome, Palette, TerrainGenerator};
