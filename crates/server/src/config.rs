//! Server and world configuration.
//!
//! Loaded from an optional TOML file; CLI flags in `main.rs` override
//! individual fields afterwards. Every field has a default, so an empty file
//! (or no file) yields the stock 64x64 spawn world with seed 12345.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use voxsync_engine::world::chunk::Dimensions;
use voxsync_engine::world::position::ChunkPos;

/// World generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: i64,
    pub chunk_size: u32,
    pub world_height: u32,
    /// Extent of the nominal spawn area; spawn is at its center.
    pub world_width: u32,
    pub world_depth: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            chunk_size: 16,
            world_height: 48,
            world_width: 64,
            world_depth: 64,
        }
    }
}

impl WorldConfig {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.chunk_size, self.world_height)
    }

    /// World `(x, z)` of the spawn column.
    pub fn center_column(&self) -> (i64, i64) {
        ((self.world_width / 2) as i64, (self.world_depth / 2) as i64)
    }

    /// Chunk containing the spawn column.
    pub fn spawn_chunk(&self) -> ChunkPos {
        ChunkPos::new(
            (self.world_width / 2 / self.chunk_size) as i32,
            (self.world_depth / 2 / self.chunk_size) as i32,
        )
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.chunk_size > 0, "chunk_size must be positive");
        ensure!(self.world_height > 0, "world_height must be positive");
        ensure!(
            self.world_height <= u16::MAX as u32,
            "world_height {} is unreasonably large",
            self.world_height
        );
        Ok(())
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the WebSocket/HTTP listener binds to.
    pub bind: String,
    pub world: WorldConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".into(),
            world: WorldConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ServerConfig = toml::from_str(text).context("invalid config TOML")?;
        config.world.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("loading config {}", path.display()))
    }
}
