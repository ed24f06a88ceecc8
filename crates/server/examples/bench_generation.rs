//! Benchmark: sequential vs parallel chunk generation.
//!
//! Materializes a square of chunks one at a time, then the same square through
//! `ChunkStore::get_many`, and checks both stores hold identical terrain.
//! Run with: `cargo run --release -p voxsync-server --example bench_generation`

use std::time::Instant;

use voxsync_engine::world::ChunkStore;
use voxsync_engine::world::position::ChunkPos;
use voxsync_engine::worldgen::TerrainGenerator;
use voxsync_server::block;
use voxsync_server::config::WorldConfig;

fn main() {
    let side: i32 = 16;
    let config = WorldConfig::default();
    let positions: Vec<ChunkPos> = (0..side)
        .flat_map(|x| (0..side).map(move |z| ChunkPos::new(x, z)))
        .collect();

    println!("=== Chunk Generation Benchmark ===\n");
    println!(
        "  {} chunks ({}x{} grid), {}x{}x{} blocks each, seed {}\n",
        positions.len(),
        side,
        side,
        config.chunk_size,
        config.chunk_size,
        config.world_height,
        config.seed
    );

    // --- Sequential ---
    let seq = build_store(&config);
    let t0 = Instant::now();
    for &pos in &positions {
        seq.get(pos);
    }
    let dt_seq = t0.elapsed();
    println!("  Sequential: {:>6} chunks in {:>8.2?}", seq.generated_count(), dt_seq);

    // --- Parallel ---
    let par = build_store(&config);
    let t0 = Instant::now();
    par.get_many(&positions);
    let dt_par = t0.elapsed();
    println!("  Parallel:   {:>6} chunks in {:>8.2?}", par.generated_count(), dt_par);

    let speedup = dt_seq.as_secs_f64() / dt_par.as_secs_f64();
    println!("\n  Speedup: {:.2}x", speedup);

    // --- Verify identical ---
    let mismatches = positions
        .iter()
        .filter(|&&pos| seq.get(pos) != par.get(pos))
        .count();

    if mismatches == 0 {
        println!("  Verification: PASS (stores identical)");
    } else {
        println!("  Verification: FAIL ({} chunks differ!)", mismatches);
    }
}

fn build_store(config: &WorldConfig) -> ChunkStore {
    let generator = TerrainGenerator::new(
        config.seed,
        config.dimensions(),
        block::terrain_palette(),
    );
    ChunkStore::new(config.dimensions(), Box::new(generator))
}
