//! Noise, fBm and terrain synthesis tests. Block values are opaque ids from a
//! test palette; no game-specific block table is involved.

use voxsync_engine::world::ChunkGenerator;
use voxsync_engine::world::block::BlockId;
use voxsync_engine::world::chunk::Dimensions;
use voxsync_engine::world::position::ChunkPos;
use voxsync_engine::worldgen::fractal::{BIOME_OCTAVES, CAVE_OCTAVES, HEIGHT_OCTAVES};
use voxsync_engine::worldgen::terrain::{SEA_LEVEL, SNOW_LEVEL};
use voxsync_engine::worldgen::{Biome, Fbm, NoiseField, Palette, TerrainGenerator};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SEED: i64 = 12345;

fn palette() -> Palette {
    Palette {
        air: BlockId(0),
        dirt: BlockId(1),
        stone: BlockId(2),
        rare: BlockId(4),
        grass: BlockId(6),
        sand: BlockId(7),
        water: BlockId(8),
    }
}

fn generator() -> TerrainGenerator {
    TerrainGenerator::new(SEED, Dimensions::new(16, 48), palette())
}

/// A spread of sample coordinates including negatives, fractions, lattice
/// points and large magnitudes.
fn sample_points() -> Vec<f64> {
    let mut pts = vec![0.0, -0.0, 0.5, -0.5, 1.0, -1.0, 0.999_999, -0.000_001, 1e6, -1e6, 123.456];
    for i in -40..40 {
        pts.push(i as f64 * 0.37);
    }
    pts
}

// ---------------------------------------------------------------------------
// NoiseField
// ---------------------------------------------------------------------------

#[test]
fn value_2d_matches_reference_at_lattice_points() {
    let noise = NoiseField::new(SEED);
    // At integer coordinates the interpolation weights vanish and the result
    // is the rescaled corner hash itself.
    assert!((noise.value_2d(0.0, 0.0) - -0.259_693_192_904_672_2).abs() < 1e-12);
    assert!((noise.value_2d(-3.0, 5.0) - -0.845_486_740_509_740_4).abs() < 1e-12);
}

#[test]
fn value_3d_matches_reference_at_lattice_point() {
    let noise = NoiseField::new(SEED);
    assert!((noise.value_3d(1.0, 2.0, -4.0) - -0.979_740_140_018_863_7).abs() < 1e-12);
}

#[test]
fn noise_is_deterministic() {
    let a = NoiseField::new(SEED);
    let b = NoiseField::new(SEED);
    for &x in &sample_points() {
        for &z in &[0.25, -7.75, 31.1] {
            assert_eq!(a.value_2d(x, z).to_bits(), b.value_2d(x, z).to_bits());
            assert_eq!(a.value_3d(x, z, x).to_bits(), b.value_3d(x, z, x).to_bits());
        }
    }
}

#[test]
fn noise_stays_in_unit_range() {
    let noise = NoiseField::new(SEED);
    for &x in &sample_points() {
        for &z in &sample_points() {
            let v = noise.value_2d(x, z);
            assert!((-1.0..=1.0).contains(&v), "value_2d({x}, {z}) = {v}");
            let w = noise.value_3d(x, z * 0.5, z);
            assert!((-1.0..=1.0).contains(&w), "value_3d({x}, {z}) = {w}");
        }
    }
}

#[test]
fn noise_is_continuous_across_origin() {
    let noise = NoiseField::new(SEED);
    let eps = 1e-9;
    assert!((noise.value_2d(-eps, 0.0) - noise.value_2d(0.0, 0.0)).abs() < 1e-6);
    assert!((noise.value_2d(0.0, -eps) - noise.value_2d(0.0, 0.0)).abs() < 1e-6);
    assert!((noise.value_3d(-eps, -eps, -eps) - noise.value_3d(0.0, 0.0, 0.0)).abs() < 1e-6);
}

#[test]
fn different_seeds_differ() {
    let a = NoiseField::new(1);
    let b = NoiseField::new(2);
    let differs = sample_points()
        .iter()
        .any(|&x| a.value_2d(x, 0.3) != b.value_2d(x, 0.3));
    assert!(differs);
}

// ---------------------------------------------------------------------------
// Fbm
// ---------------------------------------------------------------------------

#[test]
fn fbm_single_octave_is_plain_noise() {
    let noise = NoiseField::new(SEED);
    let fbm = Fbm::new(1);
    assert_eq!(fbm.sample_2d(&noise, 3.3, -1.2), noise.value_2d(3.3, -1.2));
    assert_eq!(fbm.sample_3d(&noise, 3.3, 0.4, -1.2), noise.value_3d(3.3, 0.4, -1.2));
}

#[test]
fn fbm_stays_in_unit_range_for_every_octave_count() {
    let noise = NoiseField::new(SEED);
    for octaves in [1, BIOME_OCTAVES, HEIGHT_OCTAVES, CAVE_OCTAVES, 10] {
        let fbm = Fbm::new(octaves);
        for &x in &sample_points() {
            let v = fbm.sample_2d(&noise, x, x * 0.3);
            assert!((-1.0..=1.0).contains(&v));
            let w = fbm.sample_3d(&noise, x, 0.7, -x);
            assert!((-1.0..=1.0).contains(&w));
        }
    }
}

#[test]
fn fbm_zero_octaves_is_zero() {
    let noise = NoiseField::new(SEED);
    assert_eq!(Fbm::new(0).sample_2d(&noise, 1.5, 2.5), 0.0);
}

#[test]
fn fbm_custom_params_are_deterministic() {
    let noise = NoiseField::new(SEED);
    let fbm = Fbm::with_params(5, 2.2, 0.6);
    let a = fbm.sample_2d(&noise, 10.1, -3.4);
    let b = fbm.sample_2d(&noise, 10.1, -3.4);
    assert_eq!(a.to_bits(), b.to_bits());
}

// ---------------------------------------------------------------------------
// Terrain synthesis
// ---------------------------------------------------------------------------

#[test]
fn biome_thresholds() {
    assert_eq!(Biome::from_signal(-0.31), Biome::Desert);
    assert_eq!(Biome::from_signal(-0.3), Biome::Forest);
    assert_eq!(Biome::from_signal(0.0), Biome::Forest);
    assert_eq!(Biome::from_signal(0.3), Biome::Forest);
    assert_eq!(Biome::from_signal(0.31), Biome::Mountain);
}

#[test]
fn chunk_has_expected_shape_and_valid_ids() {
    let generator = generator();
    let chunk = generator.generate(ChunkPos::new(0, 0));
    let dims = chunk.dims();
    assert_eq!(dims, Dimensions::new(16, 48));

    let p = palette();
    let valid = [p.air, p.dirt, p.stone, p.rare, p.grass, p.sand, p.water];
    for x in 0..16 {
        for z in 0..16 {
            let column = chunk.column(x, z);
            assert_eq!(column.len(), 48);
            assert!(column.iter().all(|b| valid.contains(b)));
        }
    }
}

#[test]
fn scenario_a_top_of_column_is_air() {
    let generator = generator();
    let chunk = generator.generate(ChunkPos::new(0, 0));
    let biome = generator.biome_at(0, 0);
    let height = generator.surface_height(0, 0, biome);
    if height < 47 {
        assert_eq!(chunk.get(0, 0, 47), BlockId(0));
    }
}

#[test]
fn generation_is_fully_reproducible() {
    let generator = generator();
    for pos in [ChunkPos::new(0, 0), ChunkPos::new(-3, 7), ChunkPos::new(11, -2)] {
        assert_eq!(generator.generate(pos), generator.generate(pos));
    }
}

#[test]
fn chunk_columns_match_standalone_columns() {
    let generator = generator();
    let pos = ChunkPos::new(-1, 2);
    let chunk = generator.generate(pos);
    for (lx, lz) in [(0, 0), (15, 15), (3, 9)] {
        let wx = -16 + lx as i64;
        let wz = 32 + lz as i64;
        assert_eq!(chunk.column(lx, lz), generator.column(wx, wz).as_slice());
    }
}

#[test]
fn column_layers_follow_height_and_biome() {
    let generator = generator();
    let p = palette();
    for x in (-200..200).step_by(17) {
        for z in (-200..200).step_by(23) {
            let biome = generator.biome_at(x, z);
            let h = generator.surface_height(x, z, biome) as usize;
            let column = generator.column(x, z);
            let (surface, subsurface) = biome.layers(&p);

            // Surface block, with mountains above the snow line forced to stone.
            let expected_surface = if biome == Biome::Mountain && h >= SNOW_LEVEL as usize {
                p.stone
            } else {
                surface
            };
            assert_eq!(column[h], expected_surface, "surface at ({x}, {z})");

            for (y, &block) in column.iter().enumerate().take(h) {
                // Below the surface: stone, subsurface, cave air or rare deposit.
                let allowed = if y + 5 < h {
                    vec![p.stone, p.air, p.rare]
                } else if y + 3 < h {
                    vec![p.stone, p.air]
                } else if y + 1 < h {
                    vec![subsurface, p.air]
                } else {
                    vec![subsurface]
                };
                assert!(allowed.contains(&block), "({x}, {y}, {z}) = {block:?}");
            }

            // Water fills the gap between the surface and sea level, unless a
            // tree trunk stands there.
            if column[h + 1] == p.stone {
                continue;
            }
            for y in (h + 1)..(SEA_LEVEL as usize) {
                assert_eq!(column[y], p.water);
            }
        }
    }
}

#[test]
fn surface_height_respects_bounds() {
    let generator = TerrainGenerator::new(SEED, Dimensions::new(16, 20), palette());
    for x in (-500..500).step_by(37) {
        let biome = generator.biome_at(x, -x);
        assert!(generator.surface_height(x, -x, biome) <= 19);
    }
}

/// Height of the tree standing on a column, if any: trunk stone from `h + 1`
/// plus the dirt cap.
fn tree_height(column: &[BlockId], h: usize, p: &Palette) -> Option<usize> {
    let trunk = column[h + 1..].iter().take_while(|&&b| b == p.stone).count();
    (trunk > 0).then_some(trunk + 1)
}

#[test]
fn trees_only_grow_in_forests() {
    let generator = generator();
    let p = palette();
    let mut forest_columns = 0;
    let mut trees = 0;
    for x in 0..160 {
        for z in 0..160 {
            let biome = generator.biome_at(x, z);
            let h = generator.surface_height(x, z, biome) as usize;
            let column = generator.column(x, z);
            if biome == Biome::Forest {
                forest_columns += 1;
            }
            // Nothing but a trunk puts stone directly above the surface.
            if tree_height(&column, h, &p).is_some() {
                assert_eq!(biome, Biome::Forest, "tree outside forest at ({x}, {z})");
                trees += 1;
            }
        }
    }
    // ~1.5% of forest columns carry a tree.
    if forest_columns >= 1000 {
        assert!(trees > 0);
    }
}

#[test]
fn trees_have_stone_trunk_and_dirt_cap() {
    let generator = generator();
    let p = palette();
    let mut trees = 0;
    for x in -80..80 {
        for z in -80..80 {
            if generator.biome_at(x, z) != Biome::Forest {
                continue;
            }
            let h = generator.surface_height(x, z, Biome::Forest) as usize;
            let column = generator.column(x, z);
            let Some(tree) = tree_height(&column, h, &p) else {
                continue;
            };
            trees += 1;

            assert!((3..=5).contains(&tree), "tree of height {tree} at ({x}, {z})");
            assert_eq!(column[h], p.grass, "tree not rooted on grass at ({x}, {z})");
            assert!(column[h + 1..h + tree].iter().all(|&b| b == p.stone));
            assert_eq!(column[h + tree], p.dirt, "missing cap at ({x}, {z})");
            for (y, &block) in column.iter().enumerate().skip(h + tree + 1) {
                let expected = if y < SEA_LEVEL as usize { p.water } else { p.air };
                assert_eq!(block, expected, "({x}, {y}, {z}) above tree");
            }
        }
    }
    assert!(trees > 0, "no trees found in forest columns");
}

#[test]
fn no_tree_within_five_blocks_of_world_top() {
    // Same seed, two heights. Columns up to the surface draw the same random
    // stream, so a tree the tall world plants must vanish in the short one
    // once `h + 5` reaches the top.
    let tall = generator();
    let short = TerrainGenerator::new(SEED, Dimensions::new(16, 20), palette());
    let p = palette();
    let mut high_forest = 0;
    let mut suppressed = 0;
    for x in -100..100 {
        for z in -100..100 {
            if short.biome_at(x, z) != Biome::Forest {
                continue;
            }
            let h = short.surface_height(x, z, Biome::Forest) as usize;
            if h < 15 {
                continue;
            }
            high_forest += 1;
            let column = short.column(x, z);
            assert!(
                column[h + 1..].iter().all(|&b| b == p.air),
                "block above surface {h} at ({x}, {z}) in a 20-high world"
            );

            if h < 19 {
                let tall_column = tall.column(x, z);
                assert_eq!(&tall_column[..=h], &column[..=h]);
                if tree_height(&tall_column, h, &p).is_some() {
                    suppressed += 1;
                }
            }
        }
    }
    assert!(high_forest > 0, "no forest column reaches y=15");
    if high_forest >= 1000 {
        assert!(suppressed > 0);
    }
}
