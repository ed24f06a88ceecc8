//! Fractal Brownian motion over [`NoiseField`].

use super::noise::NoiseField;

/// Octave counts used by terrain synthesis. Fixed design constants.
pub const BIOME_OCTAVES: u32 = 4;
pub const HEIGHT_OCTAVES: u32 = 6;
pub const CAVE_OCTAVES: u32 = 4;

/// Multi-octave summation parameters.
///
/// Each octave samples the base noise at `frequency * coords` and weights it
/// by `amplitude`; both start at 1, frequency is multiplied by `lacunarity`
/// and amplitude by `gain` after every octave. The total is divided by the
/// sum of amplitudes, so output stays in `[-1, 1]` for any octave count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fbm {
    pub octaves: u32,
    pub lacunarity: f64,
    pub gain: f64,
}

impl Fbm {
    /// `octaves` rounds with the standard lacunarity 2.0 and gain 0.5.
    pub const fn new(octaves: u32) -> Self {
        Self {
            octaves,
            lacunarity: 2.0,
            gain: 0.5,
        }
    }

    pub const fn with_params(octaves: u32, lacunarity: f64, gain: f64) -> Self {
        Self {
            octaves,
            lacunarity,
            gain,
        }
    }

    fn accumulate(&self, mut sample: impl FnMut(f64) -> f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;
        for _ in 0..self.octaves {
            total += amplitude * sample(frequency);
            max_value += amplitude;
            frequency *= self.lacunarity;
            amplitude *= self.gain;
        }
        if max_value == 0.0 {
            return 0.0;
        }
        (total / max_value).clamp(-1.0, 1.0)
    }

    pub fn sample_2d(&self, noise: &NoiseField, x: f64, z: f64) -> f64 {
        self.accumulate(|f| noise.value_2d(x * f, z * f))
    }

    pub fn sample_3d(&self, noise: &NoiseField, x: f64, y: f64, z: f64) -> f64 {
        self.accumulate(|f| noise.value_3d(x * f, y * f, z * f))
    }
}
