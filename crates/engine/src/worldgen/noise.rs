//! Seeded lattice value noise in two and three dimensions.

/// Largest value [`int_hash`] can return.
const HASH_MAX: f64 = 0x7fff_ffff as f64;

/// Integer lattice hash: a fixed multiply-xor-shift permutation masked to
/// 31 bits.
///
/// Computed with wrapping 64-bit arithmetic. Only the low 31 bits survive the
/// final mask, and those bits are identical to an arbitrary-precision
/// evaluation of the same polynomial, so the output is stable everywhere.
#[inline]
pub const fn int_hash(n: i64) -> i64 {
    let n = n.wrapping_shl(13) ^ n;
    let inner = n.wrapping_mul(n).wrapping_mul(15731).wrapping_add(789_221);
    n.wrapping_mul(inner).wrapping_add(1_376_312_589) & 0x7fff_ffff
}

/// Map a lattice hash from `[0, 2^31 - 1]` onto `[-1, 1]`.
#[inline]
fn unit(hash: i64) -> f64 {
    (hash as f64 / HASH_MAX) * 2.0 - 1.0
}

/// Smoothstep fade `t^2 (3 - 2t)`.
#[inline]
fn smooth(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Split a coordinate into its lattice cell (floored toward negative
/// infinity) and the fractional offset in `[0, 1)`.
#[inline]
fn lattice(v: f64) -> (i64, f64) {
    let cell = v.floor();
    (cell as i64, v - cell)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Scalar value noise driven by a single integer seed.
///
/// Stateless apart from the seed: the same inputs always give bit-identical
/// outputs, and every output lies in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseField {
    seed: i64,
}

impl NoiseField {
    pub const fn new(seed: i64) -> Self {
        Self { seed }
    }

    pub const fn seed(&self) -> i64 {
        self.seed
    }

    #[inline]
    fn corner_2d(&self, ix: i64, iz: i64) -> f64 {
        unit(int_hash(ix.wrapping_add(int_hash(iz.wrapping_add(self.seed)))))
    }

    #[inline]
    fn corner_3d(&self, ix: i64, iy: i64, iz: i64) -> f64 {
        let hz = int_hash(iz.wrapping_add(self.seed));
        let hy = int_hash(iy.wrapping_add(hz));
        unit(int_hash(ix.wrapping_add(hy)))
    }

    /// 2D value noise with smoothstep-weighted bilinear interpolation.
    pub fn value_2d(&self, x: f64, z: f64) -> f64 {
        let (ix, fx) = lattice(x);
        let (iz, fz) = lattice(z);
        let u = smooth(fx);
        let v = smooth(fz);

        let r = self.corner_2d(ix, iz);
        let s = self.corner_2d(ix.wrapping_add(1), iz);
        let t = self.corner_2d(ix, iz.wrapping_add(1));
        let q = self.corner_2d(ix.wrapping_add(1), iz.wrapping_add(1));

        let value = r + (s - r) * u + (t - r) * v + (q - s - t + r) * u * v;
        value.clamp(-1.0, 1.0)
    }

    /// 3D value noise with smoothstep-weighted trilinear interpolation.
    pub fn value_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let (ix, fx) = lattice(x);
        let (iy, fy) = lattice(y);
        let (iz, fz) = lattice(z);
        let u = smooth(fx);
        let v = smooth(fy);
        let w = smooth(fz);

        let h000 = self.corner_3d(ix, iy, iz);
        let h100 = self.corner_3d(ix.wrapping_add(1), iy, iz);
        let h010 = self.corner_3d(ix, iy.wrapping_add(1), iz);
        let h110 = self.corner_3d(ix.wrapping_add(1), iy.wrapping_add(1), iz);
        let h001 = self.corner_3d(ix, iy, iz.wrapping_add(1));
        let h101 = self.corner_3d(ix.wrapping_add(1), iy, iz.wrapping_add(1));
        let h011 = self.corner_3d(ix, iy.wrapping_add(1), iz.wrapping_add(1));
        let h111 = self.corner_3d(ix.wrapping_add(1), iy.wrapping_add(1), iz.wrapping_add(1));

        let a = lerp(h000, h100, u);
        let b = lerp(h010, h110, u);
        let c = lerp(h001, h101, u);
        let d = lerp(h011, h111, u);
        let e = lerp(a, b, v);
        let f = lerp(c, d, v);
        lerp(e, f, w).clamp(-1.0, 1.0)
    }
}
