//! Hash-based lattice noise and fractal Brownian displacement
//!
//! The hash constants and the interpolation scheme are pinned: changing
//! either changes every generated terrain, so they are reproduced exactly
//! rather than swapped for a general purpose noise library.

use ridge_core::Vec3;
use serde::{Deserialize, Serialize};

/// Pi as the single-precision literal the noise was tuned with.
#[allow(clippy::approx_constant)]
const PI_LITERAL: f64 = 3.1415927;

/// Parameters for [`brownian`] displacement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Multiplier applied to world X/Z before the first octave
    pub frequency: f32,
    /// Number of layers summed
    pub octaves: u32,
    /// Per-octave frequency multiplier
    pub lacunarity: f32,
    /// Starting amplitude and per-octave amplitude multiplier
    pub gain: f32,
    /// Multiplier on the summed noise before it is added to Y
    pub scale: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            frequency: 400.0,
            octaves: 8,
            lacunarity: 1.7,
            gain: 0.65,
            scale: 1.5,
        }
    }
}

/// Pseudo-random value in [-1, 1] for an integer lattice point.
pub fn seeded_random(x: i32, y: i32) -> f32 {
    let n = x.wrapping_add(y.wrapping_mul(57));
    let n = n.wrapping_shl(13) ^ n;
    let hashed = n
        .wrapping_mul(
            n.wrapping_mul(n)
                .wrapping_mul(60493)
                .wrapping_add(19990303),
        )
        .wrapping_add(1376312589)
        & 0x7fff_ffff;
    (1.0 - f64::from(hashed as f32) / 1073741824.0) as f32
}

/// Cosine-weighted blend of `a` and `b` at parameter `t`.
pub fn cosine_interpolate(a: f32, b: f32, t: f32) -> f32 {
    let ft = (f64::from(t) * PI_LITERAL) as f32;
    let f = ((1.0 - f64::from(ft.cos())) * 0.5) as f32;
    (f64::from(a) * (1.0 - f64::from(f)) + f64::from(b) * f64::from(f)) as f32
}

/// Blend of the four lattice values around `(x, z)`.
///
/// The interpolation parameter is the integer coordinate itself, not a
/// fractional offset, so the result is a cheap jitter rather than smooth
/// gradient noise.
pub fn lattice_noise(x: i32, z: i32) -> f32 {
    let s = seeded_random(x, z);
    let t = seeded_random(x.wrapping_add(1), z);
    let u = seeded_random(x, z.wrapping_add(1));
    let v = seeded_random(x.wrapping_add(1), z.wrapping_add(1));

    let near = cosine_interpolate(s, t, x as f32);
    let far = cosine_interpolate(u, v, x as f32);
    cosine_interpolate(near, far, z as f32)
}

/// Displace `pos` vertically by a fractal sum of [`lattice_noise`] octaves.
///
/// Only Y changes. Sample coordinates are truncated toward zero after
/// scaling by the current frequency.
pub fn brownian(pos: Vec3, params: &NoiseParams) -> Vec3 {
    let mut total = 0.0_f64;
    let mut frequency = params.frequency;
    let mut amplitude = params.gain;

    for _ in 0..params.octaves {
        let sample = lattice_noise((pos.x * frequency) as i32, (pos.z * frequency) as i32);
        total += f64::from(sample * amplitude);
        frequency *= params.lacunarity;
        amplitude *= params.gain;
    }

    let y = f64::from(pos.y) + total * f64::from(params.scale);
    Vec3::new(pos.x, y as f32, pos.z)
}
