//! Heightmap loading and sampling

use std::path::Path;

use ridge_core::{Result, RidgeError};

/// A grayscale heightmap.
///
/// Values are raw 8-bit gray levels (0..=255) stored as `f32`, so applying
/// the map to a mesh puts vertices between Y = 0 and Y = 255.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    /// Row-major height values
    heights: Vec<f32>,
    /// Width in pixels
    pub width: u32,
    /// Depth (height) in pixels
    pub depth: u32,
}

impl Heightmap {
    /// Load a heightmap from any image format the `image` crate decodes.
    /// Color images are converted to 8-bit luma first.
    pub fn from_png(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|e| {
            RidgeError::Heightmap(format!(
                "Failed to load heightmap '{}': {}",
                path.display(),
                e
            ))
        })?;

        let gray = img.into_luma8();
        let width = gray.width();
        let depth = gray.height();
        let heights: Vec<f32> = gray.pixels().map(|p| f32::from(p.0[0])).collect();

        Self::from_raw(heights, width, depth)
    }

    /// Create a heightmap from raw row-major data
    pub fn from_raw(heights: Vec<f32>, width: u32, depth: u32) -> Result<Self> {
        if width == 0 || depth == 0 {
            return Err(RidgeError::Heightmap(format!(
                "heightmap must be at least 1x1, got {}x{}",
                width, depth
            )));
        }
        let expected = width as usize * depth as usize;
        if heights.len() != expected {
            return Err(RidgeError::Heightmap(format!(
                "{}x{} heightmap needs {} values, got {}",
                width,
                depth,
                expected,
                heights.len()
            )));
        }
        Ok(Self {
            heights,
            width,
            depth,
        })
    }

    /// Row-major height values
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn get(&self, x: u32, z: u32) -> f32 {
        self.heights[(z * self.width + x) as usize]
    }

    /// Bilinear sample at normalized coordinates; (0, 0) and (1, 1) hit the
    /// first and last pixel exactly.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let fx = u * (self.width - 1) as f32;
        let fz = v * (self.depth - 1) as f32;

        let x0 = (fx as u32).min(self.width - 1);
        let z0 = (fz as u32).min(self.depth - 1);
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.depth - 1);

        let tx = fx - x0 as f32;
        let tz = fz - z0 as f32;

        let h00 = self.get(x0, z0);
        let h10 = self.get(x1, z0);
        let h01 = self.get(x0, z1);
        let h11 = self.get(x1, z1);

        let h0 = h00 * (1.0 - tx) + h10 * tx;
        let h1 = h01 * (1.0 - tx) + h11 * tx;

        h0 * (1.0 - tz) + h1 * tz
    }

    /// Bilinearly resample to `width` x `depth`, keeping the corner pixels.
    pub fn resampled(&self, width: u32, depth: u32) -> Result<Self> {
        let step = |i: u32, n: u32| if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };

        let mut heights = Vec::with_capacity(width as usize * depth as usize);
        for z in 0..depth {
            for x in 0..width {
                heights.push(self.sample(step(x, width), step(z, depth)));
            }
        }
        Self::from_raw(heights, width, depth)
    }
}
