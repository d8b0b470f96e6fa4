//! Terrain configuration and orchestration

use std::path::Path;

use ridge_core::{Result, RidgeError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::heightmap::Heightmap;
use crate::mesh::TerrainMesh;
use crate::noise::NoiseParams;

/// Configuration for terrain generation, usually read from a TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Grayscale image driving the coarse grid heights, relative to the
    /// config file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heightmap_path: Option<String>,
    /// Resample a heightmap whose size differs from the coarse vertex grid
    /// instead of rejecting it
    pub resample_heightmap: bool,
    /// World-space X extent
    pub width: f32,
    /// World-space Z extent
    pub depth: f32,
    /// Cells per edge of the coarse control grid
    pub coarse_resolution: u32,
    /// Cells per edge of the output grid
    pub fine_resolution: u32,
    /// Run the noise pass after refinement
    pub apply_noise: bool,
    pub noise: NoiseParams,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            heightmap_path: None,
            resample_heightmap: false,
            width: 1024.0,
            depth: 1024.0,
            coarse_resolution: 63,
            fine_resolution: 255,
            apply_noise: true,
            noise: NoiseParams::default(),
        }
    }
}

fn out_of_range(field: &str, min: f64, max: f64, value: f64) -> RidgeError {
    RidgeError::ValueOutOfRange {
        field: field.to_string(),
        min,
        max,
        value,
    }
}

impl TerrainConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        let max_extent = f32::MAX as f64;
        for (field, value) in [("width", self.width), ("depth", self.depth)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(out_of_range(field, 0.0, max_extent, value as f64));
            }
        }

        if self.coarse_resolution < 3 {
            return Err(out_of_range(
                "coarse_resolution",
                3.0,
                u32::MAX as f64,
                self.coarse_resolution as f64,
            ));
        }
        if self.fine_resolution == 0 {
            return Err(out_of_range("fine_resolution", 1.0, u32::MAX as f64, 0.0));
        }

        let noise = &self.noise;
        for (field, value) in [
            ("noise.frequency", noise.frequency),
            ("noise.lacunarity", noise.lacunarity),
            ("noise.gain", noise.gain),
            ("noise.scale", noise.scale),
        ] {
            if !value.is_finite() {
                return Err(out_of_range(field, f64::MIN, f64::MAX, value as f64));
            }
        }
        if noise.octaves > 32 {
            return Err(out_of_range("noise.octaves", 0.0, 32.0, noise.octaves as f64));
        }

        if let Some(path) = &self.heightmap_path {
            if path.trim().is_empty() {
                return Err(RidgeError::Config(
                    "heightmap_path is set but empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// A generated terrain: the coarse control grid and the refined output mesh
pub struct Terrain {
    /// Control grid the output was refined against
    pub coarse: TerrainMesh,
    /// Output mesh with final heights and normals
    pub mesh: TerrainMesh,
}

impl Terrain {
    /// Run the full pipeline.
    ///
    /// Coarse grid, optional heightmap, fine grid, Bezier refinement against
    /// the coarse grid, noise, normals.
    pub fn generate(config: &TerrainConfig, heightmap: Option<&Heightmap>) -> Result<Self> {
        config.validate()?;

        let mut coarse = TerrainMesh::grid(
            config.coarse_resolution,
            config.coarse_resolution,
            config.width,
            config.depth,
        )?;

        if let Some(hm) = heightmap {
            let grid_size = (coarse.verts_x(), coarse.verts_z());
            if (hm.width, hm.depth) != grid_size && config.resample_heightmap {
                warn!(
                    "resampling {}x{} heightmap to {}x{}",
                    hm.width, hm.depth, grid_size.0, grid_size.1
                );
                coarse.apply_heightmap(&hm.resampled(grid_size.0, grid_size.1)?)?;
            } else {
                coarse.apply_heightmap(hm)?;
            }
        }

        let mut mesh = TerrainMesh::grid(
            config.fine_resolution,
            config.fine_resolution,
            config.width,
            config.depth,
        )?;
        mesh.refine_from(&coarse)?;

        if config.apply_noise {
            info!("applying {} octaves of noise", config.noise.octaves);
            mesh.apply_noise(&config.noise);
        }

        mesh.compute_normals();
        coarse.compute_normals();

        info!(
            "terrain ready: {} vertices, {} triangles",
            mesh.vertices().len(),
            mesh.triangle_count()
        );

        Ok(Self { coarse, mesh })
    }

    /// Load the configured heightmap (resolved against `base_dir`) and run
    /// the pipeline.
    pub fn load(config: &TerrainConfig, base_dir: &Path) -> Result<Self> {
        let heightmap = match &config.heightmap_path {
            Some(rel) => {
                let path = base_dir.join(rel);
                info!("loading heightmap {}", path.display());
                Some(Heightmap::from_png(&path)?)
            }
            None => None,
        };
        Self::generate(config, heightmap.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> TerrainConfig {
        TerrainConfig {
            width: 60.0,
            depth: 60.0,
            coarse_resolution: 6,
            fine_resolution: 12,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        TerrainConfig::default().validate().unwrap();
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config = TerrainConfig::from_toml_str(
            r#"
            width = 200.0
            fine_resolution = 64
            apply_noise = false

            [noise]
            octaves = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.width, 200.0);
        assert_eq!(config.depth, 1024.0);
        assert_eq!(config.fine_resolution, 64);
        assert!(!config.apply_noise);
        assert_eq!(config.noise.octaves, 4);
        assert_eq!(config.noise.gain, 0.65);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = TerrainConfig {
            heightmap_path: Some("maps/valley.png".to_string()),
            ..small_config()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(TerrainConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad = [
            TerrainConfig { width: -1.0, ..small_config() },
            TerrainConfig { coarse_resolution: 2, ..small_config() },
            TerrainConfig { fine_resolution: 0, ..small_config() },
            TerrainConfig {
                noise: NoiseParams { octaves: 64, ..Default::default() },
                ..small_config()
            },
            TerrainConfig {
                heightmap_path: Some("  ".to_string()),
                ..small_config()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{:?}", config);
        }

        let err = TerrainConfig::from_toml_str("depth = 0.0").unwrap_err();
        assert!(matches!(err, RidgeError::ValueOutOfRange { .. }));
    }

    #[test]
    fn test_flat_terrain_without_noise_is_flat() {
        let config = TerrainConfig {
            apply_noise: false,
            ..small_config()
        };
        let terrain = Terrain::generate(&config, None).unwrap();
        assert_eq!(terrain.mesh.vertices().len(), 13 * 13);
        assert!(terrain.mesh.vertices().iter().all(|v| v.position.y == 0.0));
        assert!(terrain.mesh.vertices().iter().all(|v| v.normal == ridge_core::Vec3::UP));
    }

    #[test]
    fn test_heightmap_size_must_match_unless_resampling() {
        let hm = Heightmap::from_raw(vec![100.0; 16], 4, 4).unwrap();
        let config = small_config();
        assert!(matches!(
            Terrain::generate(&config, Some(&hm)),
            Err(RidgeError::DimensionMismatch { .. })
        ));

        let config = TerrainConfig {
            resample_heightmap: true,
            apply_noise: false,
            ..small_config()
        };
        let terrain = Terrain::generate(&config, Some(&hm)).unwrap();
        assert!(terrain
            .coarse
            .vertices()
            .iter()
            .all(|v| (v.position.y - 100.0).abs() < 1e-3));
        assert!(terrain
            .mesh
            .vertices()
            .iter()
            .all(|v| (v.position.y - 100.0).abs() < 1e-3));
    }

    #[test]
    fn test_generation_is_reproducible() {
        let config = small_config();
        let a = Terrain::generate(&config, None).unwrap();
        let b = Terrain::generate(&config, None).unwrap();
        assert_eq!(a.mesh.vertex_bytes(), b.mesh.vertex_bytes());
        assert_eq!(a.mesh.index_bytes(), b.mesh.index_bytes());
    }

    #[test]
    fn test_load_resolves_heightmap_against_base_dir() {
        let dir = std::env::temp_dir().join("ridge_terrain_load");
        std::fs::create_dir_all(&dir).unwrap();
        let img = image::GrayImage::from_pixel(7, 7, image::Luma([40u8]));
        img.save(dir.join("hm.png")).unwrap();

        let config = TerrainConfig {
            heightmap_path: Some("hm.png".to_string()),
            apply_noise: false,
            ..small_config()
        };
        let terrain = Terrain::load(&config, &dir).unwrap();
        let _ = std::fs::remove_dir_all(&dir);

        assert!(terrain.coarse.vertices().iter().all(|v| v.position.y == 40.0));
    }
}
