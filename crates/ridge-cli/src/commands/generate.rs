//! Terrain generation command

use anyhow::{Context, Result};
use ridge_core::ContentHash;
use ridge_terrain::{Heightmap, Terrain, TerrainConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::obj;

pub struct GenerateArgs {
    pub config: Option<String>,
    pub heightmap: Option<String>,
    pub output: Option<String>,
    pub coarse: Option<u32>,
    pub fine: Option<u32>,
    pub no_noise: bool,
    pub format: String,
}

#[derive(Serialize)]
struct Summary {
    coarse_resolution: u32,
    fine_resolution: u32,
    vertices: usize,
    triangles: usize,
    bounds_min: [f32; 3],
    bounds_max: [f32; 3],
    fingerprint: String,
    output: Option<String>,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let (mut config, base_dir) = match &args.config {
        Some(path) => {
            let config = TerrainConfig::load(Path::new(path))
                .with_context(|| format!("Failed to load config '{}'", path))?;
            let base_dir = Path::new(path)
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            (config, base_dir)
        }
        None => (TerrainConfig::default(), PathBuf::new()),
    };

    if let Some(c) = args.coarse {
        config.coarse_resolution = c;
    }
    if let Some(f) = args.fine {
        config.fine_resolution = f;
    }
    if args.no_noise {
        config.apply_noise = false;
    }
    config.validate().context("Invalid terrain settings")?;

    let terrain = match &args.heightmap {
        Some(path) => {
            let heightmap = Heightmap::from_png(Path::new(path))
                .with_context(|| format!("Failed to load heightmap '{}'", path))?;
            Terrain::generate(&config, Some(&heightmap))
        }
        None => Terrain::load(&config, &base_dir),
    }
    .context("Failed to generate terrain")?;

    let mesh = &terrain.mesh;
    let fingerprint = ContentHash::from_parts(&[mesh.vertex_bytes(), mesh.index_bytes()]);

    if let Some(out) = &args.output {
        obj::write_obj(mesh, Path::new(out))
            .with_context(|| format!("Failed to write '{}'", out))?;
    }

    let (lo, hi) = mesh.bounds();
    let summary = Summary {
        coarse_resolution: config.coarse_resolution,
        fine_resolution: config.fine_resolution,
        vertices: mesh.vertices().len(),
        triangles: mesh.triangle_count(),
        bounds_min: lo.to_array(),
        bounds_max: hi.to_array(),
        fingerprint: fingerprint.to_hex(),
        output: args.output.clone(),
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Terrain: {}x{} cells refined from {}x{} control grid",
            summary.fine_resolution,
            summary.fine_resolution,
            summary.coarse_resolution,
            summary.coarse_resolution
        );
        println!("Vertices:  {}", summary.vertices);
        println!("Triangles: {}", summary.triangles);
        println!(
            "Bounds:    ({:.2}, {:.2}, {:.2}) .. ({:.2}, {:.2}, {:.2})",
            lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
        );
        println!("Fingerprint: {}", fingerprint);
        if let Some(out) = &summary.output {
            println!("Wrote {}", out);
        }
    }

    Ok(())
}
