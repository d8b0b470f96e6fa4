//! Config initialization command

use anyhow::{Context, Result};
use ridge_terrain::TerrainConfig;
use std::fs;
use std::path::Path;

pub fn run(path: &str) -> Result<()> {
    let target = Path::new(path);

    if target.exists() {
        anyhow::bail!("File '{}' already exists", path);
    }

    let content = TerrainConfig::default()
        .to_toml_string()
        .context("Failed to serialize default config")?;
    fs::write(target, content).with_context(|| format!("Failed to write '{}'", path))?;

    println!("Created terrain config: {}", path);
    println!();
    println!("Next steps:");
    println!("  set heightmap_path to a grayscale image of coarse_resolution + 1 pixels per edge");
    println!("  ridge generate --config {} --output terrain.obj", path);

    Ok(())
}
