//! Ridge Terrain - Grid, Bezier-patch and noise based terrain meshes
//!
//! Builds a coarse control grid (optionally shaped by a heightmap), refines
//! a finer grid against it with bicubic Bezier patches, adds fractal noise
//! and computes vertex normals. Does not touch any graphics API: outputs
//! raw vertex and index data for a renderer to upload.

pub mod bezier;
pub mod heightmap;
pub mod mesh;
pub mod noise;
pub mod patch;
pub mod terrain;

pub use heightmap::Heightmap;
pub use mesh::{TerrainMesh, TerrainVertex};
pub use noise::NoiseParams;
pub use terrain::{Terrain, TerrainConfig};
