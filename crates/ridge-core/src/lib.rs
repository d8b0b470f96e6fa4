//! Ridge Core - Foundational types for the Ridge terrain generator
//!
//! This crate provides the types the other Ridge crates depend on:
//! - `Vec2`, `Vec3` - Vertex-layout compatible vector types
//! - `ContentHash` - SHA-256 fingerprint of generated buffers
//! - Error types and Result alias

mod error;
mod hash;
mod types;

pub use error::{Result, RidgeError};
pub use hash::ContentHash;
pub use types::{Vec2, Vec3};
