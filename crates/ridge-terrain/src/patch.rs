//! Piecewise bicubic refinement of a fine grid against a coarse control grid
//!
//! Every 3 coarse cells form one patch of 4x4 control points, so adjacent
//! patches share their boundary row or column.

use ridge_core::{Result, RidgeError, Vec3};
use tracing::{debug, info};

use crate::bezier::bezier_patch;
use crate::mesh::TerrainMesh;

/// Cells spanned by one patch along each axis
const PATCH_SPAN: u32 = 3;

/// Read the 4x4 control points whose top-left vertex is at flat `offset`
/// in `source`, row by row.
///
/// The caller guarantees `offset + 3 * verts_x + 3` is a valid vertex.
pub fn control_patch(source: &TerrainMesh, offset: usize) -> [Vec3; 16] {
    let stride = source.verts_x() as usize;
    let vertices = source.vertices();
    let mut cps = [Vec3::ZERO; 16];
    for row in 0..4 {
        let start = offset + row * stride;
        for col in 0..4 {
            cps[row * 4 + col] = vertices[start + col].position;
        }
    }
    cps
}

/// Patch origin and local parameter for a coarse-grid coordinate.
///
/// The origin snaps down to a multiple of [`PATCH_SPAN`] but never past the
/// last whole patch. Cells beyond it (when `cells` is not a multiple of
/// [`PATCH_SPAN`]) extend that patch's polynomial with a local parameter
/// above 1, so the surface stays continuous up to the far edge.
fn locate(coord: f32, cells: u32) -> (u32, f32) {
    let cell = coord as u32;
    let last = (cells - PATCH_SPAN) / PATCH_SPAN * PATCH_SPAN;
    let origin = (cell - cell % PATCH_SPAN).min(last);
    let local = (coord - origin as f32) / PATCH_SPAN as f32;
    (origin, local)
}

impl TerrainMesh {
    /// Replace every vertex's Y with the height of the bicubic patch of
    /// `coarse` that owns its global UV. X and Z are untouched.
    pub fn refine_from(&mut self, coarse: &TerrainMesh) -> Result<()> {
        if coarse.width() < PATCH_SPAN || coarse.height() < PATCH_SPAN {
            return Err(RidgeError::InvalidDimensions(format!(
                "refinement needs a coarse grid of at least {0}x{0} cells, got {1}x{2}",
                PATCH_SPAN,
                coarse.width(),
                coarse.height()
            )));
        }

        let coarse_width = coarse.width() as f32;
        let coarse_height = coarse.height() as f32;
        let stride = coarse.verts_x() as usize;

        let total = self.vertices().len();
        let report_every = total / 100;
        let mut percent = 0;

        info!(
            "refining {}x{} grid against {}x{} control grid",
            self.width(),
            self.height(),
            coarse.width(),
            coarse.height()
        );

        for (i, vertex) in self.vertices_mut().iter_mut().enumerate() {
            let (origin_x, u) = locate(vertex.global_uv.x * coarse_width, coarse.width());
            let (origin_z, v) = locate(vertex.global_uv.y * coarse_height, coarse.height());

            let patch_id = origin_x as usize + origin_z as usize * stride;
            vertex.position.y = bezier_patch(&control_patch(coarse, patch_id), u, v).y;

            if report_every > 0 && (i + 1) % report_every == 0 && percent < 100 {
                percent += 1;
                debug!("{}% bezier processed", percent);
            }
        }

        Ok(())
    }
}
