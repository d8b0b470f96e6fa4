//! Terrain grid mesh: construction, heightmap and noise passes, normals

use bytemuck::{Pod, Zeroable};
use ridge_core::{Result, RidgeError, Vec2, Vec3};

use crate::heightmap::Heightmap;
use crate::noise::{brownian, NoiseParams};

/// One terrain vertex, laid out for direct upload to a vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: Vec3,
    pub normal: Vec3,
    /// Position within the whole terrain, in [0, 1) on both axes
    pub global_uv: Vec2,
    /// Reserved, always zero
    pub local_uv: Vec2,
}

/// Which diagonal splits a grid cell into its two triangles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Diagonal {
    Left,
    Right,
}

impl Diagonal {
    /// Checkerboard pattern so neighbouring cells never share a diagonal
    /// direction.
    fn for_cell(x: u32, z: u32) -> Self {
        if (x % 2) == (z % 2) {
            Diagonal::Right
        } else {
            Diagonal::Left
        }
    }
}

/// A regular grid of vertices with triangle connectivity.
///
/// Vertex `(x, z)` lives at index `x + z * verts_x`. `width`/`height` count
/// cells, `verts_x`/`verts_z` count vertices and are always one larger.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    vertices: Vec<TerrainVertex>,
    indices: Vec<u32>,
    width: u32,
    height: u32,
    verts_x: u32,
    verts_z: u32,
}

impl TerrainMesh {
    /// Build a flat `mesh_size_x` x `mesh_size_z` cell grid spanning
    /// `target_x` by `target_z` world units.
    ///
    /// The grid starts at the origin and runs along +X and -Z. Positions and
    /// global UVs divide by the vertex count rather than the cell count, so
    /// the far edge stops one step short of the target extent.
    pub fn grid(mesh_size_x: u32, mesh_size_z: u32, target_x: f32, target_z: f32) -> Result<Self> {
        if mesh_size_x == 0 || mesh_size_z == 0 {
            return Err(RidgeError::InvalidDimensions(format!(
                "grid needs at least one cell per axis, got {}x{}",
                mesh_size_x, mesh_size_z
            )));
        }
        for (name, value) in [("target_x", target_x), ("target_z", target_z)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RidgeError::InvalidDimensions(format!(
                    "{} must be a positive finite extent, got {}",
                    name, value
                )));
            }
        }

        let verts_x = mesh_size_x as u64 + 1;
        let verts_z = mesh_size_z as u64 + 1;
        if verts_x * verts_z > u32::MAX as u64 {
            return Err(RidgeError::InvalidDimensions(format!(
                "{}x{} vertices do not fit 32-bit indices",
                verts_x, verts_z
            )));
        }
        let verts_x = verts_x as u32;
        let verts_z = verts_z as u32;

        let mut vertices = Vec::with_capacity(verts_x as usize * verts_z as usize);
        for z in 0..verts_z {
            for x in 0..verts_x {
                let position = Vec3::new(
                    x as f32 * target_x / verts_x as f32,
                    0.0,
                    -(z as f32) * target_z / verts_z as f32,
                );
                let global_uv = Vec2::new(x as f32 / verts_x as f32, z as f32 / verts_z as f32);
                vertices.push(TerrainVertex {
                    position,
                    global_uv,
                    ..Default::default()
                });
            }
        }

        let mut indices = Vec::with_capacity(mesh_size_x as usize * mesh_size_z as usize * 6);
        for z in 0..mesh_size_z {
            let row = z * verts_x;
            for x in 0..mesh_size_x {
                let tl = row + x;
                let tr = tl + 1;
                let bl = tl + verts_x;
                let br = bl + 1;

                match Diagonal::for_cell(x, z) {
                    Diagonal::Left => indices.extend_from_slice(&[tl, tr, bl, tr, br, bl]),
                    Diagonal::Right => indices.extend_from_slice(&[tl, tr, br, tl, br, bl]),
                }
            }
        }

        Ok(Self {
            vertices,
            indices,
            width: mesh_size_x,
            height: mesh_size_z,
            verts_x,
            verts_z,
        })
    }

    /// Cell count along X
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Cell count along Z
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn verts_x(&self) -> u32 {
        self.verts_x
    }

    pub fn verts_z(&self) -> u32 {
        self.verts_z
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    pub(crate) fn vertices_mut(&mut self) -> &mut [TerrainVertex] {
        &mut self.vertices
    }

    /// Triangle list, three indices per triangle, counter-clockwise from +Y
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Flat vertex index of grid coordinate `(x, z)`
    pub fn index_of(&self, x: u32, z: u32) -> usize {
        x as usize + z as usize * self.verts_x as usize
    }

    pub fn vertex_at(&self, x: u32, z: u32) -> &TerrainVertex {
        &self.vertices[self.index_of(x, z)]
    }

    /// Set every vertex's Y from a heightmap of exactly `verts_x` x `verts_z`
    /// pixels.
    pub fn apply_heightmap(&mut self, heightmap: &Heightmap) -> Result<()> {
        if (heightmap.width, heightmap.depth) != (self.verts_x, self.verts_z) {
            return Err(RidgeError::DimensionMismatch {
                what: "heightmap".to_string(),
                expected: (self.verts_x, self.verts_z),
                got: (heightmap.width, heightmap.depth),
            });
        }

        for (vertex, &h) in self.vertices.iter_mut().zip(heightmap.heights()) {
            vertex.position.y = h;
        }
        Ok(())
    }

    /// Add fractal noise to every vertex's Y.
    pub fn apply_noise(&mut self, params: &NoiseParams) {
        for vertex in &mut self.vertices {
            vertex.position = brownian(vertex.position, params);
        }
    }

    /// Recompute smooth vertex normals.
    ///
    /// Each triangle's unnormalized face normal is summed into its three
    /// vertices, so larger faces weigh more; the sums are normalized at the
    /// end.
    pub fn compute_normals(&mut self) {
        let mut accumulated = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let p1 = self.vertices[a].position;
            let p2 = self.vertices[b].position;
            let p3 = self.vertices[c].position;

            let face = (p2 - p1).cross(&(p3 - p1));
            accumulated[a] += face;
            accumulated[b] += face;
            accumulated[c] += face;
        }

        for (vertex, normal) in self.vertices.iter_mut().zip(accumulated) {
            vertex.normal = normal.normalized();
        }
    }

    /// Axis-aligned bounds of all vertex positions as `(min, max)`
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let init = (Vec3::new(f32::MAX, f32::MAX, f32::MAX), Vec3::new(f32::MIN, f32::MIN, f32::MIN));
        self.vertices.iter().fold(init, |(lo, hi), v| {
            (lo.min(&v.position), hi.max(&v.position))
        })
    }

    /// Vertex buffer contents
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer contents
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(mesh: &TerrainMesh, tri: &[u32]) -> Vec3 {
        let p = |i: u32| mesh.vertices()[i as usize].position;
        (p(tri[1]) - p(tri[0])).cross(&(p(tri[2]) - p(tri[0])))
    }

    #[test]
    fn test_grid_counts_match_resolution() {
        for (sx, sz) in [(1, 1), (2, 5), (7, 3), (16, 16)] {
            let mesh = TerrainMesh::grid(sx, sz, 100.0, 50.0).unwrap();
            assert_eq!(mesh.vertices().len(), ((sx + 1) * (sz + 1)) as usize);
            assert_eq!(mesh.indices().len(), (sx * sz * 6) as usize);
            assert_eq!(mesh.verts_x(), sx + 1);
            assert_eq!(mesh.verts_z(), sz + 1);
            assert_eq!((mesh.width(), mesh.height()), (sx, sz));
            assert!(mesh
                .indices()
                .iter()
                .all(|&i| (i as usize) < mesh.vertices().len()));
        }
    }

    #[test]
    fn test_every_triangle_winds_counter_clockwise() {
        let mesh = TerrainMesh::grid(6, 5, 30.0, 20.0).unwrap();
        for tri in mesh.indices().chunks_exact(3) {
            let n = face_normal(&mesh, tri);
            assert!(n.y > 0.0, "triangle {:?} faces down", tri);
        }
    }

    #[test]
    fn test_diagonals_alternate_in_checkerboard() {
        let mesh = TerrainMesh::grid(2, 2, 2.0, 2.0).unwrap();
        let cell = |n: usize| &mesh.indices()[n * 6..n * 6 + 6];
        // cell (0,0): right split, shares the tl-br diagonal
        assert_eq!(cell(0), &[0, 1, 4, 0, 4, 3]);
        // cell (1,0): left split, shares the tr-bl diagonal
        assert_eq!(cell(1), &[1, 2, 4, 2, 5, 4]);
        // cell (0,1) is left, cell (1,1) is right
        assert_eq!(cell(2), &[3, 4, 6, 4, 7, 6]);
        assert_eq!(cell(3), &[4, 5, 8, 4, 8, 7]);
    }

    #[test]
    fn test_non_square_grid_uses_row_stride() {
        let mesh = TerrainMesh::grid(3, 1, 3.0, 1.0).unwrap();
        // second vertex row starts at verts_x = 4
        assert_eq!(&mesh.indices()[0..3], &[0, 1, 5]);
        assert_eq!(mesh.vertex_at(0, 1).global_uv, Vec2::new(0.0, 0.5));
    }

    #[test]
    fn test_grid_rejects_degenerate_input() {
        assert!(TerrainMesh::grid(0, 4, 10.0, 10.0).is_err());
        assert!(TerrainMesh::grid(4, 4, 0.0, 10.0).is_err());
        assert!(TerrainMesh::grid(4, 4, 10.0, f32::NAN).is_err());
        assert!(TerrainMesh::grid(u32::MAX, 2, 10.0, 10.0).is_err());
    }

    #[test]
    fn test_heightmap_sets_y_in_scan_order() {
        let mut mesh = TerrainMesh::grid(2, 1, 4.0, 4.0).unwrap();
        let hm = Heightmap::from_raw(vec![0.0, 1.0, 2.0, 3.0, 4.0, 255.0], 3, 2).unwrap();
        mesh.apply_heightmap(&hm).unwrap();
        assert_eq!(mesh.vertex_at(2, 0).position.y, 2.0);
        assert_eq!(mesh.vertex_at(0, 1).position.y, 3.0);
        assert_eq!(mesh.vertex_at(2, 1).position.y, 255.0);
    }

    #[test]
    fn test_heightmap_size_mismatch_is_rejected() {
        let mut mesh = TerrainMesh::grid(2, 2, 4.0, 4.0).unwrap();
        let hm = Heightmap::from_raw(vec![0.0; 4], 2, 2).unwrap();
        match mesh.apply_heightmap(&hm) {
            Err(RidgeError::DimensionMismatch { expected, got, .. }) => {
                assert_eq!(expected, (3, 3));
                assert_eq!(got, (2, 2));
            }
            other => panic!("expected mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_flat_quad_normals_point_up() {
        let mut mesh = TerrainMesh::grid(1, 1, 1.0, 1.0).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        mesh.compute_normals();
        for v in mesh.vertices() {
            assert!((v.normal - Vec3::UP).length() < 1e-6, "{:?}", v.normal);
        }
    }

    #[test]
    fn test_normals_are_unit_length_on_bumpy_grid() {
        let mut mesh = TerrainMesh::grid(4, 4, 8.0, 8.0).unwrap();
        let heights: Vec<f32> = (0..25).map(|i| ((i * 37) % 11) as f32).collect();
        mesh.apply_heightmap(&Heightmap::from_raw(heights, 5, 5).unwrap())
            .unwrap();
        mesh.compute_normals();
        mesh.compute_normals();
        for v in mesh.vertices() {
            assert!((v.normal.length() - 1.0).abs() < 1e-5);
            assert!(v.normal.y > 0.0);
        }
    }

    #[test]
    fn test_noise_is_deterministic_and_keeps_xz() {
        let mut a = TerrainMesh::grid(8, 8, 64.0, 64.0).unwrap();
        let mut b = a.clone();
        let params = NoiseParams::default();
        a.apply_noise(&params);
        b.apply_noise(&params);
        assert_eq!(a.vertex_bytes(), b.vertex_bytes());

        let flat = TerrainMesh::grid(8, 8, 64.0, 64.0).unwrap();
        for (noisy, base) in a.vertices().iter().zip(flat.vertices()) {
            assert_eq!(noisy.position.x, base.position.x);
            assert_eq!(noisy.position.z, base.position.z);
        }
    }

    #[test]
    fn test_export_buffers_have_expected_sizes() {
        let mesh = TerrainMesh::grid(3, 2, 6.0, 4.0).unwrap();
        assert_eq!(std::mem::size_of::<TerrainVertex>(), 40);
        assert_eq!(mesh.vertex_bytes().len(), 12 * 40);
        assert_eq!(mesh.index_bytes().len(), 36 * 4);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_bounds_cover_grid() {
        let mesh = TerrainMesh::grid(4, 4, 40.0, 40.0).unwrap();
        let (lo, hi) = mesh.bounds();
        assert_eq!(lo, Vec3::new(0.0, 0.0, -32.0));
        assert_eq!(hi, Vec3::new(32.0, 0.0, 0.0));
    }
}
