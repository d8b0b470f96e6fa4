//! Wavefront OBJ export of a terrain mesh

use ridge_terrain::TerrainMesh;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write `mesh` to `path` as OBJ with positions, normals and global UVs.
pub fn write_obj(mesh: &TerrainMesh, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_obj_to(mesh, &mut out)?;
    out.flush()
}

pub fn write_obj_to<W: Write>(mesh: &TerrainMesh, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "# ridge terrain: {} vertices, {} triangles",
        mesh.vertices().len(),
        mesh.triangle_count()
    )?;

    for v in mesh.vertices() {
        let p = v.position;
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for v in mesh.vertices() {
        let n = v.normal;
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for v in mesh.vertices() {
        writeln!(out, "vt {} {}", v.global_uv.x, v.global_uv.y)?;
    }

    // OBJ indices are 1-based
    for tri in mesh.indices().chunks_exact(3) {
        let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
        writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cell_obj() {
        let mut mesh = TerrainMesh::grid(1, 1, 2.0, 2.0).unwrap();
        mesh.compute_normals();

        let mut buf = Vec::new();
        write_obj_to(&mesh, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 4);
        assert_eq!(text.lines().filter(|l| l.starts_with("vt ")).count(), 4);
        assert!(text.contains("f 1/1/1 2/2/2 4/4/4"));
        assert!(text.contains("f 1/1/1 4/4/4 3/3/3"));
        assert!(text.contains("vn 0 1 0"));
    }
}
