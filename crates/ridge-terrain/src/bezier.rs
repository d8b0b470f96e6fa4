//! Cubic Bezier curves and 16-point bicubic patches

use ridge_core::Vec3;

/// Evaluate a cubic Bezier curve at `t` in [0, 1].
///
/// Bernstein weights are expanded by hand instead of going through `powi`.
pub fn cubic_bezier(cps: &[Vec3; 4], t: f32) -> Vec3 {
    let s = 1.0 - t;
    let w0 = s * s * s;
    let w1 = 3.0 * t * s * s;
    let w2 = 3.0 * s * t * t;
    let w3 = t * t * t;

    cps[0] * w0 + cps[1] * w1 + cps[2] * w2 + cps[3] * w3
}

/// Evaluate a bicubic patch at `(u, v)`.
///
/// `cps` is four rows of four control points, row-major in `u`. Each row is
/// reduced along `u` first, then the four results along `v`.
pub fn bezier_patch(cps: &[Vec3; 16], u: f32, v: f32) -> Vec3 {
    let mut along_u = [Vec3::ZERO; 4];
    for (row, point) in along_u.iter_mut().enumerate() {
        let curve = [
            cps[row * 4],
            cps[row * 4 + 1],
            cps[row * 4 + 2],
            cps[row * 4 + 3],
        ];
        *point = cubic_bezier(&curve, u);
    }
    cubic_bezier(&along_u, v)
}
