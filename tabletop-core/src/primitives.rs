//! Hand-authored scene primitives
//!
//! Rows are `[x, y, z, u, v, nx, ny, nz]`, three rows per triangle.

use crate::error::Result;
use crate::mesh::{Mesh, Vertex};

type Row = [f32; 8];

#[rustfmt::skip]
const PYRAMID: [Row; 18] = [
    // base, -Y
    [-0.5, 0.0,  0.5,  0.0, 0.0,  0.0, -1.0, 0.0],
    [ 0.5, 0.0,  0.5,  1.0, 1.0,  0.0, -1.0, 0.0],
    [ 0.5, 0.0, -0.5,  0.0, 0.0,  0.0, -1.0, 0.0],
    [-0.5, 0.0,  0.5,  0.0, 0.0,  0.0, -1.0, 0.0],
    [ 0.5, 0.0, -0.5,  0.0, 0.0,  0.0, -1.0, 0.0],
    [-0.5, 0.0, -0.5,  1.0, 0.0,  0.0, -1.0, 0.0],
    // +Z
    [-0.5, 0.0,  0.5,  0.0, 0.0,  0.0, 0.0, 1.0],
    [ 0.5, 0.0,  0.5,  1.0, 0.0,  0.0, 0.0, 1.0],
    [ 0.0, 1.0,  0.0,  1.0, 1.0,  0.0, 0.0, 1.0],
    // +X
    [ 0.5, 0.0,  0.5,  1.0, 0.0,  1.0, 0.0, 0.0],
    [ 0.5, 0.0, -0.5,  0.0, 0.0,  1.0, 0.0, 0.0],
    [ 0.0, 1.0,  0.0,  1.0, 1.0,  1.0, 0.0, 0.0],
    // -Z
    [ 0.5, 0.0, -0.5,  0.0, 0.0,  0.0, 0.0, -1.0],
    [-0.5, 0.0, -0.5,  1.0, 0.0,  0.0, 0.0, -1.0],
    [ 0.0, 1.0,  0.0,  1.0, 1.0,  0.0, 0.0, -1.0],
    // -X
    [-0.5, 0.0,  0.5,  0.0, 0.0,  -1.0, 0.0, 0.0],
    [-0.5, 0.0, -0.5,  1.0, 0.0,  -1.0, 0.0, 0.0],
    [ 0.0, 1.0,  0.0,  1.0, 1.0,  -1.0, 0.0, 0.0],
];

#[rustfmt::skip]
const PLANE: [Row; 6] = [
    [-0.5, -0.5, -0.5,  0.0, 0.0,  0.0, 1.0, 0.0],
    [ 0.5, -0.5, -0.5,  1.0, 0.0,  0.0, 1.0, 0.0],
    [ 0.5, -0.5,  0.5,  1.0, 1.0,  0.0, 1.0, 0.0],
    [ 0.5, -0.5,  0.5,  1.0, 1.0,  0.0, 1.0, 0.0],
    [-0.5, -0.5,  0.5,  0.0, 1.0,  0.0, 1.0, 0.0],
    [-0.5, -0.5, -0.5,  0.0, 0.0,  0.0, 1.0, 0.0],
];

/// Extents of an open-backed block whose front face sits at z = 0 and
/// extends towards -z, as used by the cube, tissue box and watch hands.
struct Block {
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    depth: f32,
}

impl Block {
    /// Twelve triangles with the per-face uv layout the textures were painted for.
    #[rustfmt::skip]
    fn rows(&self) -> [Row; 36] {
        let Block { left: l, right: r, bottom: b, top: t, depth } = *self;
        let d = -depth;
        [
            // +Z
            [r, t, 0.0,  1.0, 1.0,  0.0, 0.0, 1.0],
            [r, b, 0.0,  1.0, 0.0,  0.0, 0.0, 1.0],
            [l, t, 0.0,  0.0, 1.0,  0.0, 0.0, 1.0],
            [r, b, 0.0,  1.0, 0.0,  0.0, 0.0, 1.0],
            [l, b, 0.0,  0.0, 0.0,  0.0, 0.0, 1.0],
            [l, t, 0.0,  0.0, 1.0,  0.0, 0.0, 1.0],
            // +X
            [r, t, 0.0,  1.0, 1.0,  1.0, 0.0, 0.0],
            [r, b, 0.0,  1.0, 0.0,  1.0, 0.0, 0.0],
            [r, b, d,    0.0, 0.0,  1.0, 0.0, 0.0],
            [r, t, 0.0,  1.0, 1.0,  1.0, 0.0, 0.0],
            [r, b, d,    0.0, 0.0,  1.0, 0.0, 0.0],
            [r, t, d,    0.0, 1.0,  1.0, 0.0, 0.0],
            // +Y
            [r, t, 0.0,  1.0, 1.0,  0.0, 1.0, 0.0],
            [r, t, d,    1.0, 0.0,  0.0, 1.0, 0.0],
            [l, t, d,    0.0, 0.0,  0.0, 1.0, 0.0],
            [r, t, 0.0,  1.0, 1.0,  0.0, 1.0, 0.0],
            [l, t, 0.0,  0.0, 1.0,  0.0, 1.0, 0.0],
            [l, t, d,    0.0, 0.0,  0.0, 1.0, 0.0],
            // -Z
            [r, b, d,    0.0, 0.0,  0.0, 0.0, -1.0],
            [r, t, d,    0.0, 1.0,  0.0, 0.0, -1.0],
            [l, t, d,    1.0, 1.0,  0.0, 0.0, -1.0],
            [r, b, d,    0.0, 0.0,  0.0, 0.0, -1.0],
            [l, t, d,    1.0, 1.0,  0.0, 0.0, -1.0],
            [l, b, d,    1.0, 0.0,  0.0, 0.0, -1.0],
            // -X
            [l, b, 0.0,  0.0, 0.0,  -1.0, 0.0, 0.0],
            [l, t, 0.0,  0.0, 1.0,  -1.0, 0.0, 0.0],
            [l, t, d,    1.0, 1.0,  -1.0, 0.0, 0.0],
            [l, b, 0.0,  0.0, 0.0,  -1.0, 0.0, 0.0],
            [l, t, d,    1.0, 1.0,  -1.0, 0.0, 0.0],
            [l, b, d,    1.0, 0.0,  -1.0, 0.0, 0.0],
            // -Y
            [r, b, 0.0,  1.0, 0.0,  0.0, -1.0, 0.0],
            [r, b, d,    0.0, 0.0,  0.0, -1.0, 0.0],
            [l, b, d,    1.0, 0.0,  0.0, -1.0, 0.0],
            [r, b, 0.0,  1.0, 0.0,  0.0, -1.0, 0.0],
            [l, b, 0.0,  0.0, 0.0,  0.0, -1.0, 0.0],
            [l, b, d,    1.0, 0.0,  0.0, -1.0, 0.0],
        ]
    }

    fn mesh(&self, name: &str) -> Result<Mesh> {
        from_rows(name, &self.rows())
    }
}

fn from_rows(name: &str, rows: &[Row]) -> Result<Mesh> {
    let vertices = rows.iter().copied().map(Vertex::from_row).collect();
    Mesh::from_triangles(name, vertices)
}

/// Square-based pyramid, base on y = 0, tip at y = 1
pub fn pyramid() -> Result<Mesh> {
    from_rows("pyramid", &PYRAMID)
}

/// Unit-wide block one unit deep
pub fn cube() -> Result<Mesh> {
    Block { left: -0.5, right: 0.5, bottom: -0.5, top: 0.5, depth: 1.0 }.mesh("cube")
}

/// Unit floor quad at y = -0.5, facing up
pub fn plane() -> Result<Mesh> {
    from_rows("plane", &PLANE)
}

/// 1.25 x 1 x 2 tissue box
pub fn tissue_box() -> Result<Mesh> {
    Block { left: -0.5, right: 0.75, bottom: -0.5, top: 0.5, depth: 2.0 }.mesh("tissue_box")
}

/// Thin bar used for both watch hands
pub fn watch_hand() -> Result<Mesh> {
    Block { left: -0.1, right: 0.1, bottom: -0.02, top: 0.02, depth: 2.0 }.mesh("watch_hand")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn assert_unit_normals(mesh: &Mesh) {
        for v in &mesh.vertices {
            assert_relative_eq!(Vector3::from(v.normal).norm(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_triangle_counts() {
        assert_eq!(pyramid().unwrap().triangle_count(), 6);
        assert_eq!(cube().unwrap().triangle_count(), 12);
        assert_eq!(plane().unwrap().triangle_count(), 2);
        assert_eq!(tissue_box().unwrap().triangle_count(), 12);
        assert_eq!(watch_hand().unwrap().triangle_count(), 12);
    }

    #[test]
    fn test_normals_are_axis_aligned_units() {
        for mesh in [pyramid(), cube(), plane(), tissue_box(), watch_hand()] {
            assert_unit_normals(&mesh.unwrap());
        }
    }

    #[test]
    fn test_tissue_box_extents() {
        let (min, max) = tissue_box().unwrap().bounds().unwrap();
        assert_relative_eq!(max.x - min.x, 1.25);
        assert_relative_eq!(max.y - min.y, 1.0);
        assert_relative_eq!(max.z - min.z, 2.0);
        assert_relative_eq!(max.z, 0.0);
    }

    #[test]
    fn test_pyramid_tip() {
        let (_, max) = pyramid().unwrap().bounds().unwrap();
        assert_relative_eq!(max.y, 1.0);
    }

    #[test]
    fn test_plane_faces_up() {
        let mesh = plane().unwrap();
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert!(mesh.vertices.iter().all(|v| v.position[1] == -0.5));
    }

    #[test]
    fn test_face_normals_point_outward() {
        let mesh = cube().unwrap();
        let (min, max) = mesh.bounds().unwrap();
        let center = nalgebra::center(&min, &max);
        for v in &mesh.vertices {
            let outward = nalgebra::Point3::from(v.position) - center;
            assert!(outward.dot(&Vector3::from(v.normal)) > 0.0);
        }
    }
}
