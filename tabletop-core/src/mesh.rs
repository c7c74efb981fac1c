//! Mesh data structures and functionality

use crate::error::{Error, Result};
use bytemuck::{Pod, Zeroable};
use nalgebra::Point3;

/// A single interleaved vertex as uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }

    /// Build a vertex from a hand-authored `[x, y, z, u, v, nx, ny, nz]` row
    pub const fn from_row(row: [f32; 8]) -> Self {
        Self {
            position: [row[0], row[1], row[2]],
            uv: [row[3], row[4]],
            normal: [row[5], row[6], row[7]],
        }
    }
}

/// An indexed triangle list
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a mesh from vertices and triangle indices
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self> {
        let name = name.into();
        if indices.len() % 3 != 0 {
            return Err(Error::InvalidData(format!(
                "mesh '{}': {} indices do not form whole triangles",
                name,
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(Error::InvalidData(format!(
                "mesh '{}': index {} out of range for {} vertices",
                name,
                bad,
                vertices.len()
            )));
        }
        Ok(Self { name, vertices, indices })
    }

    /// Create a mesh from a flat, non-indexed triangle list
    pub fn from_triangles(name: impl Into<String>, vertices: Vec<Vertex>) -> Result<Self> {
        let indices = (0..vertices.len() as u32).collect();
        Self::new(name, vertices, indices)
    }

    /// Triangulate a convex polygon as a fan around its first vertex
    pub fn from_fan(name: impl Into<String>, vertices: Vec<Vertex>) -> Result<Self> {
        let name = name.into();
        if vertices.len() < 3 {
            return Err(Error::InvalidData(format!(
                "mesh '{}': a fan needs at least 3 vertices, got {}",
                name,
                vertices.len()
            )));
        }
        let indices = (1..vertices.len() as u32 - 1)
            .flat_map(|i| [0, i, i + 1])
            .collect();
        Self::new(name, vertices, indices)
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Axis-aligned bounds as (min, max), `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.vertices.first()?;
        let mut min = Point3::from(first.position);
        let mut max = min;
        for v in &self.vertices[1..] {
            for axis in 0..3 {
                min[axis] = min[axis].min(v.position[axis]);
                max[axis] = max[axis].max(v.position[axis]);
            }
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Vertex> {
        let n = [0.0, 0.0, 1.0];
        vec![
            Vertex::new([0.0, 0.0, 0.0], n, [0.0, 0.0]),
            Vertex::new([1.0, 0.0, 0.0], n, [1.0, 0.0]),
            Vertex::new([1.0, 1.0, 0.0], n, [1.0, 1.0]),
            Vertex::new([0.0, 1.0, 0.0], n, [0.0, 1.0]),
        ]
    }

    #[test]
    fn test_from_row_reorders_uv_and_normal() {
        let v = Vertex::from_row([1.0, 2.0, 3.0, 0.25, 0.75, 0.0, -1.0, 0.0]);
        assert_eq!(v.position, [1.0, 2.0, 3.0]);
        assert_eq!(v.uv, [0.25, 0.75]);
        assert_eq!(v.normal, [0.0, -1.0, 0.0]);
    }

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 8 * std::mem::size_of::<f32>());
    }

    #[test]
    fn test_fan_triangulation() {
        let mesh = Mesh::from_fan("quad", square()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_fan_rejects_degenerate_polygon() {
        let verts = square()[..2].to_vec();
        assert!(matches!(Mesh::from_fan("line", verts), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_triangles_require_whole_triangles() {
        let verts = square();
        assert!(Mesh::from_triangles("bad", verts).is_err());
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let result = Mesh::new("bad", square(), vec![0, 1, 4]);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_bounds() {
        let mesh = Mesh::from_fan("quad", square()).unwrap();
        let (min, max) = mesh.bounds().unwrap();
        assert_relative_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(max, Point3::new(1.0, 1.0, 0.0));

        let empty = Mesh::new("empty", Vec::new(), Vec::new()).unwrap();
        assert!(empty.is_empty());
        assert!(empty.bounds().is_none());
    }
}
