//! Procedural cylinder geometry
//!
//! The side is a ring of quads around the Y axis, centered on the origin.
//! Disks lie in the XY plane facing +Z and are positioned by the scene.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mesh::{Mesh, Vertex};

/// Four side vertices per segment must stay addressable by `u32` indices
pub const MAX_SEGMENTS: u32 = u32::MAX / 4;

/// Shape parameters shared by a cylinder side and its end disks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderParams {
    pub radius: f32,
    pub height: f32,
    pub segments: u32,
}

impl CylinderParams {
    pub const fn new(radius: f32, height: f32, segments: u32) -> Self {
        Self { radius, height, segments }
    }

    /// Reject shapes that would produce degenerate or NaN geometry
    pub fn validate(&self) -> Result<()> {
        if !(3..=MAX_SEGMENTS).contains(&self.segments) {
            return Err(Error::InvalidParameter(format!(
                "cylinder needs 3 to {} segments, got {}",
                MAX_SEGMENTS, self.segments
            )));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "cylinder radius must be positive, got {}",
                self.radius
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "cylinder height must be positive, got {}",
                self.height
            )));
        }
        Ok(())
    }

    /// Angle of the `i`-th sample around the circle
    fn theta(&self, i: u32) -> f32 {
        TAU * i as f32 / self.segments as f32
    }
}

/// Lateral surface: one quad per segment, four vertices each
pub fn cylinder_side(name: &str, params: CylinderParams) -> Result<Mesh> {
    params.validate()?;
    let n = params.segments;
    let half = params.height / 2.0;

    let mut vertices = Vec::with_capacity(4 * n as usize);
    let mut indices = Vec::with_capacity(6 * n as usize);

    for i in 0..n {
        let base = vertices.len() as u32;
        for (k, theta) in [params.theta(i), params.theta(i + 1)].into_iter().enumerate() {
            let (sin, cos) = theta.sin_cos();
            let x = params.radius * cos;
            let z = params.radius * sin;
            let normal = [cos, 0.0, sin];
            let u = (i + k as u32) as f32 / n as f32;

            vertices.push(Vertex::new([x, half, z], normal, [u, 0.0]));
            vertices.push(Vertex::new([x, -half, z], normal, [u, 1.0]));
        }
        // top_i, bottom_i, top_i+1, bottom_i+1
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }

    Mesh::new(name, vertices, indices)
}

/// End disk of radius `params.radius`, triangulated as a fan
pub fn cylinder_disk(name: &str, params: CylinderParams) -> Result<Mesh> {
    params.validate()?;
    let vertices = (0..params.segments)
        .map(|i| {
            let (sin, cos) = params.theta(i).sin_cos();
            Vertex::new(
                [params.radius * cos, params.radius * sin, 0.0],
                [0.0, 0.0, 1.0],
                [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
            )
        })
        .collect();
    Mesh::from_fan(name, vertices)
}
