//! Core data structures for the tabletop viewer
//!
//! Everything here is plain CPU-side data and math, independent of any
//! graphics API:
//! - Interleaved vertices and indexed meshes
//! - The hand-authored primitives and procedural cylinders of the desk scene
//! - Model transforms, the fly camera and its projections
//! - Two-light Phong parameters with a CPU reference of the shader
//! - Viewer configuration

pub mod camera;
pub mod config;
pub mod cylinder;
pub mod error;
pub mod lighting;
pub mod mesh;
pub mod primitives;
pub mod scene;
pub mod transform;

pub use camera::*;
pub use config::*;
pub use cylinder::*;
pub use error::*;
pub use lighting::*;
pub use mesh::*;
pub use scene::*;
pub use transform::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point3, Vector3};
