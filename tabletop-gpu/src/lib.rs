//! # Tabletop GPU
//!
//! wgpu rendering for the tabletop desk scene: device and surface setup,
//! texture loading with mipmaps, and a textured two-light Phong renderer.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use tabletop_core::{FlyCamera, Lighting, RenderConfig, Scene};
//! use tabletop_gpu::{GpuContext, SceneRenderer, TextureSet};
//!
//! async fn example(window: Arc<winit::window::Window>) -> tabletop_core::Result<()> {
//!     let ctx = GpuContext::for_window(window, true).await?;
//!     let scene = Scene::desk()?;
//!     let textures = TextureSet::load(&ctx, Path::new("."), &scene.texture_slots())?;
//!     let renderer = SceneRenderer::new(&ctx, &scene, &textures, Lighting::default(), RenderConfig::default())?;
//!     renderer.render(&ctx, &FlyCamera::default())
//! }
//! ```

pub mod device;
pub mod renderer;
pub mod texture;

pub use device::GpuContext;
pub use renderer::{vertex_layout, GlobalsUniform, GpuMesh, LightUniform, ModelUniform, SceneRenderer};
pub use texture::{load_image, mip_chain, mip_level_count, Texture, TextureSet};
