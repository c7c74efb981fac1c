//! Textured Phong renderer for a static scene

use std::collections::BTreeMap;

use bytemuck::{Pod, Zeroable};
use nalgebra::Matrix4;
use tabletop_core::{
    Error, FlyCamera, Lighting, Mesh, MeshSlot, PointLight, RenderConfig, Result, Scene, SceneObject,
    Transform3D, Vertex,
};

use crate::device::GpuContext;
use crate::texture::TextureSet;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    // Position
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    // Normal
    wgpu::VertexAttribute {
        offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x3,
    },
    // UV
    wgpu::VertexAttribute {
        offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x2,
    },
];

/// Vertex buffer layout matching [`Vertex`]
pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// One light as the shader sees it
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub color: [f32; 4],
    /// ambient strength, specular intensity, highlight size, enabled
    pub params: [f32; 4],
}

impl From<&PointLight> for LightUniform {
    fn from(light: &PointLight) -> Self {
        let [x, y, z] = light.position;
        let [r, g, b] = light.color;
        Self {
            position: [x, y, z, 1.0],
            color: [r, g, b, 1.0],
            params: [
                light.ambient_strength,
                light.specular_intensity,
                light.highlight_size,
                if light.enabled { 1.0 } else { 0.0 },
            ],
        }
    }
}

/// Per-frame uniforms shared by every draw
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GlobalsUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    pub uv_scale: [f32; 4],
    pub key_light: LightUniform,
    pub fill_light: LightUniform,
}

impl GlobalsUniform {
    pub fn new(camera: &FlyCamera, width: u32, height: u32, lighting: &Lighting) -> Self {
        let p = camera.position;
        let [su, sv] = lighting.uv_scale;
        Self {
            view: camera.view_matrix().into(),
            projection: camera.projection_matrix(width, height).into(),
            view_position: [p.x, p.y, p.z, 1.0],
            uv_scale: [su, sv, 0.0, 0.0],
            key_light: (&lighting.key).into(),
            fill_light: (&lighting.fill).into(),
        }
    }
}

/// Per-object model and normal matrices
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl From<&Transform3D> for ModelUniform {
    fn from(transform: &Transform3D) -> Self {
        let model: Matrix4<f32> = transform.matrix;
        Self {
            model: model.into(),
            normal_matrix: transform.normal_matrix().into(),
        }
    }
}

/// Vertex and index buffers of one uploaded mesh
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(ctx: &GpuContext, mesh: &Mesh) -> Self {
        Self {
            vertex_buffer: ctx.create_buffer_init(&format!("{} vertices", mesh.name), &mesh.vertices, wgpu::BufferUsages::VERTEX),
            index_buffer: ctx.create_buffer_init(&format!("{} indices", mesh.name), &mesh.indices, wgpu::BufferUsages::INDEX),
            index_count: mesh.indices.len() as u32,
        }
    }
}

struct DrawCall {
    mesh: MeshSlot,
    bind_group: wgpu::BindGroup,
}

struct DepthTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTarget {
    fn new(ctx: &GpuContext) -> Self {
        let (width, height) = ctx.size();
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { _texture: texture, view }
    }
}

/// Draws every object of a [`Scene`] with its texture under two point lights
///
/// Geometry, textures and per-object uniforms are uploaded once in
/// [`SceneRenderer::new`]; each frame only rewrites the globals buffer.
pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    meshes: BTreeMap<MeshSlot, GpuMesh>,
    draws: Vec<DrawCall>,
    depth: Option<DepthTarget>,
    pub lighting: Lighting,
    pub config: RenderConfig,
}

impl SceneRenderer {
    pub fn new(
        ctx: &GpuContext,
        scene: &Scene,
        textures: &TextureSet,
        lighting: Lighting,
        config: RenderConfig,
    ) -> Result<Self> {
        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let globals_layout = ctx.create_bind_group_layout("globals_bind_group_layout", &[uniform_entry(0)]);
        let object_layout = ctx.create_bind_group_layout(
            "object_bind_group_layout",
            &[
                uniform_entry(0),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        );

        let (width, height) = ctx.size();
        let globals = GlobalsUniform::new(&FlyCamera::default(), width, height, &lighting);
        let globals_buffer = ctx.create_buffer_init(
            "Globals Buffer",
            &[globals],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let globals_bind_group = ctx.create_bind_group(
            "globals_bind_group",
            &globals_layout,
            &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        );

        let meshes: BTreeMap<MeshSlot, GpuMesh> = scene
            .meshes
            .iter()
            .map(|(&slot, mesh)| (slot, GpuMesh::upload(ctx, mesh)))
            .collect();

        let draws = scene
            .objects
            .iter()
            .map(|object| Self::create_draw_call(ctx, &object_layout, textures, object))
            .collect::<Result<Vec<_>>>()?;

        let shader = ctx.create_shader_module("Phong Shader", include_str!("shaders/phong.wgsl"));
        let pipeline = Self::create_render_pipeline(
            &ctx.device,
            &[&globals_layout, &object_layout],
            &shader,
            ctx.surface_format(),
            &config,
        );

        let depth = config.enable_depth_test.then(|| DepthTarget::new(ctx));

        log::info!(
            "Scene renderer ready: {} meshes, {} draw calls",
            meshes.len(),
            draws.len()
        );

        Ok(Self {
            pipeline,
            globals_buffer,
            globals_bind_group,
            meshes,
            draws,
            depth,
            lighting,
            config,
        })
    }

    fn create_draw_call(
        ctx: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        textures: &TextureSet,
        object: &SceneObject,
    ) -> Result<DrawCall> {
        let texture = textures.get(object.texture).ok_or_else(|| {
            Error::InvalidData(format!("{}: texture {:?} was not loaded", object.label, object.texture))
        })?;
        let uniform = ModelUniform::from(&object.transform);
        let buffer = ctx.create_buffer_init(object.label, &[uniform], wgpu::BufferUsages::UNIFORM);
        let bind_group = ctx.create_bind_group(
            object.label,
            layout,
            &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        );
        Ok(DrawCall {
            mesh: object.mesh,
            bind_group,
        })
    }

    fn create_render_pipeline(
        device: &wgpu::Device,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        config: &RenderConfig,
    ) -> wgpu::RenderPipeline {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Phong Render Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Phong Render Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vs_main",
                buffers: &[vertex_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            // Open boxes and single-sided quads are seen from both sides
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: if config.enable_depth_test {
                Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                })
            } else {
                None
            },
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        })
    }

    /// Recreate size-dependent targets after [`GpuContext::resize`]
    pub fn resize(&mut self, ctx: &GpuContext) {
        if self.depth.is_some() {
            self.depth = Some(DepthTarget::new(ctx));
        }
    }

    /// Draw one frame from the camera's point of view
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render(&self, ctx: &GpuContext, camera: &FlyCamera) -> Result<()> {
        let (width, height) = ctx.size();
        let globals = GlobalsUniform::new(camera, width, height, &self.lighting);
        ctx.queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let output = match ctx.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                ctx.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring surface texture, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(Error::Gpu(format!("Failed to get surface texture: {}", e))),
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Render Encoder"),
        });

        {
            let [r, g, b, a] = self.config.background_color;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: self.depth.as_ref().map(|depth| wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for draw in &self.draws {
                let Some(mesh) = self.meshes.get(&draw.mesh) else {
                    continue;
                };
                render_pass.set_bind_group(1, &draw.bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn test_uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 48);
        assert_eq!(std::mem::size_of::<GlobalsUniform>(), 256);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 128);
    }

    #[test]
    fn test_vertex_layout_matches_vertex() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 32);
        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
    }

    #[test]
    fn test_light_packing() {
        let mut light = PointLight::key();
        let packed = LightUniform::from(&light);
        assert_eq!(packed.position, [20.0, 15.0, -15.0, 1.0]);
        assert_eq!(packed.params, [0.3, 0.1, 16.0, 1.0]);

        light.enabled = false;
        assert_eq!(LightUniform::from(&light).params[3], 0.0);
    }

    #[test]
    fn test_globals_carry_camera_and_uv_scale() {
        let camera = FlyCamera::new(Point3::new(1.0, 2.0, 3.0));
        let globals = GlobalsUniform::new(&camera, 800, 600, &Lighting::default());
        assert_eq!(globals.view_position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(&globals.uv_scale[..2], &[0.5, 0.5]);

        let view: Matrix4<f32> = globals.view.into();
        assert_relative_eq!(view, camera.view_matrix());
    }

    #[test]
    fn test_model_uniform_normal_matrix() {
        let transform = Transform3D::scaling(Vector3::new(2.0, 1.0, 1.0));
        let uniform = ModelUniform::from(&transform);
        let normal: Matrix4<f32> = uniform.normal_matrix.into();
        assert_relative_eq!(normal[(0, 0)], 0.5);
        assert_relative_eq!(normal[(1, 1)], 1.0);
    }
}
