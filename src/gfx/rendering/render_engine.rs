//! WGPU-based rendering engine for the desk viewer
//!
//! Immediate-mode execution of a frame's draw list: every draw snapshots the
//! staged shader state into its own slot of a dynamic-offset uniform ring, so
//! state set before a draw can never bleed into a neighbouring one. A single
//! pipeline with depth testing renders everything.

use cgmath::Matrix4;

use crate::gfx::geometry::MeshKind;
use crate::gfx::resources::texture::{GpuTexture, TextureRegistry};
use crate::gfx::scene::DrawTarget;
use crate::gfx::shading::{SceneBlock, ShaderState};
use crate::wgpu_utils::binding_builder::{
    BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
};
use crate::wgpu_utils::binding_types;
use crate::wgpu_utils::uniform_buffer::DynamicUniformBuffer;

use super::mesh::MeshLibrary;
use super::vertex::Vertex3D;

/// Uniform ring capacity; draws beyond this are dropped with a warning.
const MAX_DRAWS_PER_FRAME: usize = 64;

/// Depth buffer format used by the scene pipeline.
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Maps OpenGL-convention clip space (z in -1..1) to wgpu's (z in 0..1).
/// Projection matrices are composed in the OpenGL convention upstream.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// One staged draw: mesh, uniform snapshot, and the texture tag it samples.
pub struct DrawCall {
    pub mesh: MeshKind,
    pub block: SceneBlock,
    pub texture: Option<String>,
}

/// Frame-local list of staged draws, filled by the scene composer.
#[derive(Default)]
pub struct DrawList {
    calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter()
    }
}

impl DrawTarget for DrawList {
    fn draw_mesh(&mut self, kind: MeshKind, state: &ShaderState) {
        self.calls.push(DrawCall {
            mesh: kind,
            block: *state.block(),
            texture: state.texture_tag().map(str::to_string),
        });
    }
}

/// Core rendering engine managing GPU resources and draw submission.
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    pipeline: wgpu::RenderPipeline,
    scene_ubo: DynamicUniformBuffer<SceneBlock>,
    scene_bind_group: wgpu::BindGroup,
    texture_layout: BindGroupLayoutWithDesc,
    fallback_texture: GpuTexture,
    meshes: MeshLibrary,
}

impl RenderEngine {
    /// Creates a render engine for the given window and uploads the
    /// procedural mesh library.
    ///
    /// # Panics
    /// Panics if no wgpu adapter or device is available.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> RenderEngine {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to request adapter!");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .expect("Failed to request a device!");

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let scene_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform_dynamic(std::num::NonZeroU64::new(
                std::mem::size_of::<SceneBlock>() as u64,
            )))
            .create(&device, "Scene Uniforms Layout");

        let texture_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(&device, "Object Texture Layout");

        let scene_ubo = DynamicUniformBuffer::new(&device, MAX_DRAWS_PER_FRAME);
        let scene_bind_group = BindGroupBuilder::new(&scene_layout)
            .resource(scene_ubo.binding_resource())
            .create(&device, "Scene Uniforms");

        let fallback_texture = GpuTexture::white_pixel(&device, &queue, &texture_layout);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&scene_layout.layout, &texture_layout.layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex3D::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                // the scene is a handful of objects; no culling keeps every
                // procedural shape correct regardless of winding
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let mut meshes = MeshLibrary::new();
        meshes.load_all(&device);

        RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_view,
            pipeline,
            scene_ubo,
            scene_bind_group,
            texture_layout,
            fallback_texture,
            meshes,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Layout that loaded textures build their bind groups against.
    pub fn texture_layout(&self) -> &BindGroupLayoutWithDesc {
        &self.texture_layout
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigures the surface and depth buffer for a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, &self.config);
    }

    /// Renders one frame from the staged draw list.
    ///
    /// Texture tags resolve against `textures`; tags that resolve to nothing
    /// sample the white fallback so the draw still lands.
    pub fn render(
        &mut self,
        draws: &DrawList,
        textures: &TextureRegistry,
    ) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if draws.len() > MAX_DRAWS_PER_FRAME {
            log::warn!(
                "frame staged {} draws; only the first {MAX_DRAWS_PER_FRAME} are rendered",
                draws.len()
            );
        }

        // Stage every draw's uniform snapshot before encoding; each slot gets
        // the wgpu clip-space correction applied to its projection.
        for (index, call) in draws.iter().enumerate().take(MAX_DRAWS_PER_FRAME) {
            let mut block = call.block;
            let corrected = OPENGL_TO_WGPU_MATRIX * Matrix4::from(call.block.projection);
            block.projection = corrected.into();
            self.scene_ubo.write(&self.queue, index, &block);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);

            for (index, call) in draws.iter().enumerate().take(MAX_DRAWS_PER_FRAME) {
                let Some(mesh) = self.meshes.get(call.mesh) else {
                    log::warn!("mesh {:?} not loaded; draw skipped", call.mesh);
                    continue;
                };

                let texture_bind_group = call
                    .texture
                    .as_deref()
                    .and_then(|tag| textures.find(tag))
                    .map(|texture| &texture.bind_group)
                    .unwrap_or(&self.fallback_texture.bind_group);

                render_pass.set_bind_group(
                    0,
                    &self.scene_bind_group,
                    &[self.scene_ubo.offset_of(index)],
                );
                render_pass.set_bind_group(1, texture_bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();

        Ok(())
    }
}

/// Creates a depth buffer view matching the surface configuration.
fn create_depth_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
