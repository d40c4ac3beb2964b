//! The render pass for the walkthrough scene.
//!
//! Two pipelines share one camera bind group:
//! - **markers**: opaque solid-color meshes (the demo box in steps 1 to 3 and
//!   the point marker spheres), lit with a simple lambert term.
//! - **hologram**: the procedural dot-field material (steps 4 and 5), alpha
//!   blended over the background, depth tested but not depth written.
//!
//! Bind groups: group 0 camera, group 1 per-draw model, group 2 hologram
//! parameters (hologram pipeline only).
//!
//! Each draw call gets its own model uniform buffer. `queue.write_buffer`
//! takes effect at submission, so reusing one buffer across draws in a pass
//! would make every draw see the last write.

use glam::{Mat4, Vec4};

use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex3d};
use crate::steps::HologramMode;

/// Per-frame camera uniforms (group 0).
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera position in world space.
    pub camera_pos: [f32; 3],
    pub _pad: f32,
}

/// Per-draw model uniforms (group 1).
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    /// Local-to-world matrix.
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix, for normals under
    /// non-uniform scale.
    pub normal_matrix: [[f32; 4]; 4],
    /// RGBA color.
    pub color: [f32; 4],
}

/// Dot-field parameters (group 2, hologram pipeline only).
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HologramUniforms {
    /// Dot color, alpha scales overall opacity.
    pub color: [f32; 4],
    /// World-space units per dot cell half-period.
    pub spacing: f32,
    /// Dot radius in screen pixels.
    pub radius_px: f32,
    /// Brightness multiplier applied to the unscaled coverage.
    pub gain: f32,
    /// 0 = single XY plane, 1 = triplanar.
    pub mode: u32,
}

/// CPU-side hologram material settings.
#[derive(Clone, Copy, Debug)]
pub struct HologramSettings {
    pub color: Vec4,
    /// World-space dot spacing (cell size is `2 * spacing`).
    pub spacing: f32,
    /// Dot radius in pixels.
    pub radius_px: f32,
    /// Presentation-only brightness multiplier.
    pub gain: f32,
    pub mode: HologramMode,
}

impl Default for HologramSettings {
    fn default() -> Self {
        Self {
            color: Vec4::new(0.35, 0.95, 0.8, 1.0),
            spacing: 0.05,
            radius_px: 2.0,
            gain: 10.0,
            mode: HologramMode::Triplanar,
        }
    }
}

impl HologramSettings {
    fn uniforms(&self) -> HologramUniforms {
        HologramUniforms {
            color: self.color.to_array(),
            spacing: self.spacing,
            radius_px: self.radius_px,
            gain: self.gain,
            mode: match self.mode {
                HologramMode::SinglePlane => 0,
                HologramMode::Triplanar => 1,
            },
        }
    }
}

/// An opaque solid-color draw.
pub struct MarkerDraw<'a> {
    pub mesh: &'a Mesh,
    pub model: Mat4,
    pub color: Vec4,
}

/// The hologram-material draw.
pub struct HologramDraw<'a> {
    pub mesh: &'a Mesh,
    pub model: Mat4,
    pub settings: HologramSettings,
}

struct ModelSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Renders one walkthrough frame: clear, markers, then the hologram.
pub struct HologramPass {
    marker_pipeline: wgpu::RenderPipeline,
    hologram_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_layout: wgpu::BindGroupLayout,
    model_slots: Vec<ModelSlot>,
    hologram_buffer: wgpu::Buffer,
    hologram_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl HologramPass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let marker_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Marker Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/marker.wgsl").into()),
        });
        let hologram_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Hologram Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/hologram.wgsl").into()),
        });

        let uniform_layout_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
            entries: &[uniform_layout_entry(0)],
        });
        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[uniform_layout_entry(0)],
        });
        let hologram_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Hologram Params Bind Group Layout"),
            entries: &[uniform_layout_entry(0)],
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let hologram_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Hologram Uniforms"),
            size: std::mem::size_of::<HologramUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let hologram_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Hologram Params Bind Group"),
            layout: &hologram_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: hologram_buffer.as_entire_binding(),
            }],
        });

        let marker_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Marker Pipeline Layout"),
                bind_group_layouts: &[&camera_layout, &model_layout],
                push_constant_ranges: &[],
            });
        let hologram_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Hologram Pipeline Layout"),
                bind_group_layouts: &[&camera_layout, &model_layout, &hologram_layout],
                push_constant_ranges: &[],
            });

        let marker_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Marker Pipeline"),
            layout: Some(&marker_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &marker_shader,
                entry_point: Some("vs"),
                buffers: &[Vertex3d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &marker_shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let hologram_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Hologram Pipeline"),
            layout: Some(&hologram_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &hologram_shader,
                entry_point: Some("vs"),
                buffers: &[Vertex3d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &hologram_shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            // Translucent material: test against the markers but leave the
            // depth buffer untouched.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let (depth_view, depth_size) = Self::create_depth(gpu);

        Self {
            marker_pipeline,
            hologram_pipeline,
            camera_buffer,
            camera_bind_group,
            model_layout,
            model_slots: Vec::new(),
            hologram_buffer,
            hologram_bind_group,
            depth_view,
            depth_size,
        }
    }

    fn create_depth(gpu: &GpuContext) -> (wgpu::TextureView, (u32, u32)) {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (view, (gpu.width(), gpu.height()))
    }

    fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            let (view, size) = Self::create_depth(gpu);
            self.depth_view = view;
            self.depth_size = size;
        }
    }

    /// Lazily creates the uniform slot for draw `index` and writes `uniforms`
    /// into it.
    fn write_model_slot(&mut self, gpu: &GpuContext, index: usize, uniforms: ModelUniforms) {
        while self.model_slots.len() <= index {
            let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Model Uniforms"),
                size: std::mem::size_of::<ModelUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Model Bind Group"),
                layout: &self.model_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.model_slots.push(ModelSlot { buffer, bind_group });
        }
        gpu.queue.write_buffer(
            &self.model_slots[index].buffer,
            0,
            bytemuck::cast_slice(&[uniforms]),
        );
    }

    fn model_uniforms(model: Mat4, color: Vec4) -> ModelUniforms {
        ModelUniforms {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            color: color.to_array(),
        }
    }

    /// Renders the frame into `target`.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        target: &wgpu::TextureView,
        camera: &Camera,
        markers: &[MarkerDraw],
        hologram: Option<&HologramDraw>,
    ) {
        self.ensure_depth_size(gpu);

        let view_proj = camera.projection_matrix(gpu.aspect()) * camera.view_matrix();
        let camera_uniforms = CameraUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera.position.to_array(),
            _pad: 0.0,
        };
        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniforms]),
        );

        for (i, draw) in markers.iter().enumerate() {
            self.write_model_slot(gpu, i, Self::model_uniforms(draw.model, draw.color));
        }
        if let Some(draw) = hologram {
            self.write_model_slot(
                gpu,
                markers.len(),
                Self::model_uniforms(draw.model, draw.settings.color),
            );
            gpu.queue.write_buffer(
                &self.hologram_buffer,
                0,
                bytemuck::cast_slice(&[draw.settings.uniforms()]),
            );
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Hologram Pass Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Hologram Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.015,
                            g: 0.02,
                            b: 0.04,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            pass.set_pipeline(&self.marker_pipeline);
            for (i, draw) in markers.iter().enumerate() {
                pass.set_bind_group(1, &self.model_slots[i].bind_group, &[]);
                pass.set_vertex_buffer(0, draw.mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(draw.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..draw.mesh.index_count, 0, 0..1);
            }

            if let Some(draw) = hologram {
                pass.set_pipeline(&self.hologram_pipeline);
                pass.set_bind_group(1, &self.model_slots[markers.len()].bind_group, &[]);
                pass.set_bind_group(2, &self.hologram_bind_group, &[]);
                pass.set_vertex_buffer(0, draw.mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(draw.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..draw.mesh.index_count, 0, 0..1);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_structs_have_uniform_compatible_sizes() {
        // WGSL uniform structs are padded to 16-byte multiples.
        assert_eq!(std::mem::size_of::<CameraUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<ModelUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<HologramUniforms>() % 16, 0);
    }

    #[test]
    fn hologram_mode_maps_to_shader_enum() {
        let mut settings = HologramSettings::default();
        settings.mode = HologramMode::SinglePlane;
        assert_eq!(settings.uniforms().mode, 0);
        settings.mode = HologramMode::Triplanar;
        assert_eq!(settings.uniforms().mode, 1);
    }
}
