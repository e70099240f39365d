//! wgpu renderer for the particle field.
//!
//! Draws every particle, plus the light halo when it has a size, as instanced
//! quads in a single pass with additive blending. Particle colors are uploaded once; the
//! position buffer is overwritten in place on every draw.

mod shader;

use std::sync::Arc;

use bytemuck::Zeroable;
use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::animator::{FieldFrame, FrameRenderer};
use crate::error::GpuError;
use crate::field::FieldConfig;
use crate::viewport::Viewport;
use shader::{FrameUniforms, FIELD_SHADER};

/// `SrcAlpha * src + dst`: overlapping particles brighten each other.
const ADDITIVE_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// Storage bindings must not be empty.
const MIN_STORAGE_BYTES: u64 = 16;

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    position_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    num_particles: u32,
    point_size: f32,
    opacity: f32,
    light_size: f32,
}

impl GpuState {
    /// Set up the surface and pipeline for `colors.len() / 3` particles.
    pub async fn new(window: Arc<Window>, colors: &[f32], field: &FieldConfig) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        log::info!("using {} ({:?}) via {:?}", info.name, info.device_type, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        if size.width > 0 && size.height > 0 {
            surface.configure(&device, &config);
        }

        let num_particles = (colors.len() / 3) as u32;
        let buffer_size = ((colors.len() * std::mem::size_of::<f32>()) as u64).max(MIN_STORAGE_BYTES);

        let position_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Position Buffer"),
            size: buffer_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut color_bytes = bytemuck::cast_slice::<f32, u8>(colors).to_vec();
        color_bytes.resize(buffer_size as usize, 0);
        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Color Buffer"),
            contents: &color_bytes,
            usage: wgpu::BufferUsages::STORAGE,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::bytes_of(&FrameUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let storage_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Field Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                storage_entry(1),
                storage_entry(2),
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Field Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: position_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: color_buffer.as_entire_binding(),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Field Shader"),
            source: wgpu::ShaderSource::Wgsl(FIELD_SHADER.into()),
        });

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(ADDITIVE_BLEND),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            // Additive blending is order independent, so no depth buffer.
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        log::info!(
            "renderer ready: {} particles, {}x{} {:?}",
            num_particles,
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            position_buffer,
            uniform_buffer,
            bind_group,
            num_particles,
            point_size: field.point_size,
            opacity: field.opacity,
            light_size: field.light_size,
        })
    }

    /// Reconfigure the surface for a new physical size. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure with the current size, after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn update_uniforms(&mut self, frame: &FieldFrame<'_>, view_proj: Mat4, count: u32) {
        let light = frame.light;
        let uniforms = FrameUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            model: frame.model_matrix().to_cols_array_2d(),
            light_position: light.position.to_array(),
            light_intensity: light.intensity,
            light_color: light.color.to_array(),
            point_size: self.point_size,
            aspect: self.config.width as f32 / self.config.height as f32,
            opacity: self.opacity,
            light_size: self.light_size,
            particle_count: count,
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }
}

impl FrameRenderer for GpuState {
    type Error = wgpu::SurfaceError;

    fn configure(&mut self, viewport: &Viewport) {
        let current = (self.config.width, self.config.height);
        if let Some((width, height)) = surface_resize(viewport, current) {
            log::debug!(
                "surface {}x{} -> {}x{} (pixel ratio {:.2})",
                current.0,
                current.1,
                width,
                height,
                viewport.pixel_ratio()
            );
            self.resize(width, height);
        }
    }

    fn draw(&mut self, frame: &FieldFrame<'_>, view_proj: Mat4) -> Result<(), Self::Error> {
        let count = (frame.particle_count() as u32).min(self.num_particles);
        if count > 0 {
            let len = count as usize * 3;
            self.queue.write_buffer(
                &self.position_buffer,
                0,
                bytemuck::cast_slice(&frame.positions[..len]),
            );
        }
        self.update_uniforms(frame, view_proj, count);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..6, 0..instance_count(count, self.light_size));
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Particle instances, plus one for the light halo unless it is disabled.
fn instance_count(particles: u32, light_size: f32) -> u32 {
    if light_size > 0.0 {
        particles + 1
    } else {
        particles
    }
}

/// New surface size for `viewport`, or `None` when the surface should be left
/// alone: the window is minimised or the size is unchanged.
fn surface_resize(viewport: &Viewport, current: (u32, u32)) -> Option<(u32, u32)> {
    let size = viewport.physical_size();
    (!viewport.is_minimized() && size != current).then_some(size)
}
