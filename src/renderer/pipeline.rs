//! WebGPU render pipeline setup

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::frame::Color;
use super::shapes::Mesh;
use super::vertex::Vertex;

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Playfield size the current game draws in
    pub playfield: Vec2,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        playfield: Vec2,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("arcade-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        // Palette values are authored as display colors, so skip sRGB encoding
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, [1.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        log::info!(
            "Renderer ready: {}x{} {:?}",
            width,
            height,
            surface_format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            size: (width, height),
            playfield,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Playfield to NDC, letterboxed to keep the aspect ratio
    pub fn to_ndc(&self, p: Vec2) -> Vec2 {
        playfield_to_ndc(p, self.playfield, self.size)
    }

    /// Upload the mesh and render
    pub fn render(&mut self, mesh: &Mesh) -> Result<(), wgpu::SurfaceError> {
        let ndc_vertices: Vec<Vertex> = mesh
            .vertices
            .iter()
            .map(|v| {
                let p = self.to_ndc(Vec2::from(v.position));
                Vertex::new(p.x, p.y, v.color)
            })
            .collect();

        if !ndc_vertices.is_empty() {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&ndc_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
        }
        self.vertex_count = ndc_vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(to_wgpu_color(mesh.clear)),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn to_wgpu_color(c: Color) -> wgpu::Color {
    wgpu::Color {
        r: c[0] as f64,
        g: c[1] as f64,
        b: c[2] as f64,
        a: c[3] as f64,
    }
}

/// Map a playfield point (top-left origin, y down) into NDC, fitting the
/// whole playfield inside a viewport of `viewport` pixels.
pub fn playfield_to_ndc(p: Vec2, playfield: Vec2, viewport: (u32, u32)) -> Vec2 {
    let view = Vec2::new(viewport.0.max(1) as f32, viewport.1.max(1) as f32);
    let field = playfield.max(Vec2::ONE);
    let scale = (view.x / field.x).min(view.y / field.y);

    // Fraction of the viewport the playfield covers on each axis
    let extent = field * scale / view;
    let uv = p / field;

    Vec2::new((uv.x * 2.0 - 1.0) * extent.x, (1.0 - uv.y * 2.0) * extent.y)
}

/// Where the playfield sits inside a viewport: (top-left offset, scale)
pub fn letterbox(playfield: Vec2, viewport: Vec2) -> (Vec2, f32) {
    let field = playfield.max(Vec2::ONE);
    let view = viewport.max(Vec2::ONE);
    let scale = (view.x / field.x).min(view.y / field.y);
    ((view - field * scale) * 0.5, scale)
}

/// Map a viewport point (CSS pixels, top-left origin) back into the playfield
pub fn viewport_to_playfield(p: Vec2, playfield: Vec2, viewport: Vec2) -> Vec2 {
    let (offset, scale) = letterbox(playfield, viewport);
    (p - offset) / scale
}
