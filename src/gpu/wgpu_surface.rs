//! A [`Surface`] rendering into an offscreen wgpu texture.

use std::sync::mpsc;

use image::RgbaImage;
use log::debug;
use wgpu::util::DeviceExt;

use super::{ProgramKind, RenderError, Surface, SurfaceId};
use crate::color::Component;

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A compiled gradient pipeline.
#[derive(Debug)]
pub struct Program {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

/// Renders gradients into an `Rgba8Unorm` texture that can be read back with
/// [`OffscreenSurface::read_pixels`].
pub struct OffscreenSurface {
    id: SurfaceId,
    device: wgpu::Device,
    queue: wgpu::Queue,
    logical: (Component, Component),
    ratio: Component,
    size: (u32, u32),
    texture: Option<wgpu::Texture>,
}

impl OffscreenSurface {
    /// Create a surface of `width` x `height` logical pixels on an existing
    /// device.
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        width: Component,
        height: Component,
        ratio: Component,
    ) -> Self {
        Self {
            id: SurfaceId::next(),
            device,
            queue,
            logical: (width, height),
            ratio,
            size: (0, 0),
            texture: None,
        }
    }

    /// Create a surface on the default adapter.
    pub async fn request(
        width: Component,
        height: Component,
        ratio: Component,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await
            .map_err(|err| RenderError::ContextUnavailable(err.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Tincture Offscreen Device"),
                ..Default::default()
            })
            .await
            .map_err(|err| RenderError::ContextUnavailable(err.to_string()))?;

        Ok(Self::new(device, queue, width, height, ratio))
    }

    /// Change the logical size, applied on the next draw.
    pub fn set_logical_size(&mut self, width: Component, height: Component) {
        self.logical = (width, height);
    }

    /// Copy the last frame back to the CPU.
    pub fn read_pixels(&self) -> Result<RgbaImage, RenderError> {
        let (width, height) = self.size;
        let Some(texture) = self.texture.as_ref() else {
            return Ok(RgbaImage::new(width, height));
        };

        let row = width * 4;
        let padded_row = row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

        let readback = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Tincture Readback Buffer"),
            size: padded_row as u64 * height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Tincture Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            extent(width, height),
        );
        self.queue.submit([encoder.finish()]);

        let slice = readback.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|err| RenderError::DrawFailed(err.to_string()))?;
        receiver
            .recv()
            .map_err(|err| RenderError::DrawFailed(err.to_string()))?
            .map_err(|err| RenderError::DrawFailed(err.to_string()))?;

        let mut pixels = Vec::with_capacity((row * height) as usize);
        {
            let mapped = slice.get_mapped_range();
            for chunk in mapped.chunks(padded_row as usize) {
                pixels.extend_from_slice(&chunk[..row as usize]);
            }
        }
        readback.unmap();

        RgbaImage::from_raw(width, height, pixels)
            .ok_or_else(|| RenderError::DrawFailed("short readback".to_string()))
    }
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

impl Surface for OffscreenSurface {
    type Program = Program;

    fn id(&self) -> SurfaceId {
        self.id
    }

    fn logical_size(&self) -> (Component, Component) {
        self.logical
    }

    fn device_pixel_ratio(&self) -> Component {
        self.ratio
    }

    fn backing_size(&self) -> (u32, u32) {
        self.size
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        // wgpu rejects empty textures.
        self.texture = (width > 0 && height > 0).then(|| {
            self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Tincture Offscreen Texture"),
                size: extent(width, height),
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            })
        });
    }

    fn compile(&mut self, kind: ProgramKind) -> Result<Program, RenderError> {
        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(kind.label()),
                source: wgpu::ShaderSource::Wgsl(kind.source().into()),
            });

        let bind_group_layout =
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Tincture Gradient Uniforms"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Tincture Gradient Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(kind.label()),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    // Straight alpha, written as is.
                    targets: &[Some(wgpu::ColorTargetState {
                        format: FORMAT,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            });

        Ok(Program {
            pipeline,
            bind_group_layout,
        })
    }

    fn draw(&mut self, program: &Program, uniforms: &[u8]) -> Result<(), RenderError> {
        let Some(texture) = self.texture.as_ref() else {
            debug!("surface {:?} has an empty backing store, nothing drawn", self.id);
            return Ok(());
        };
        let (width, height) = self.size;

        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Tincture Gradient Uniform Buffer"),
                contents: uniforms,
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Tincture Gradient Bind Group"),
            layout: &program.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Tincture Gradient Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Tincture Gradient Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
            pass.set_pipeline(&program.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..4, 0..1);
        }
        self.queue.submit([encoder.finish()]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::{Color, Space},
        gpu::GradientRenderer,
        sampler::Corners,
    };

    fn surface(width: Component, height: Component) -> Option<OffscreenSurface> {
        match pollster::block_on(OffscreenSurface::request(width, height, 1.0)) {
            Ok(surface) => Some(surface),
            Err(err) => {
                eprintln!("no GPU adapter available, skipping: {err}");
                None
            }
        }
    }

    #[test]
    fn bilinear_corners_read_back() {
        let Some(mut surface) = surface(8.0, 8.0) else {
            return;
        };
        let mut renderer = GradientRenderer::new();

        let red = Color::new(Space::Srgb, 1.0, 0.0, 0.0, 1.0);
        let corners = Corners {
            top_left: red.clone(),
            top_right: red.clone(),
            bottom_left: red.clone(),
            bottom_right: red,
        };
        renderer
            .draw_gradient(&mut surface, &corners, false, false, false)
            .unwrap();

        let pixels = surface.read_pixels().unwrap();
        assert_eq!(pixels.dimensions(), (8, 8));
        assert!(pixels.pixels().all(|pixel| pixel.0 == [255, 0, 0, 255]));
    }

    #[test]
    fn linear_gradient_runs_left_to_right() {
        let Some(mut surface) = surface(64.0, 4.0) else {
            return;
        };
        let mut renderer = GradientRenderer::new();

        let stops = [
            Color::new(Space::Srgb, 0.0, 0.0, 0.0, 1.0),
            Color::new(Space::Srgb, 1.0, 1.0, 1.0, 1.0),
        ];
        renderer
            .draw_linear_gradient(&mut surface, &stops, 0.0, false, false, false)
            .unwrap();

        let pixels = surface.read_pixels().unwrap();
        let left = pixels.get_pixel(0, 2).0[0];
        let right = pixels.get_pixel(63, 2).0[0];
        assert!(left < 10, "{left}");
        assert!(right > 245, "{right}");
    }
}
