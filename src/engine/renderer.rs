use std::collections::HashMap;
use std::num::NonZeroU64;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use wgpu::SurfaceError;
use winit::{dpi::PhysicalSize, window::Window};

use super::error::AssetError;
use super::resources::{ResourceManager, Shader, Texture2D, FRAGMENT_ENTRY, VERTEX_ENTRY};
use super::sprite::{SpriteFrame, QUAD_VERTEX_COUNT, QUAD_VERTICES};

const INITIAL_SPRITE_CAPACITY: usize = 128;

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    clear_color: wgpu::Color,

    globals_layout: wgpu::BindGroupLayout,
    sprite_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,

    // one uniform slot per sprite, addressed with dynamic offsets
    sprite_buffer: wgpu::Buffer,
    sprite_bind_group: wgpu::BindGroup,
    sprite_capacity: usize,
    sprite_stride: u64,

    quad_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    pipelines: HashMap<String, wgpu::RenderPipeline>,
    textures: HashMap<String, GpuTexture>,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(|err| anyhow!("failed to create surface: {err}"))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("No suitable GPU adapters found"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("breakout-device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let alpha_mode = surface_caps
            .alpha_modes
            .iter()
            .copied()
            .find(|mode| *mode == wgpu::CompositeAlphaMode::Opaque)
            .unwrap_or(surface_caps.alpha_modes[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("breakout-globals-layout"),
            entries: &[uniform_entry(
                wgpu::ShaderStages::VERTEX,
                false,
                std::mem::size_of::<Globals>(),
            )],
        });
        let sprite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("breakout-sprite-layout"),
            entries: &[uniform_entry(
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                true,
                std::mem::size_of::<SpriteUniform>(),
            )],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("breakout-texture-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("breakout-globals"),
            contents: bytemuck::cast_slice(&[Globals {
                projection: glam::Mat4::IDENTITY.to_cols_array_2d(),
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("breakout-globals-bind-group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let sprite_stride = align_to(std::mem::size_of::<SpriteUniform>() as u64, alignment);
        let (sprite_buffer, sprite_bind_group) = create_sprite_slots(
            &device,
            &sprite_layout,
            sprite_stride,
            INITIAL_SPRITE_CAPACITY,
        );

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("breakout-quad"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("breakout-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            clear_color: wgpu::Color::BLACK,
            globals_layout,
            sprite_layout,
            texture_layout,
            globals_buffer,
            globals_bind_group,
            sprite_buffer,
            sprite_bind_group,
            sprite_capacity: INITIAL_SPRITE_CAPACITY,
            sprite_stride,
            quad_buffer,
            sampler,
            pipelines: HashMap::new(),
            textures: HashMap::new(),
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Compiles every cached shader into a pipeline and uploads every cached texture.
    pub fn upload(&mut self, resources: &ResourceManager) -> Result<(), AssetError> {
        for shader in resources.shaders() {
            let pipeline = self.compile(shader)?;
            tracing::info!(target: "engine", shader = shader.name(), "sprite pipeline ready");
            self.pipelines.insert(shader.name().to_string(), pipeline);
        }
        for texture in resources.textures() {
            let gpu = self.upload_texture(texture);
            self.textures.insert(texture.handle.name().to_string(), gpu);
        }
        tracing::info!(
            target: "engine",
            pipelines = self.pipelines.len(),
            textures = self.textures.len(),
            "assets uploaded"
        );
        Ok(())
    }

    fn compile(&self, shader: &Shader) -> Result<wgpu::RenderPipeline, AssetError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(shader.name()),
                source: wgpu::ShaderSource::Wgsl(shader.source().into()),
            });

        let layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("breakout-sprite-pipeline-layout"),
                bind_group_layouts: &[
                    &self.globals_layout,
                    &self.sprite_layout,
                    &self.texture_layout,
                ],
                push_constant_ranges: &[],
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(shader.name()),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: VERTEX_ENTRY,
                    buffers: &[QuadVertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: FRAGMENT_ENTRY,
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            });

        match pollster::block_on(self.device.pop_error_scope()) {
            Some(err) => Err(AssetError::ShaderCompile {
                name: shader.name().to_string(),
                message: err.to_string(),
            }),
            None => Ok(pipeline),
        }
    }

    fn upload_texture(&self, texture: &Texture2D) -> GpuTexture {
        let (width, height) = texture.handle.size();
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let gpu_texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(texture.handle.name()),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &gpu_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texture.image,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            extent,
        );

        let view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(texture.handle.name()),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        GpuTexture {
            _texture: gpu_texture,
            bind_group,
        }
    }

    pub fn render(&mut self, frame: &SpriteFrame) -> Result<(), SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::cast_slice(&[Globals {
                projection: frame.projection.to_cols_array_2d(),
            }]),
        );
        self.write_sprite_uniforms(frame);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("breakout-render-encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("breakout-sprite-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            match self.pipelines.get(&frame.shader) {
                Some(pipeline) => {
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));

                    for (slot, draw) in frame.draws.iter().enumerate() {
                        let Some(texture) = self.textures.get(draw.texture.name()) else {
                            tracing::warn!(texture = draw.texture.name(), "texture not uploaded, skipping sprite");
                            continue;
                        };
                        let offset = (slot as u64 * self.sprite_stride) as u32;
                        render_pass.set_bind_group(1, &self.sprite_bind_group, &[offset]);
                        render_pass.set_bind_group(2, &texture.bind_group, &[]);
                        render_pass.draw(0..QUAD_VERTEX_COUNT, 0..1);
                    }
                }
                None if !frame.draws.is_empty() => {
                    tracing::warn!(shader = %frame.shader, "no pipeline for shader, frame skipped");
                }
                None => {}
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn write_sprite_uniforms(&mut self, frame: &SpriteFrame) {
        let count = frame.draws.len();
        if count == 0 {
            return;
        }
        if count > self.sprite_capacity {
            let capacity = count.next_power_of_two();
            let (buffer, bind_group) = create_sprite_slots(
                &self.device,
                &self.sprite_layout,
                self.sprite_stride,
                capacity,
            );
            tracing::debug!(target: "engine", capacity, "grew sprite uniform buffer");
            self.sprite_buffer = buffer;
            self.sprite_bind_group = bind_group;
            self.sprite_capacity = capacity;
        }

        let stride = self.sprite_stride as usize;
        let mut staging = vec![0u8; stride * count];
        for (slot, draw) in frame.draws.iter().enumerate() {
            let uniform = SpriteUniform {
                model: draw.model.to_cols_array_2d(),
                color: draw.color.extend(1.0).to_array(),
            };
            let bytes = bytemuck::bytes_of(&uniform);
            let start = slot * stride;
            staging[start..start + bytes.len()].copy_from_slice(bytes);
        }
        self.queue.write_buffer(&self.sprite_buffer, 0, &staging);
    }
}

fn uniform_entry(
    visibility: wgpu::ShaderStages,
    has_dynamic_offset: bool,
    size: usize,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

fn create_sprite_slots(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("breakout-sprite-uniforms"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("breakout-sprite-bind-group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: NonZeroU64::new(std::mem::size_of::<SpriteUniform>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}

fn align_to(value: u64, alignment: u64) -> u64 {
    (value + alignment - 1) / alignment * alignment
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Globals {
    projection: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct SpriteUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

struct QuadVertex;

impl QuadVertex {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x4,
            }],
        }
    }
}
