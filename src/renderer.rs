use std::collections::HashMap;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::context::SceneContext;
use crate::loaders::TextureData;
use crate::render_loop::LoopState;
use crate::scene::{GeometryId, ObjectId, Scene, TextureId, TextureKind};
use crate::types::{BackgroundUniform, CameraUniform, LightUniform, LineVertex, ObjectUniform, Vertex};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const WHITE_TEXEL: [u8; 4] = [255, 255, 255, 255];
const FLAT_NORMAL_TEXEL: [u8; 4] = [128, 128, 255, 255];

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Numbers shown in the overlay
#[derive(Debug, Clone, Copy)]
pub struct HudStats {
    pub fps: f32,
    pub frame: u64,
    pub scroll_top: f32,
    pub loop_state: LoopState,
    pub pending_textures: usize,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: (u32, u32),
}

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuObject {
    id: ObjectId,
    geometry: GeometryId,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct GpuLines {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

struct GpuBackground {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    texture_size: (u32, u32),
}

struct Hud {
    renderer: egui_wgpu::Renderer,
    state: egui_winit::State,
    ctx: egui::Context,
}

/// Forward renderer for a [`Scene`]: background, lit meshes, helper lines
/// and an optional egui overlay.
pub struct SceneRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    background_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    background_pipeline: wgpu::RenderPipeline,
    geometries: Vec<GpuGeometry>,
    objects: Vec<GpuObject>,
    lines: Vec<GpuLines>,
    textures: HashMap<TextureId, GpuTexture>,
    white_texture: GpuTexture,
    flat_normal_texture: GpuTexture,
    background: Option<GpuBackground>,
    hud: Option<Hud>,
}

impl SceneRenderer {
    pub async fn new(window: Arc<Window>, scene: &Scene, show_hud: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let surface_config = Self::create_surface_config(&surface, &adapter, size)?;
        surface.configure(&device, &surface_config);
        log::info!(
            "Surface configured: {}x{} {:?}",
            surface_config.width,
            surface_config.height,
            surface_config.format
        );

        let depth_view = Self::create_depth_view(&device, size);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[Self::light_uniform(scene)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = Self::create_frame_layout(&device);
        let object_layout = Self::create_object_layout(&device);
        let background_layout = Self::create_background_layout(&device);

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
            label: Some("frame_bind_group"),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let mesh_pipeline =
            Self::create_mesh_pipeline(&device, &frame_layout, &object_layout, surface_config.format);
        let line_pipeline = Self::create_line_pipeline(&device, &frame_layout, surface_config.format);
        let background_pipeline =
            Self::create_background_pipeline(&device, &background_layout, surface_config.format);

        let white_texture = Self::upload_texture(
            &device,
            &queue,
            &TextureData::solid(WHITE_TEXEL),
            TextureKind::Color,
            "White Texture",
        );
        let flat_normal_texture = Self::upload_texture(
            &device,
            &queue,
            &TextureData::solid(FLAT_NORMAL_TEXEL),
            TextureKind::Normal,
            "Flat Normal Texture",
        );

        let geometries = scene
            .geometries()
            .iter()
            .enumerate()
            .map(|(i, geometry)| {
                let label = format!("Geometry {}", i);
                GpuGeometry {
                    vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(label.as_str()),
                        contents: bytemuck::cast_slice(&geometry.vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                    index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(label.as_str()),
                        contents: bytemuck::cast_slice(&geometry.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
                    index_count: geometry.indices.len() as u32,
                }
            })
            .collect();

        let lines = scene
            .helpers()
            .filter(|(_, helper)| !helper.lines.vertices.is_empty())
            .map(|(_, helper)| {
                let model = helper.transform.matrix();
                let vertices: Vec<LineVertex> = helper
                    .lines
                    .vertices
                    .iter()
                    .map(|v| {
                        let p = model.transform_point3(glam::Vec3::from_array(v.position));
                        LineVertex::new(p.to_array(), v.color)
                    })
                    .collect();
                GpuLines {
                    vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Helper Lines"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                    vertex_count: vertices.len() as u32,
                }
            })
            .collect();

        let textures = HashMap::new();
        let objects = scene
            .meshes()
            .map(|(id, mesh)| {
                let uniform = ObjectUniform::new(
                    mesh.transform.matrix(),
                    mesh.material.color(),
                    mesh.material.is_lit(),
                    false,
                );
                let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Object Buffer"),
                    contents: bytemuck::cast_slice(&[uniform]),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = Self::create_object_bind_group(
                    &device,
                    &object_layout,
                    &uniform_buffer,
                    &white_texture.view,
                    &flat_normal_texture.view,
                    &sampler,
                );
                GpuObject {
                    id,
                    geometry: mesh.geometry,
                    uniform_buffer,
                    bind_group,
                }
            })
            .collect();

        let hud = show_hud.then(|| {
            let ctx = egui::Context::default();
            let state = egui_winit::State::new(
                ctx.clone(),
                egui::ViewportId::ROOT,
                &window,
                Some(window.scale_factor() as f32),
                None,
                None,
            );
            let renderer = egui_wgpu::Renderer::new(
                &device,
                surface_config.format,
                egui_wgpu::RendererOptions::default(),
            );
            Hud { renderer, state, ctx }
        });

        let renderer = Self {
            device,
            queue,
            surface,
            surface_config,
            size,
            depth_view,
            camera_buffer,
            light_buffer,
            frame_bind_group,
            object_layout,
            background_layout,
            sampler,
            mesh_pipeline,
            line_pipeline,
            background_pipeline,
            geometries,
            objects,
            lines,
            textures,
            white_texture,
            flat_normal_texture,
            background: None,
            hud,
        };

        log::info!(
            "Renderer initialized: {} meshes, {} geometries, {} helpers",
            renderer.objects.len(),
            renderer.geometries.len(),
            renderer.lines.len()
        );

        Ok(renderer)
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> Result<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| "Failed to find appropriate adapter".into())
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| e.into())
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or("Surface reports no supported formats")?;

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_view(
        device: &wgpu::Device,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
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

    fn upload_texture(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &TextureData,
        kind: TextureKind,
        label: &str,
    ) -> GpuTexture {
        let format = match kind {
            TextureKind::Color => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureKind::Normal => wgpu::TextureFormat::Rgba8Unorm,
        };
        let extent = wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            texture.as_image_copy(),
            &data.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * data.width),
                rows_per_image: Some(data.height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        GpuTexture {
            _texture: texture,
            view,
            size: data.size(),
        }
    }

    fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }
    }

    fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        }
    }

    fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        }
    }

    /// Camera and lights, shared by every draw
    fn create_frame_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                Self::uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                Self::uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
            label: Some("frame_bind_group_layout"),
        })
    }

    fn create_object_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                Self::uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                Self::texture_entry(1),
                Self::texture_entry(2),
                Self::sampler_entry(3),
            ],
            label: Some("object_bind_group_layout"),
        })
    }

    fn create_background_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                Self::uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                Self::texture_entry(1),
                Self::sampler_entry(2),
            ],
            label: Some("background_bind_group_layout"),
        })
    }

    fn create_object_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        map: &wgpu::TextureView,
        normal_map: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(map),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(normal_map),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some("object_bind_group"),
        })
    }

    fn depth_state(compare: wgpu::CompareFunction, write: bool) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: write,
            depth_compare: compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    fn create_mesh_pipeline(
        device: &wgpu::Device,
        frame_layout: &wgpu::BindGroupLayout,
        object_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[frame_layout, object_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(Self::depth_state(wgpu::CompareFunction::Less, true)),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    fn create_line_pipeline(
        device: &wgpu::Device,
        frame_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/line.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[frame_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[LineVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(Self::depth_state(wgpu::CompareFunction::Less, true)),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    fn create_background_pipeline(
        device: &wgpu::Device,
        background_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Background Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/background.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Background Pipeline Layout"),
            bind_group_layouts: &[background_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Background Pipeline"),
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
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
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
            // Drawn first, never occludes
            depth_stencil: Some(Self::depth_state(wgpu::CompareFunction::Always, false)),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    fn light_uniform(scene: &Scene) -> LightUniform {
        let mut uniform = LightUniform {
            ambient_color: scene.ambient(),
            ambient_intensity: 1.0,
            ..Default::default()
        };
        if let Some(light) = scene.point_light() {
            uniform.point_position = light.position.to_array();
            uniform.point_color = light.color;
            uniform.point_intensity = light.intensity;
        }
        uniform
    }

    /// Upload textures that finished loading and rebind everything using them
    pub fn sync_textures(&mut self, scene: &Scene, ready: &[TextureId]) {
        if ready.is_empty() {
            return;
        }

        for &id in ready {
            let Some(slot) = scene.texture(id) else {
                continue;
            };
            let Some(data) = slot.data() else {
                continue;
            };
            let texture = Self::upload_texture(&self.device, &self.queue, data, slot.kind, &slot.name);
            log::debug!("Uploaded {} ({}x{})", slot.name, data.width, data.height);
            self.textures.insert(id, texture);
        }

        if let Some(id) = scene.background().filter(|id| ready.contains(id)) {
            self.rebuild_background(id);
        }

        for object in &mut self.objects {
            let Some(mesh) = scene.mesh(object.id) else {
                continue;
            };
            if !ready.iter().any(|&id| mesh.material.uses(id)) {
                continue;
            }

            let map = texture_view(&self.textures, mesh.material.map(), &self.white_texture);
            let normal_map =
                texture_view(&self.textures, mesh.material.normal_map(), &self.flat_normal_texture);
            object.bind_group = Self::create_object_bind_group(
                &self.device,
                &self.object_layout,
                &object.uniform_buffer,
                map,
                normal_map,
                &self.sampler,
            );
        }
    }

    fn rebuild_background(&mut self, id: TextureId) {
        let Some(texture) = self.textures.get(&id) else {
            return;
        };

        let uniform = BackgroundUniform::cover((self.size.width, self.size.height), texture.size);
        let uniform_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Background Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.background_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
            label: Some("background_bind_group"),
        });

        self.background = Some(GpuBackground {
            uniform_buffer,
            bind_group,
            texture_size: texture.size,
        });
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = Self::create_depth_view(&self.device, new_size);

        if let Some(background) = &self.background {
            let uniform =
                BackgroundUniform::cover((new_size.width, new_size.height), background.texture_size);
            self.queue
                .write_buffer(&background.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
        log::debug!("Resized to {}x{}", new_size.width, new_size.height);
    }

    /// Reconfigure after the surface was lost or went stale
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    /// Forward a window event to the overlay. Returns true when it was consumed.
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        match &mut self.hud {
            Some(hud) => hud.state.on_window_event(window, event).consumed,
            None => false,
        }
    }

    fn write_uniforms(&self, ctx: &SceneContext) {
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[ctx.camera.to_uniform()]),
        );
        self.queue.write_buffer(
            &self.light_buffer,
            0,
            bytemuck::cast_slice(&[Self::light_uniform(&ctx.scene)]),
        );

        for object in &self.objects {
            let Some(mesh) = ctx.scene.mesh(object.id) else {
                continue;
            };
            let has_normal_map = mesh
                .material
                .normal_map()
                .is_some_and(|id| self.textures.contains_key(&id));
            let uniform = ObjectUniform::new(
                mesh.transform.matrix(),
                mesh.material.color(),
                mesh.material.is_lit(),
                has_normal_map,
            );
            self.queue
                .write_buffer(&object.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
    }

    pub fn render(
        &mut self,
        ctx: &SceneContext,
        window: &Window,
        stats: &HudStats,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        self.write_uniforms(ctx);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
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
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(background) = &self.background {
                render_pass.set_pipeline(&self.background_pipeline);
                render_pass.set_bind_group(0, &background.bind_group, &[]);
                render_pass.draw(0..3, 0..1);
            }

            render_pass.set_pipeline(&self.mesh_pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for object in &self.objects {
                let Some(geometry) = self.geometries.get(object.geometry.0) else {
                    continue;
                };
                render_pass.set_bind_group(1, &object.bind_group, &[]);
                render_pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                render_pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..geometry.index_count, 0, 0..1);
            }

            render_pass.set_pipeline(&self.line_pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for lines in &self.lines {
                render_pass.set_vertex_buffer(0, lines.vertex_buffer.slice(..));
                render_pass.draw(0..lines.vertex_count, 0..1);
            }
        }

        if let Some(hud) = &mut self.hud {
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.size.width, self.size.height],
                pixels_per_point: window.scale_factor() as f32,
            };
            hud.draw(
                &self.device,
                &self.queue,
                &mut encoder,
                &view,
                window,
                &screen_descriptor,
                stats,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl Hud {
    #[allow(clippy::too_many_arguments)]
    fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        window: &Window,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        stats: &HudStats,
    ) {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| {
            egui::Window::new("Scene")
                .title_bar(true)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 10.0))
                .default_width(220.0)
                .show(ctx, |ui| {
                    ui.heading(
                        egui::RichText::new(format!("{:.0} FPS", stats.fps))
                            .size(28.0)
                            .color(egui::Color32::from_rgb(74, 158, 255)),
                    );

                    let frame_time_ms = if stats.fps > 0.0 { 1000.0 / stats.fps } else { 0.0 };
                    ui.label(
                        egui::RichText::new(format!("{:.2} ms", frame_time_ms))
                            .size(14.0)
                            .color(egui::Color32::GRAY),
                    );

                    ui.add_space(5.0);
                    ui.separator();
                    ui.monospace(format!("Frame: {}", stats.frame));
                    ui.monospace(format!("Scroll: {:.0} px", stats.scroll_top));
                    ui.monospace(format!("Loop: {:?}", stats.loop_state));
                    if stats.pending_textures > 0 {
                        ui.monospace(format!("Loading {} textures", stats.pending_textures));
                    }
                });
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .ctx
            .tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        self.renderer
            .update_buffers(device, queue, encoder, &tris, screen_descriptor);

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            self.renderer.render(&mut render_pass, &tris, screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

fn texture_view<'a>(
    textures: &'a HashMap<TextureId, GpuTexture>,
    id: Option<TextureId>,
    fallback: &'a GpuTexture,
) -> &'a wgpu::TextureView {
    id.and_then(|id| textures.get(&id))
        .map(|texture| &texture.view)
        .unwrap_or(&fallback.view)
}
