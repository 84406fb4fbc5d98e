mod mesh;
mod pipelines;
mod targets;
mod uniforms;

use bytemuck::Zeroable;
use fnv::FnvHashSet;
use hero_core::{
    collect_draws, Camera, DrawItem, FrameStatus, GeometryId, HeroError, MaterialId, Renderer,
    SceneGraph, SceneLights,
};
use mesh::MeshCache;
use pipelines::Pipelines;
use targets::RenderTargets;
use uniforms::{GlobalUniforms, ObjectUniforms, ShadowUniforms};
use web_sys as web;
use wgpu::util::DeviceExt;

/// Device-side state. Dropped as a whole on release.
struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipelines: Pipelines,
    targets: RenderTargets,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
    meshes: MeshCache,
}

/// WebGPU implementation of [`Renderer`]: a shadow pass from the spotlight,
/// then opaque and transparent forward passes into the canvas.
pub struct GpuRenderer {
    gpu: Option<Gpu>,
}

impl GpuRenderer {
    pub async fn new(canvas: &web::HtmlCanvasElement, shadow_map_size: u32) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipelines = pipelines::create_pipelines(&device, format);
        let targets = RenderTargets::new(&device, width, height, shadow_map_size.max(1));

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals_ub"),
            contents: bytemuck::bytes_of(&GlobalUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &pipelines.globals_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&targets.shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&targets.shadow_sampler),
                },
            ],
        });
        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("light_ub"),
            contents: bytemuck::bytes_of(&ShadowUniforms::new(&SceneLights::default())),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let light_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("light_bg"),
            layout: &pipelines.light_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: light_buffer.as_entire_binding(),
            }],
        });

        log::info!(
            "[render] WebGPU ready {}x{} {:?}, shadow map {}",
            width,
            height,
            format,
            shadow_map_size
        );
        Ok(Self {
            gpu: Some(Gpu {
                surface,
                device,
                queue,
                config,
                pipelines,
                targets,
                globals_buffer,
                globals_bind_group,
                light_buffer,
                light_bind_group,
                meshes: MeshCache::default(),
            }),
        })
    }
}

impl Gpu {
    /// Upload anything new and write this frame's per-object transforms.
    fn prepare(&mut self, scene: &SceneGraph, draws: &[DrawItem]) {
        let mut live = FnvHashSet::default();
        for d in draws {
            if let Some(geometry) = scene.geometry(d.geometry) {
                self.meshes.ensure_geometry(&self.device, d.geometry, geometry);
            }
            if let Some(material) = scene.material(d.material) {
                self.meshes.ensure_material(
                    &self.device,
                    &self.pipelines.material_bgl,
                    d.material,
                    material,
                );
            }
            if live.insert(d.node) {
                self.meshes.write_object(
                    &self.device,
                    &self.queue,
                    &self.pipelines.object_bgl,
                    d.node,
                    &ObjectUniforms::new(d.model, d.receive_shadow),
                );
            }
        }
        self.meshes.retain_objects(&live);
    }

    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<FrameStatus, HeroError> {
        let lights = SceneLights::collect(scene);
        let draws = collect_draws(scene, camera);
        self.prepare(scene, &draws);

        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&GlobalUniforms::new(camera, &lights)),
        );
        self.queue
            .write_buffer(&self.light_buffer, 0, bytemuck::bytes_of(&ShadowUniforms::new(&lights)));

        let frame = match self.surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(FrameStatus::Skipped);
            }
            Err(e) => return Err(HeroError::Gpu(format!("{:?}", e))),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("frame") });

        let casts = lights.spot.as_ref().is_some_and(|s| s.cast_shadow);
        {
            // always cleared so receivers read "lit" when nothing casts
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.shadow_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if casts {
                pass.set_pipeline(&self.pipelines.shadow);
                pass.set_bind_group(0, &self.light_bind_group, &[]);
                for d in draws.iter().filter(|d| d.cast_shadow) {
                    self.draw(&mut pass, d, false);
                }
            }
        }

        {
            let bg = scene.background;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.x as f64,
                            g: bg.y as f64,
                            b: bg.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            let mut bound = None;
            for d in &draws {
                let mode = (d.transparent, d.double_sided);
                if bound != Some(mode) {
                    pass.set_pipeline(self.pipelines.scene(d.transparent, d.double_sided));
                    bound = Some(mode);
                }
                self.draw(&mut pass, d, true);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(FrameStatus::Presented)
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, d: &DrawItem, with_material: bool) {
        let (Some(geometry), Some(object)) = (self.meshes.geometry(d.geometry), self.meshes.object(d.node))
        else {
            return;
        };
        if with_material {
            let Some(material) = self.meshes.material(d.material) else {
                return;
            };
            pass.set_bind_group(2, &material.bind_group, &[]);
        }
        let start = d.group.start.min(geometry.index_count);
        let end = d.group.start.saturating_add(d.group.count).min(geometry.index_count);
        if start >= end {
            return;
        }
        pass.set_bind_group(1, &object.bind_group, &[]);
        pass.set_vertex_buffer(0, geometry.vertices.slice(..));
        pass.set_index_buffer(geometry.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(start..end, 0, 0..1);
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (w, h) = (width.max(1), height.max(1));
        if self.config.width == w && self.config.height == h {
            return;
        }
        self.config.width = w;
        self.config.height = h;
        self.surface.configure(&self.device, &self.config);
        self.targets.recreate_depth(&self.device, w, h);
    }

    fn destroy(&mut self) {
        self.meshes.clear();
        self.targets.destroy();
        self.globals_buffer.destroy();
        self.light_buffer.destroy();
        self.device.destroy();
    }
}

impl Renderer for GpuRenderer {
    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<FrameStatus, HeroError> {
        match self.gpu.as_mut() {
            Some(gpu) => gpu.render(scene, camera),
            None => Err(HeroError::Gpu("renderer released".into())),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(width, height);
        }
    }

    fn dispose_geometry(&mut self, id: GeometryId) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.meshes.dispose_geometry(id);
        }
    }

    fn dispose_material(&mut self, id: MaterialId) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.meshes.dispose_material(id);
        }
    }

    fn release(&mut self) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.destroy();
            log::info!("[render] released WebGPU device");
        }
    }
}
