use std::{iter, sync::Arc};

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    animation::Renderer,
    camera::{CameraResources, PerspectiveCamera},
    data_structures::{
        model::DrawModel,
        scene_graph::{SceneGraph, SceneNode},
        texture::Texture,
    },
    pipelines::{
        basic::mk_basic_pipeline,
        light::{DirectionalLight, LightResources},
    },
    render::Instanced,
    resources::texture::diffuse_normal_layout,
};

/// Preferred number of samples per pixel for antialiasing.
pub const MSAA_SAMPLES: u32 = 4;

/// Sample count for the colour and depth formats: [`MSAA_SAMPLES`] when both
/// support it, otherwise 1 (no multisampling).
pub fn msaa_sample_count(
    colour: wgpu::TextureFormatFeatureFlags,
    depth: wgpu::TextureFormatFeatureFlags,
) -> u32 {
    if colour.sample_count_supported(MSAA_SAMPLES) && depth.sample_count_supported(MSAA_SAMPLES) {
        MSAA_SAMPLES
    } else {
        1
    }
}

/// GPU state for one window: surface, device, uniforms and the lit pipeline.
#[derive(Debug)]
pub struct Context {
    pub window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub sample_count: u32,
    /// Multisampled colour target, resolved into the surface texture. `None` without MSAA.
    pub msaa_target: Option<Texture>,
    pub depth_texture: Texture,
    pub camera: CameraResources,
    pub light: LightResources,
    /// Layout of the material bind group (diffuse and normal texture).
    pub texture_layout: wgpu::BindGroupLayout,
    pub pipeline: wgpu::RenderPipeline,
    pub clear_colour: wgpu::Color,
    is_surface_configured: bool,
}

impl Context {
    pub async fn new(
        window: Arc<Window>,
        clear_colour: wgpu::Color,
        light: DirectionalLight,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating the window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable graphics adapter")?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("requesting the graphics device")?;

        log::info!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // The shader assumes an sRGB surface texture. Other formats make every colour darker.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no texture format")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
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
        };

        let sample_count = msaa_sample_count(
            adapter.get_texture_format_features(surface_format).flags,
            adapter.get_texture_format_features(Texture::DEPTH_FORMAT).flags,
        );
        log::info!("Rendering with {}x multisampling", sample_count);

        let camera = CameraResources::new(&device);
        let light = LightResources::new(&device, light);
        let texture_layout = diffuse_normal_layout(&device);
        let pipeline = mk_basic_pipeline(
            &device,
            &config,
            &texture_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
            sample_count,
        );
        let depth_texture = Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            sample_count,
            "depth_texture",
        );
        let msaa_target =
            (sample_count > 1).then(|| Texture::create_msaa_target(&device, &config, sample_count));

        let mut ctx = Self {
            window,
            surface,
            device,
            queue,
            config,
            sample_count,
            msaa_target,
            depth_texture,
            camera,
            light,
            texture_layout,
            pipeline,
            clear_colour,
            is_surface_configured: false,
        };
        // On the web the canvas may still be zero-sized; the first resize configures it then.
        ctx.resize(size.width, size.height);
        Ok(ctx)
    }

    /// Reconfigure the surface, depth buffer and multisampled target.
    /// Zero-sized surfaces are ignored and `false` is returned.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = Texture::create_depth_texture(
            &self.device,
            [self.config.width, self.config.height],
            self.sample_count,
            "depth_texture",
        );
        if self.sample_count > 1 {
            self.msaa_target = Some(Texture::create_msaa_target(
                &self.device,
                &self.config,
                self.sample_count,
            ));
        }
        self.is_surface_configured = true;
        true
    }
}

impl Renderer<Box<dyn SceneNode>> for Context {
    type Error = wgpu::SurfaceError;

    fn render(
        &mut self,
        scene: &SceneGraph<Box<dyn SceneNode>>,
        camera: &PerspectiveCamera,
    ) -> Result<(), wgpu::SurfaceError> {
        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        self.camera.write(&self.queue, camera);
        scene.iter().for_each(|node| node.write_to_buffer(&self.queue));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (target, resolve_target) = match &self.msaa_target {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut basics: Vec<Instanced> = Vec::new();
            scene.get_render().collect_into(&mut basics);

            render_pass.set_pipeline(&self.pipeline);
            for instanced in basics {
                if instanced.amount == 0 || instanced.instance.size() == 0 {
                    log::warn!("attempted to render something with zero instances");
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.draw_model_instanced(
                    instanced.model,
                    0..instanced.amount as u32,
                    &self.camera.bind_group,
                    &self.light.bind_group,
                );
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
