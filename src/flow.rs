//! Application event loop.
//!
//! [`run`] opens a window and drives the demo scene with winit. The host owns
//! the [`AnimationLoop`] and feeds it one timestamp per `RedrawRequested`; the
//! loop itself asks for the next redraw through the window.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window, the GPU [`Context`] and the primitive props
//! 2. The tree model request is dispatched to a background task and the first frame is requested
//! 3. Every `RedrawRequested` runs [`AnimationLoop::frame`]
//! 4. `FlowEvent::Loaded` uploads the finished model and attaches it to its spinner
//! 5. `CloseRequested` or the frame limit stops the loop and exits

use std::{fmt::Debug, sync::Arc};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    animation::{AnimationLoop, FrameClock, Spin, Stage},
    config::{AspectRatio, Config},
    context::Context,
    data_structures::{
        model::{Model, ModelData},
        scene_graph::{MeshNode, SceneNode},
        transform::Transform,
    },
    resources::Assets,
    scene::{self, ModelRequest},
};

/// Everything that exists once the window and GPU are up.
pub struct AppState {
    window: Arc<Window>,
    stage: Stage<Box<dyn SceneNode>, Context>,
    animation: AnimationLoop,
    clock: FrameClock,
    aspect: AspectRatio,
    pending: Option<ModelRequest>,
}

impl AppState {
    async fn new(window: Arc<Window>, config: Config) -> anyhow::Result<Self> {
        let ctx = Context::new(window.clone(), config.clear_colour, scene::light()).await?;
        let aspect = match config.aspect {
            AspectRatio::Fixed(aspect) => aspect,
            AspectRatio::FollowSurface => {
                let size = window.inner_size();
                if size.width > 0 && size.height > 0 {
                    size.width as f32 / size.height as f32
                } else {
                    scene::ASPECT
                }
            }
        };
        let mut stage = Stage::new(scene::camera(aspect), ctx);
        let mut animation = AnimationLoop::new().with_frame_limit(config.frame_limit);
        let assets = Assets::new(config.asset_root);

        let mut nodes: Vec<(Spin, Box<dyn SceneNode>)> = Vec::new();
        for prop in scene::props() {
            let data = prop.load(&assets).await;
            let node = upload_node(&stage.renderer, prop.name, &data, prop.placement)?;
            nodes.push((prop.spin, node));
        }
        scene::stage(&mut stage.scene, &mut animation, nodes);
        log::info!("Staged {} props.", stage.scene.len());

        let pending = Some(ModelRequest::tree(&mut animation, assets));
        Ok(Self {
            window,
            stage,
            animation,
            clock: FrameClock::new(),
            aspect: config.aspect,
            pending,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.stage.renderer.resize(width, height) && self.aspect == AspectRatio::FollowSurface {
            self.stage.camera.projection.resize(width, height);
        }
    }

    fn redraw(&mut self) {
        let t = self.clock.now_millis();
        match self.animation.frame(t, &mut self.stage, &mut self.window) {
            Ok(()) => {}
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.window.inner_size();
                self.resize(size.width, size.height);
            }
            Err(e) => {
                log::error!("Unable to render {}", e);
            }
        }
    }

    fn on_loaded(&mut self, request: ModelRequest, result: anyhow::Result<ModelData>) {
        let data = match result {
            Ok(data) => data,
            Err(e) => {
                log::error!("Loading {} failed, it stays hidden: {:#}", request.obj, e);
                return;
            }
        };
        let attached = upload_node(&self.stage.renderer, &request.obj, &data, request.placement)
            .and_then(|node| {
                scene::attach_loaded(&mut self.stage.scene, &mut self.animation, request.spinner, node)
            });
        match attached {
            Ok(handle) => log::info!("{} joined the scene as {:?}.", request.obj, handle),
            Err(e) => log::error!("Could not add {}: {:#}", request.obj, e),
        }
    }
}

impl Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("nodes", &self.stage.scene.len())
            .field("animation", &self.animation)
            .finish()
    }
}

fn upload_node(
    ctx: &Context,
    name: &str,
    data: &ModelData,
    placement: Transform,
) -> anyhow::Result<Box<dyn SceneNode>> {
    let model = Model::upload(&ctx.device, &ctx.queue, data, &ctx.texture_layout)?;
    Ok(Box::new(MeshNode::new(&ctx.device, name, model, placement)))
}

pub enum FlowEvent {
    /// Sent by the web build once the asynchronous setup in `resumed` finished.
    #[cfg(target_arch = "wasm32")]
    Initialized(Box<AppState>),
    Loaded {
        request: ModelRequest,
        result: anyhow::Result<ModelData>,
    },
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(target_arch = "wasm32")]
            Self::Initialized(state) => f.debug_tuple("Initialized").field(state).finish(),
            Self::Loaded { request, result } => f
                .debug_struct("Loaded")
                .field("obj", &request.obj)
                .field("ok", &result.is_ok())
                .finish(),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<FlowEvent>,
    config: Config,
    started: bool,
    state: Option<AppState>,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: Config) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config,
            started: false,
            state: None,
        })
    }

    /// Load the pending model off the render thread and report back through the event loop.
    fn dispatch_load(&self, request: ModelRequest) {
        let proxy = self.proxy.clone();
        #[cfg(not(target_arch = "wasm32"))]
        self.async_runtime.spawn_blocking(move || {
            let result = futures::executor::block_on(request.load());
            send(&proxy, FlowEvent::Loaded { request, result });
        });
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let result = request.load().await;
            send(&proxy, FlowEvent::Loaded { request, result });
        });
    }

    fn start(&mut self, mut state: AppState) {
        if let Some(request) = state.pending.take() {
            self.dispatch_load(request);
        }
        state.animation.start(&mut state.window);
        self.state = Some(state);
    }
}

fn send(proxy: &EventLoopProxy<FlowEvent>, event: FlowEvent) {
    if let Err(e) = proxy.send_event(event) {
        log::warn!("Event loop closed before {:?} could be delivered.", e.0);
    }
}

fn create_window(event_loop: &ActiveEventLoop, config: &Config) -> anyhow::Result<Window> {
    #[allow(unused_mut)]
    let mut window_attributes = Window::default_attributes().with_title(config.title.clone());

    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use winit::platform::web::WindowAttributesExtWebSys;

        let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no browser window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;
        let canvas = document
            .get_element_by_id(&config.canvas_id)
            .ok_or_else(|| anyhow::anyhow!("no element with id {:?}", config.canvas_id))?;
        let html_canvas_element = canvas
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| anyhow::anyhow!("element {:?} is not a canvas", config.canvas_id))?;
        window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
    }

    Ok(event_loop.create_window(window_attributes)?)
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        let window = match create_window(event_loop, &self.config) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot open a window: {:#}", e);
                event_loop.exit();
                return;
            }
        };
        let init_future = AppState::new(window, self.config.clone());

        #[cfg(not(target_arch = "wasm32"))]
        match self.async_runtime.block_on(init_future) {
            Ok(state) => self.start(state),
            Err(e) => {
                log::error!("App initialization failed: {:#}", e);
                event_loop.exit();
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match init_future.await {
                    Ok(state) => send(&proxy, FlowEvent::Initialized(Box::new(state))),
                    Err(e) => log::error!("App initialization failed: {:#}", e),
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            #[cfg(target_arch = "wasm32")]
            FlowEvent::Initialized(state) => {
                // This is the message from our wasm `spawn_local`
                let mut state = *state;
                let size = state.window.inner_size();
                state.resize(size.width, size.height);
                self.start(state);
            }
            FlowEvent::Loaded { request, result } => match &mut self.state {
                Some(state) => state.on_loaded(request, result),
                None => log::warn!("{} finished loading before the scene existed.", request.obj),
            },
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                state.animation.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                state.redraw();
                if state.animation.is_stopped() {
                    log::info!("Animation stopped after {} frames.", state.animation.frames());
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

pub fn run(config: Config) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::log_1(&format!("Could not initialize logger: {e}").into());
        }
    }

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<FlowEvent> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<FlowEvent> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(not(all(
        feature = "integration-tests",
        any(target_os = "linux", target_os = "windows")
    )))]
    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
