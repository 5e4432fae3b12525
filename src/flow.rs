//! Application event loop.
//!
//! [`App`] is the winit [`ApplicationHandler`] that owns the window, the [`GpuBackend`] and the
//! CPU-side [`RenderContext`]. Each redraw runs one frame through the [`FrameOrchestrator`];
//! once the event queue drains, the next redraw is requested so the scene keeps animating.
//!
//! # Keys
//!
//! - `Esc` quits
//! - `.` toggles borderless fullscreen
//! - `T` / `Z` reload the seafloor / water shader from the asset directory
//! - navigation keys and mouse drags go to the [`crate::camera::CameraController`]

use std::sync::Arc;

use log::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window},
};

use crate::{
    backend::GpuBackend,
    camera::Camera,
    config::Config,
    context::Context,
    orchestrator::FrameOrchestrator,
    render::{RenderBackend, RenderContext, SurfaceError},
    scene::{self, RenderableGroup, Scene, WavySeafloor},
};

/// Everything that exists once the window is up.
#[derive(Debug)]
struct AppState {
    ctx: RenderContext,
    backend: GpuBackend,
}

impl AppState {
    async fn new(window: Arc<Window>, config: Config) -> anyhow::Result<Self> {
        let gpu = Context::new(window).await?;
        let mut config = config;
        config.width = gpu.config.width;
        config.height = gpu.config.height;

        let ground = WavySeafloor::from_config(&config);
        let scene = Scene::new(&config, scene::reef_layout(&ground));
        let backend = GpuBackend::new(gpu, &config, &scene)?;
        let camera = Camera::from_config(&config);
        Ok(Self {
            ctx: RenderContext::new(config, camera, scene),
            backend,
        })
    }

    fn window(&self) -> &Window {
        self.backend.context().window()
    }

    fn reload(&mut self, group: RenderableGroup) {
        if let Err(e) = self.backend.reload_shader(group) {
            warn!("keeping the current {} shader: {:#}", group.label(), e);
        }
    }

    fn toggle_fullscreen(&self) {
        let window = self.window();
        if window.fullscreen().is_some() {
            window.set_fullscreen(None);
        } else {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    // Taken when the window is created.
    config: Option<Config>,
    state: Option<AppState>,
    orchestrator: FrameOrchestrator,
    // Startup failure, handed back by `run`.
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            async_runtime: tokio::runtime::Runtime::new()?,
            config: Some(config),
            state: None,
            orchestrator: FrameOrchestrator::new(),
            error: None,
        })
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        let Some(state) = &mut self.state else {
            return;
        };
        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::Period => state.toggle_fullscreen(),
            KeyCode::KeyT => state.reload(RenderableGroup::Seafloor),
            KeyCode::KeyZ => state.reload(RenderableGroup::Water),
            _ => (),
        }
    }

    fn redraw(&mut self) {
        let Some(state) = &mut self.state else {
            return;
        };
        let Err(e) = self
            .orchestrator
            .render_frame(&mut state.ctx, &mut state.backend)
        else {
            return;
        };
        match e.downcast_ref::<SurfaceError>() {
            Some(SurfaceError::Lost | SurfaceError::Outdated) => state.backend.reconfigure(),
            Some(SurfaceError::Timeout | SurfaceError::Occluded) => {
                debug!("{}, skipping frame", e)
            }
            _ => error!("Unable to render {:#}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(config) = self.config.take() else {
            return;
        };
        let window_attributes = Window::default_attributes()
            .with_title(config.window_title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height));

        let started = event_loop
            .create_window(window_attributes)
            .map_err(anyhow::Error::from)
            .and_then(|window| {
                self.async_runtime
                    .block_on(AppState::new(Arc::new(window), config))
            });
        match started {
            Ok(state) => {
                info!("scene ready with {} props", state.ctx.scene.props.len());
                state.window().request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                error!("startup failed: {:#}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        state.ctx.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                state
                    .ctx
                    .resize(&mut state.backend, size.width, size.height)
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window().request_redraw();
        }
    }
}

/// Open the window and run the reef until it is closed.
pub fn run(config: Config) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
