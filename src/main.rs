use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window as WinitWindow, WindowId},
};

use scroll_scene::cli::Cli;
use scroll_scene::config::SceneConfig;
use scroll_scene::context::SceneContext;
use scroll_scene::core::{Button, Controller, FpsCounter, WinitController};
use scroll_scene::loaders::TextureLoader;
use scroll_scene::render_loop::RenderLoop;
use scroll_scene::renderer::{HudStats, SceneRenderer};
use scroll_scene::scenes::create_space_scene;
use scroll_scene::scroll;
use scroll_scene::window::Window;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

struct App {
    cli: Cli,
    config: SceneConfig,
    rng: StdRng,
    loader: TextureLoader,
    window: Option<Window>,
    renderer: Option<SceneRenderer>,
    context: Option<SceneContext>,
    controller: WinitController,
    render_loop: RenderLoop,
    fps: FpsCounter,
}

impl App {
    fn new(cli: Cli, config: SceneConfig, rng: StdRng) -> Self {
        Self {
            loader: TextureLoader::new(&cli.assets),
            controller: WinitController::new(config.scroll.line_height),
            render_loop: RenderLoop::new(cli.frames),
            fps: FpsCounter::default(),
            window: None,
            renderer: None,
            context: None,
            cli,
            config,
            rng,
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.render_loop.stop();
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(renderer), Some(ctx)) =
            (&self.window, &mut self.renderer, &mut self.context)
        else {
            return;
        };

        let ready = ctx.poll_textures();
        renderer.sync_textures(&ctx.scene, &ready);

        let (dx, dy) = self.controller.mouse_delta();
        let viewport_height = window.inner_size().height as f32;
        if self.controller.is_down(Button::MouseLeft) {
            ctx.controls.rotate(dx, dy, viewport_height);
        } else if self
            .controller
            .any_down(&[Button::MouseRight, Button::MouseMiddle])
        {
            ctx.controls.pan(dx, dy, &ctx.camera, viewport_height);
        }
        self.controller.reset_deltas();

        let Some(frame) = self.render_loop.tick(ctx) else {
            event_loop.exit();
            return;
        };

        if let Some(fps) = self.fps.record(frame.delta) {
            log::debug!("FPS: {:.1}", fps);
        }

        let stats = HudStats {
            fps: self.fps.fps(),
            frame: frame.number,
            scroll_top: ctx.scroll.top(),
            loop_state: self.render_loop.state(),
            pending_textures: ctx.pending_texture_count(),
        };

        match window.draw(renderer, ctx, &stats) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, exiting");
                self.render_loop.stop();
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            WinitWindow::default_attributes()
                .with_title(self.config.window.title.as_str())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                self.shutdown(event_loop);
                return;
            }
        };

        let size = window.inner_size();
        let mut ctx = create_space_scene(&self.config, &mut self.rng, size.width, size.height);
        ctx.request_textures(&self.loader);

        let renderer = match pollster::block_on(SceneRenderer::new(
            window.clone(),
            &ctx.scene,
            !self.cli.no_ui,
        )) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                self.shutdown(event_loop);
                return;
            }
        };

        self.window = Some(Window::new(window));
        self.renderer = Some(renderer);
        self.context = Some(ctx);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window.inner(), &event) {
                return;
            }
        }

        if let Some(delta) = self.controller.process_event(&event) {
            if let Some(ctx) = &mut self.context {
                scroll::on_scroll(ctx, delta);
            }
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput { .. } if self.controller.is_down(Button::Escape) => {
                self.shutdown(event_loop)
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size);
                }
                if let Some(ctx) = &mut self.context {
                    ctx.camera.set_aspect(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.render_loop.is_running() {
            event_loop.exit();
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = SceneConfig::load_or_default(cli.config.as_deref())?;
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, config, rng);

    log::info!("Scroll to fly the camera, drag to orbit, right- or middle-drag to pan, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
