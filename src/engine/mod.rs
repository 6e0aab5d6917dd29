pub mod core;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod resources;
pub mod sprite;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use self::core::{EngineConfig, FrameTiming};
use platform::{InputEvent, PlatformLayer};
use renderer::Renderer;
use resources::ResourceManager;
use sprite::SpriteFrame;
use wgpu::SurfaceError;
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use crate::game::Game;

pub struct EngineApp {
    config: EngineConfig,
    platform: PlatformLayer,
    resources: ResourceManager,
    game: Game,
    failure: Option<anyhow::Error>,
}

impl EngineApp {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let mut resources = ResourceManager::default();
        let game = Game::init(
            config.window_width,
            config.window_height,
            &config.assets,
            &mut resources,
        )
        .context("failed to load game assets")?;

        Ok(Self {
            config,
            platform: PlatformLayer::new(),
            resources,
            game,
            failure: None,
        })
    }

    pub fn run(mut self) -> Result<()> {
        tracing::info!(target: "engine", app = %self.config.app_name, "Engine starting");

        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(self.config.app_name.clone())
                .with_resizable(false)
                .with_inner_size(LogicalSize::new(
                    self.config.window_width as f64,
                    self.config.window_height as f64,
                ))
                .build(&event_loop)
                .context("failed to create window")?,
        );
        let mut renderer: Option<Renderer> = None;
        let mut last_frame = Instant::now();

        event_loop
            .run(|event, target| match event {
                Event::Resumed => {
                    if renderer.is_none() {
                        match self.start_renderer(window.clone()) {
                            Ok(new_renderer) => {
                                tracing::info!(target: "engine", "renderer initialized");
                                renderer = Some(new_renderer);
                                last_frame = Instant::now();
                            }
                            Err(err) => {
                                tracing::error!(target: "engine", error = %format!("{err:#}"), "failed to initialize renderer");
                                self.failure = Some(err);
                                target.exit();
                            }
                        }
                    }
                }
                Event::AboutToWait => {
                    if renderer.is_some() {
                        window.request_redraw();
                    }
                }
                Event::WindowEvent { window_id, event } if window_id == window.id() => {
                    match event {
                        WindowEvent::CloseRequested => {
                            tracing::info!(target: "engine", "window close requested");
                            target.exit();
                        }
                        WindowEvent::Resized(size) => {
                            if let Some(renderer) = renderer.as_mut() {
                                renderer.resize(size);
                            }
                        }
                        WindowEvent::ScaleFactorChanged {
                            mut inner_size_writer,
                            ..
                        } => {
                            let new_size = window.inner_size();
                            let _ = inner_size_writer.request_inner_size(new_size);
                            if let Some(renderer) = renderer.as_mut() {
                                renderer.resize(new_size);
                            }
                        }
                        WindowEvent::Focused(false) => self.game.release_actions(),
                        WindowEvent::KeyboardInput { event, .. } => {
                            match self.platform.translate_key(&event) {
                                Some(InputEvent::Action { action, pressed }) => {
                                    self.game.set_action(action, pressed);
                                }
                                Some(InputEvent::Quit) => target.exit(),
                                None => {}
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            if let Some(renderer) = renderer.as_mut() {
                                let now = Instant::now();
                                let timing = FrameTiming::from_delta(now.duration_since(last_frame));
                                last_frame = now;

                                let frame = self.tick(timing);
                                match renderer.render(&frame) {
                                    Ok(()) => {}
                                    Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                                        renderer.resize(window.inner_size());
                                    }
                                    Err(SurfaceError::OutOfMemory) => {
                                        tracing::error!("GPU out of memory, shutting down engine");
                                        self.failure = Some(anyhow!("GPU out of memory"));
                                        target.exit();
                                    }
                                    Err(SurfaceError::Timeout) => {
                                        tracing::warn!("surface timeout, retrying next frame");
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            })
            .map_err(|err| anyhow!(err))?;

        tracing::info!(
            target: "engine",
            uptime_secs = self.platform.uptime().as_secs(),
            "Engine shutdown complete"
        );
        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn start_renderer(&self, window: Arc<Window>) -> Result<Renderer> {
        let mut renderer = pollster::block_on(Renderer::new(window))?;
        renderer
            .upload(&self.resources)
            .context("failed to upload assets to the GPU")?;
        Ok(renderer)
    }

    fn tick(&mut self, timing: FrameTiming) -> SpriteFrame {
        let dt = timing.delta_seconds;
        self.game.process_input(dt);
        self.game.update(dt);
        self.game.render();
        let frame = self.game.take_frame();
        tracing::trace!(
            target: "engine",
            frame_delta_ms = dt * 1000.0,
            fps = timing.fps,
            sprites = frame.draws.len(),
            "frame tick"
        );
        frame
    }
}
