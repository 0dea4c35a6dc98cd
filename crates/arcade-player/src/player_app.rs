//! Player application implementing winit ApplicationHandler
//!
//! Window and device events become runtime input; every redraw drives one
//! arcade frame and presents the surface's draw list.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use arcade_games::Arcade;
use arcade_runtime::DisplaySize;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId};

use crate::config::WindowConfig;
use crate::render::{Presenter, RenderContext};

pub struct PlayerApp {
    arcade: Arcade,
    window_config: WindowConfig,
    deep_link: Option<String>,
    mounted: bool,

    // Rendering
    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    presenter: Option<Presenter>,

    /// Last cursor position in logical units
    cursor: (f32, f32),
    /// Touch currently acting as the pointer
    active_touch: Option<u64>,
    error: Option<anyhow::Error>,
}

impl PlayerApp {
    pub fn new(arcade: Arcade, window_config: WindowConfig, deep_link: Option<String>) -> Self {
        Self {
            arcade,
            window_config,
            deep_link,
            mounted: false,
            window: None,
            render_context: None,
            presenter: None,
            cursor: (0.0, 0.0),
            active_touch: None,
            error: None,
        }
    }

    /// The error that ended the event loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.window_config.title.clone())
            .with_inner_size(LogicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );
        if self.window_config.fullscreen {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let render_context = pollster::block_on(RenderContext::new(window.clone()))
            .context("Failed to initialize rendering")?;
        self.presenter = Some(Presenter::new(&render_context));
        self.render_context = Some(render_context);

        // Size the surface before the first module sees it.
        self.arcade.runtime_mut().resize(display_size(&window));
        self.window = Some(window);

        if !self.mounted {
            self.mounted = true;
            self.arcade.mount(self.deep_link.as_deref());
        }
        Ok(())
    }

    fn scale_factor(&self) -> f64 {
        self.window.as_ref().map_or(1.0, |w| w.scale_factor())
    }

    fn logical(&self, position: PhysicalPosition<f64>) -> (f32, f32) {
        let logical = position.to_logical::<f32>(self.scale_factor());
        (logical.x, logical.y)
    }

    fn request_resize(&mut self) {
        if let Some(window) = &self.window {
            let display = display_size(window);
            self.arcade.runtime_mut().request_resize(display);
        }
    }

    fn toggle_fullscreen(&self) {
        if let Some(window) = &self.window {
            if window.fullscreen().is_some() {
                window.set_fullscreen(None);
            } else {
                window.set_fullscreen(Some(Fullscreen::Borderless(None)));
            }
        }
    }

    fn pointer_pressed(&mut self, x: f32, y: f32) {
        self.arcade.on_user_gesture();
        self.arcade
            .runtime_mut()
            .input
            .pointer_down(x, y, Instant::now());
    }

    fn key_event(&mut self, event_loop: &ActiveEventLoop, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                match key {
                    KeyCode::F11 => {
                        self.toggle_fullscreen();
                        return;
                    }
                    KeyCode::Escape if self.arcade.active_id().is_none() => {
                        event_loop.exit();
                        return;
                    }
                    _ => {}
                }
                self.arcade.on_user_gesture();
                self.arcade.runtime_mut().input.key_down(key);
            }
            ElementState::Released => self.arcade.runtime_mut().input.key_up(key),
        }
    }

    fn redraw(&mut self) {
        self.arcade.frame(Instant::now());

        let scale_factor = self.scale_factor() as f32;
        let (Some(context), Some(presenter)) = (&self.render_context, &mut self.presenter) else {
            return;
        };
        let runtime = self.arcade.runtime();
        presenter.present(
            context,
            runtime.surface().commands(),
            runtime.pixel_ratio(),
            scale_factor,
        );
    }
}

impl ApplicationHandler for PlayerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.initialize(event_loop) {
            log::error!("{e:#}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(context) = &mut self.render_context {
                    context.resize(new_size);
                }
                self.request_resize();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                self.request_resize();
            }

            WindowEvent::Focused(focused) => {
                if focused {
                    self.arcade.resume();
                } else {
                    self.active_touch = None;
                    self.arcade.suspend(Instant::now());
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = self.logical(position);
                self.cursor = (x, y);
                self.arcade
                    .runtime_mut()
                    .input
                    .pointer_move(x, y, Instant::now());
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    let (x, y) = self.cursor;
                    self.pointer_pressed(x, y);
                }
                ElementState::Released => {
                    self.arcade.runtime_mut().input.pointer_up(Instant::now());
                }
            },

            WindowEvent::Touch(touch) => {
                let (x, y) = self.logical(touch.location);
                match touch.phase {
                    TouchPhase::Started if self.active_touch.is_none() => {
                        self.active_touch = Some(touch.id);
                        self.pointer_pressed(x, y);
                    }
                    TouchPhase::Moved if self.active_touch == Some(touch.id) => {
                        self.arcade
                            .runtime_mut()
                            .input
                            .pointer_move(x, y, Instant::now());
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled
                        if self.active_touch == Some(touch.id) =>
                    {
                        self.active_touch = None;
                        self.arcade.runtime_mut().input.pointer_up(Instant::now());
                    }
                    _ => {}
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    self.key_event(event_loop, key_code, event.state);
                }
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("player: exiting");
    }
}

fn display_size(window: &Window) -> DisplaySize {
    let scale = window.scale_factor();
    let logical = window.inner_size().to_logical::<f32>(scale);
    DisplaySize::new(logical.width, logical.height, scale as f32)
}
