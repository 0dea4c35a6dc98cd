//! Runtime Core
//!
//! Owns the frame loop, input, audio, store, and drawing surface, and exposes
//! `run`/`stop`/`resize` to the hosting shell. Game code receives `&mut Runtime`
//! for the duration of each call and never keeps it.

use crate::clock::{FrameLoop, DEFAULT_MAX_DT};
use crate::input::InputState;
use crate::persist::PersistentStore;
use crate::surface::Surface;
use arcade_audio::AudioBackend;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Runtime tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Upper clamp on per-frame delta time, in seconds
    pub max_dt: f32,
    /// Upper clamp on the device pixel ratio used to size the surface
    pub max_pixel_ratio: f32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_dt: DEFAULT_MAX_DT,
            max_pixel_ratio: 3.0,
        }
    }
}

/// Display size in logical units plus the display's device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl DisplaySize {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }
}

/// Per-frame callbacks driven by the runtime loop.
pub trait FrameHandler {
    /// Advance simulation by `dt` seconds.
    fn update(&mut self, rt: &mut Runtime, dt: f32);

    /// Draw the current state onto `rt.surface_mut()`.
    fn render(&mut self, rt: &mut Runtime);
}

pub struct Runtime {
    config: RuntimeConfig,
    frame_loop: FrameLoop,
    surface: Surface,
    display: DisplaySize,
    pixel_ratio: f32,
    pending_resize: Option<DisplaySize>,

    pub input: InputState,
    pub audio: AudioBackend,
    pub store: PersistentStore,
}

impl Runtime {
    pub fn new(
        config: RuntimeConfig,
        display: DisplaySize,
        audio: AudioBackend,
        store: PersistentStore,
    ) -> Self {
        let mut runtime = Self {
            frame_loop: FrameLoop::new(config.max_dt),
            config,
            surface: Surface::default(),
            display,
            pixel_ratio: 1.0,
            pending_resize: None,
            input: InputState::new(),
            audio,
            store,
        };
        runtime.resize(display);
        runtime
    }

    /// Runtime with in-memory store and silent audio, for tools and tests.
    pub fn headless(width: f32, height: f32) -> Self {
        Self::new(
            RuntimeConfig::default(),
            DisplaySize::new(width, height, 1.0),
            AudioBackend::silent(),
            PersistentStore::in_memory("arcade"),
        )
    }

    // --- Loop ---

    /// Start the frame loop. No-op when already running.
    pub fn run(&mut self) {
        if self.frame_loop.run() {
            log::debug!("runtime: loop started");
        }
    }

    /// Halt the frame loop. Safe to call from inside `update`/`render`.
    pub fn stop(&mut self) {
        if self.frame_loop.is_running() {
            log::debug!("runtime: loop stopped");
        }
        self.frame_loop.stop();
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Make the next frame start from `dt = 0`.
    pub fn reset_clock(&mut self) {
        self.frame_loop.reset_clock();
    }

    /// Drive one frame at `now`.
    ///
    /// Applies the latest pending resize, then (if the loop is running)
    /// calls `update` followed by `render`. A `stop()` issued from `update`
    /// still lets this frame's `render` complete, but no later frame runs.
    /// Input edge flags are cleared at the end, exactly once per call.
    /// Returns whether `update`/`render` ran.
    pub fn frame(&mut self, now: Instant, handler: &mut dyn FrameHandler) -> bool {
        if let Some(display) = self.pending_resize.take() {
            self.resize(display);
        }

        let ran = match self.frame_loop.begin(now) {
            Some(dt) => {
                handler.update(self, dt);
                handler.render(self);
                true
            }
            None => false,
        };

        self.input.new_frame();
        ran
    }

    // --- Surface ---

    /// Queue a resize; only the most recent request before the next frame applies.
    pub fn request_resize(&mut self, display: DisplaySize) {
        self.pending_resize = Some(display);
    }

    /// Recompute the surface's pixel size from `display`.
    ///
    /// The device pixel ratio is clamped to `max_pixel_ratio`. Returns
    /// `false` and leaves the surface untouched when nothing changes.
    pub fn resize(&mut self, display: DisplaySize) -> bool {
        self.display = display;
        let ratio = effective_pixel_ratio(display.device_pixel_ratio, self.config.max_pixel_ratio);
        let width = to_device_pixels(display.width, ratio);
        let height = to_device_pixels(display.height, ratio);
        self.pixel_ratio = ratio;

        let changed = self.surface.set_size(width, height);
        if changed {
            log::debug!("runtime: surface resized to {width}x{height} (ratio {ratio})");
        }
        changed
    }

    /// Surface width in device pixels.
    pub fn width(&self) -> f32 {
        self.surface.width() as f32
    }

    /// Surface height in device pixels.
    pub fn height(&self) -> f32 {
        self.surface.height() as f32
    }

    /// Device pixels per logical display unit.
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn display(&self) -> DisplaySize {
        self.display
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }
}

fn effective_pixel_ratio(device_pixel_ratio: f32, max: f32) -> f32 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(max.max(1.0))
    } else {
        1.0
    }
}

fn to_device_pixels(logical: f32, ratio: f32) -> u32 {
    (logical.max(0.0) * ratio).round().max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Canvas;
    use arcade_core::{Color, Rect};
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        stop_in_update: bool,
    }

    impl FrameHandler for Recorder {
        fn update(&mut self, rt: &mut Runtime, dt: f32) {
            self.calls.push(format!("update {dt:.3}"));
            if self.stop_in_update {
                rt.stop();
            }
        }

        fn render(&mut self, rt: &mut Runtime) {
            self.calls.push("render".into());
            rt.surface_mut().fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        }
    }

    #[test]
    fn frames_alternate_update_and_render() {
        let mut rt = Runtime::headless(320.0, 240.0);
        let mut handler = Recorder::default();
        let t0 = Instant::now();

        assert!(!rt.frame(t0, &mut handler));
        rt.run();
        assert!(rt.frame(t0, &mut handler));
        assert!(rt.frame(t0 + Duration::from_millis(16), &mut handler));

        assert_eq!(
            handler.calls,
            vec!["update 0.000", "render", "update 0.016", "render"]
        );
    }

    #[test]
    fn stop_inside_update_finishes_frame_then_halts() {
        let mut rt = Runtime::headless(320.0, 240.0);
        let mut handler = Recorder {
            stop_in_update: true,
            ..Default::default()
        };
        rt.run();
        let t0 = Instant::now();
        assert!(rt.frame(t0, &mut handler));
        assert!(!rt.frame(t0 + Duration::from_millis(16), &mut handler));
        assert_eq!(handler.calls, vec!["update 0.000", "render"]);
    }

    #[test]
    fn run_twice_keeps_clock() {
        let mut rt = Runtime::headless(320.0, 240.0);
        let mut handler = Recorder::default();
        let t0 = Instant::now();
        rt.run();
        rt.frame(t0, &mut handler);
        rt.run();
        rt.frame(t0 + Duration::from_millis(20), &mut handler);
        assert_eq!(handler.calls[2], "update 0.020");
    }

    #[test]
    fn frame_clears_edge_flags() {
        let mut rt = Runtime::headless(320.0, 240.0);
        let mut handler = Recorder::default();
        let at = rt.input.epoch();
        rt.input.pointer_down(1.0, 1.0, at);
        rt.frame(Instant::now(), &mut handler);
        assert!(!rt.input.pointer().just_pressed);
        assert!(rt.input.pointer().down);
    }

    #[test]
    fn resize_scales_by_pixel_ratio() {
        let mut rt = Runtime::headless(100.0, 50.0);
        assert!(rt.resize(DisplaySize::new(400.0, 300.0, 2.0)));
        assert_eq!((rt.width(), rt.height()), (800.0, 600.0));
        assert_eq!(rt.pixel_ratio(), 2.0);
    }

    #[test]
    fn pixel_ratio_is_capped() {
        let mut rt = Runtime::headless(100.0, 50.0);
        rt.resize(DisplaySize::new(100.0, 100.0, 4.0));
        assert_eq!(rt.pixel_ratio(), 3.0);
        assert_eq!(rt.width(), 300.0);

        rt.resize(DisplaySize::new(100.0, 100.0, f32::NAN));
        assert_eq!(rt.pixel_ratio(), 1.0);
    }

    #[test]
    fn unchanged_resize_leaves_surface_untouched() {
        let mut rt = Runtime::headless(100.0, 50.0);
        rt.surface_mut().clear(Color::BLACK);
        let generation = rt.surface().generation();
        assert!(!rt.resize(DisplaySize::new(100.0, 50.0, 1.0)));
        assert_eq!(rt.surface().generation(), generation);
        assert_eq!(rt.surface().commands().len(), 1);
    }

    #[test]
    fn only_latest_pending_resize_applies() {
        let mut rt = Runtime::headless(100.0, 50.0);
        let mut handler = Recorder::default();
        let generation = rt.surface().generation();
        rt.request_resize(DisplaySize::new(200.0, 100.0, 1.0));
        rt.request_resize(DisplaySize::new(300.0, 150.0, 1.0));
        rt.request_resize(DisplaySize::new(640.0, 480.0, 1.0));
        rt.frame(Instant::now(), &mut handler);
        assert_eq!((rt.width(), rt.height()), (640.0, 480.0));
        assert_eq!(rt.surface().generation(), generation + 1);
    }
}
