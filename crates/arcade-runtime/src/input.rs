//! Input state management
//!
//! Platform event callbacks write into [`InputState`] (positions, held flags,
//! edge flags); the loop driver reads it during a frame and calls
//! [`InputState::new_frame`] exactly once per tick to clear the edge flags.
//! This write-then-read-and-clear handoff is the runtime's only point of
//! event-driven mutation.

use std::collections::{HashMap, HashSet};
use std::time::Instant;
use winit::keyboard::KeyCode;

/// Snapshot of the single tracked pointer/touch contact.
///
/// Coordinates are surface-local display units. Velocities are in display
/// units per millisecond; times are milliseconds since the input epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub down: bool,
    /// True only during the frame in which the press happened
    pub just_pressed: bool,
    /// True only during the frame in which the release happened
    pub just_released: bool,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub press_time: f64,
    pub release_time: f64,
}

/// Tracks pointer and keyboard input between frames
pub struct InputState {
    pointer: PointerState,
    /// Top-left of the drawing surface in event coordinates
    origin: (f32, f32),
    epoch: Instant,
    last_event_ms: f64,

    keys_down: HashSet<KeyCode>,
    keys_just_pressed: HashSet<KeyCode>,

    /// Action map: action name -> keys bound to it
    action_map: HashMap<String, Vec<KeyCode>>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::with_epoch(Instant::now())
    }

    /// Create an input state whose event times are measured from `epoch`.
    pub fn with_epoch(epoch: Instant) -> Self {
        Self {
            pointer: PointerState::default(),
            origin: (0.0, 0.0),
            epoch,
            last_event_ms: 0.0,
            keys_down: HashSet::new(),
            keys_just_pressed: HashSet::new(),
            action_map: Self::default_action_map(),
        }
    }

    fn default_action_map() -> HashMap<String, Vec<KeyCode>> {
        let mut map = HashMap::new();
        map.insert("hold".into(), vec![KeyCode::Space, KeyCode::ArrowUp]);
        map.insert("restart".into(), vec![KeyCode::KeyR, KeyCode::Enter]);
        map.insert("back".into(), vec![KeyCode::Escape]);
        map.insert("mute".into(), vec![KeyCode::KeyM]);
        map
    }

    /// Bind an action to one or more keys
    pub fn bind_action(&mut self, action: impl Into<String>, keys: Vec<KeyCode>) {
        self.action_map.insert(action.into(), keys);
    }

    /// Set the surface's top-left corner in event coordinates.
    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.origin = (x, y);
    }

    pub fn epoch(&self) -> Instant {
        self.epoch
    }

    fn millis(&self, at: Instant) -> f64 {
        at.saturating_duration_since(self.epoch).as_secs_f64() * 1000.0
    }

    fn local(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.origin.0, y - self.origin.1)
    }

    // --- Event callbacks ---

    /// Pointer/touch contact started at event coordinates `(x, y)`.
    pub fn pointer_down(&mut self, x: f32, y: f32, at: Instant) {
        let (x, y) = self.local(x, y);
        let now = self.millis(at);
        let p = &mut self.pointer;
        p.x = x;
        p.y = y;
        p.velocity_x = 0.0;
        p.velocity_y = 0.0;
        if !p.down {
            p.just_pressed = true;
        }
        p.down = true;
        p.press_time = now;
        self.last_event_ms = now;
    }

    /// Pointer moved to event coordinates `(x, y)`.
    pub fn pointer_move(&mut self, x: f32, y: f32, at: Instant) {
        let (x, y) = self.local(x, y);
        let now = self.millis(at);
        // At least 1ms between samples, so bursts of events don't spike.
        let dt = (now - self.last_event_ms).max(1.0) as f32;
        let p = &mut self.pointer;
        p.velocity_x = (x - p.x) / dt;
        p.velocity_y = (y - p.y) / dt;
        p.x = x;
        p.y = y;
        self.last_event_ms = now;
    }

    /// Pointer/touch contact ended.
    pub fn pointer_up(&mut self, at: Instant) {
        let now = self.millis(at);
        let p = &mut self.pointer;
        if p.down {
            p.just_released = true;
        }
        p.down = false;
        p.release_time = now;
        self.last_event_ms = now;
    }

    /// Process a key press event
    pub fn key_down(&mut self, key: KeyCode) {
        if !self.keys_down.contains(&key) {
            self.keys_just_pressed.insert(key);
        }
        self.keys_down.insert(key);
    }

    /// Process a key release event
    pub fn key_up(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    /// Drop all held state, e.g. when the window loses focus mid-press.
    pub fn release_all(&mut self, at: Instant) {
        self.keys_down.clear();
        if self.pointer.down {
            self.pointer_up(at);
        }
    }

    /// Clear per-frame edge flags. Called once per tick by the loop driver.
    pub fn new_frame(&mut self) {
        self.pointer.just_pressed = false;
        self.pointer.just_released = false;
        self.keys_just_pressed.clear();
    }

    // --- Query methods ---

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Is a key currently held down?
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Was a key pressed this frame?
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Is an action currently held? (any bound key is down)
    pub fn is_action_pressed(&self, action: &str) -> bool {
        self.action_map
            .get(action)
            .map(|keys| keys.iter().any(|k| self.keys_down.contains(k)))
            .unwrap_or(false)
    }

    /// Was an action just pressed this frame?
    pub fn is_action_just_pressed(&self, action: &str) -> bool {
        self.action_map
            .get(action)
            .map(|keys| keys.iter().any(|k| self.keys_just_pressed.contains(k)))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(input: &InputState, ms: u64) -> Instant {
        input.epoch() + Duration::from_millis(ms)
    }

    #[test]
    fn test_press_edge_lasts_one_frame() {
        let mut input = InputState::new();
        input.pointer_down(10.0, 20.0, at(&input, 5));

        // Sampling twice within a frame sees the same flags.
        assert!(input.pointer().just_pressed);
        assert!(input.pointer().just_pressed);
        assert!(input.pointer().down);

        input.new_frame();
        assert!(!input.pointer().just_pressed);
        assert!(input.pointer().down);
    }

    #[test]
    fn test_release_edge() {
        let mut input = InputState::new();
        input.pointer_down(0.0, 0.0, at(&input, 0));
        input.new_frame();
        input.pointer_up(at(&input, 40));
        assert!(input.pointer().just_released);
        assert!(!input.pointer().down);
        assert_eq!(input.pointer().release_time, 40.0);
        input.new_frame();
        assert!(!input.pointer().just_released);
    }

    #[test]
    fn test_release_without_press_has_no_edge() {
        let mut input = InputState::new();
        input.pointer_up(at(&input, 1));
        assert!(!input.pointer().just_released);
    }

    #[test]
    fn test_positions_are_surface_local() {
        let mut input = InputState::new();
        input.set_origin(100.0, 50.0);
        input.pointer_down(130.0, 70.0, at(&input, 0));
        assert_eq!((input.pointer().x, input.pointer().y), (30.0, 20.0));
    }

    #[test]
    fn test_velocity_is_discrete_difference() {
        let mut input = InputState::new();
        input.pointer_down(0.0, 0.0, at(&input, 0));
        input.pointer_move(20.0, -10.0, at(&input, 10));
        assert!((input.pointer().velocity_x - 2.0).abs() < 1e-6);
        assert!((input.pointer().velocity_y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_divisor_floor() {
        let mut input = InputState::new();
        input.pointer_down(0.0, 0.0, at(&input, 10));
        // Same-millisecond move: divided by 1ms, not by ~0.
        input.pointer_move(5.0, 0.0, at(&input, 10));
        assert!((input.pointer().velocity_x - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_key_transitions() {
        let mut input = InputState::new();

        input.key_down(KeyCode::Space);
        assert!(input.is_key_down(KeyCode::Space));
        assert!(input.is_key_just_pressed(KeyCode::Space));

        // Key repeat does not re-trigger the edge.
        input.new_frame();
        input.key_down(KeyCode::Space);
        assert!(!input.is_key_just_pressed(KeyCode::Space));

        input.key_up(KeyCode::Space);
        assert!(!input.is_key_down(KeyCode::Space));
    }

    #[test]
    fn test_action_map() {
        let mut input = InputState::new();
        assert!(!input.is_action_pressed("hold"));

        input.key_down(KeyCode::ArrowUp);
        assert!(input.is_action_pressed("hold"));
        assert!(input.is_action_just_pressed("hold"));

        input.new_frame();
        assert!(input.is_action_pressed("hold"));
        assert!(!input.is_action_just_pressed("hold"));
    }

    #[test]
    fn test_custom_binding() {
        let mut input = InputState::new();
        input.bind_action("hold", vec![KeyCode::KeyW]);
        input.key_down(KeyCode::Space);
        assert!(!input.is_action_pressed("hold"));
        input.key_down(KeyCode::KeyW);
        assert!(input.is_action_pressed("hold"));
        assert!(!input.is_action_pressed("unbound"));
    }

    #[test]
    fn test_release_all_on_focus_loss() {
        let mut input = InputState::new();
        input.key_down(KeyCode::Space);
        input.pointer_down(1.0, 1.0, at(&input, 0));
        input.release_all(at(&input, 5));
        assert!(!input.is_key_down(KeyCode::Space));
        assert!(!input.pointer().down);
        assert!(input.pointer().just_released);
    }
}
