//! Dash tuning and difficulty curves
//!
//! Distances are in logical display units. Only drawing multiplies them by
//! the runtime's pixel ratio, so the game plays the same on every display.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Downward acceleration while not holding (units/s²)
    pub gravity: f32,
    /// Upward acceleration while holding (units/s²)
    pub lift: f32,
    /// Cap on vertical speed in either direction (units/s)
    pub max_vertical_speed: f32,
    pub player_size: f32,
    /// Player's horizontal position as a fraction of field width
    pub player_x: f32,

    pub obstacle_width: f32,
    /// Vertical opening between the two halves of a pair
    pub gap_size: f32,
    /// Minimum distance between a gap and the field's top/bottom edges
    pub safe_margin: f32,

    /// Scroll speed at the start of a run (units/s)
    pub base_speed: f32,
    /// Scroll speed the ramp levels off at (units/s)
    pub max_speed: f32,
    /// Seconds of play until the target speed reaches `max_speed`
    pub ramp_seconds: f32,
    /// Rate of the exponential approach toward the target speed (1/s)
    pub speed_smoothing: f32,

    /// Delay before the first pair spawns (s)
    pub first_spawn_delay: f32,
    /// Interval between pairs at score 0 (s)
    pub spawn_interval: f32,
    /// Interval never shrinks below this (s)
    pub spawn_interval_floor: f32,
    /// Interval reduction per point scored (s)
    pub spawn_shrink_per_point: f32,

    /// Fixed RNG seed; seeded from the clock when unset
    pub seed: Option<u32>,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            gravity: 1400.0,
            lift: 1800.0,
            max_vertical_speed: 520.0,
            player_size: 26.0,
            player_x: 0.22,
            obstacle_width: 56.0,
            gap_size: 170.0,
            safe_margin: 40.0,
            base_speed: 220.0,
            max_speed: 520.0,
            ramp_seconds: 90.0,
            speed_smoothing: 3.0,
            first_spawn_delay: 1.0,
            spawn_interval: 1.6,
            spawn_interval_floor: 0.75,
            spawn_shrink_per_point: 0.025,
            seed: None,
        }
    }
}

impl DashConfig {
    /// Target scroll speed after `elapsed` seconds of play.
    ///
    /// Quadratic ease-in from `base_speed`, capped at `max_speed` once
    /// `ramp_seconds` have passed.
    pub fn target_speed(&self, elapsed: f32) -> f32 {
        let t = if self.ramp_seconds > 0.0 {
            (elapsed.max(0.0) / self.ramp_seconds).min(1.0)
        } else {
            1.0
        };
        self.base_speed + (self.max_speed - self.base_speed) * t * t
    }

    /// Move `current` toward `target` with frame-rate independent smoothing.
    pub fn smooth_speed(&self, current: f32, target: f32, dt: f32) -> f32 {
        let blend = 1.0 - (-self.speed_smoothing.max(0.0) * dt.max(0.0)).exp();
        current + (target - current) * blend
    }

    /// Spawn interval allowed at `score`: shrinks linearly, floored.
    pub fn spawn_interval_for(&self, score: u32) -> f32 {
        let shrunk = self.spawn_interval - self.spawn_shrink_per_point.max(0.0) * score as f32;
        shrunk.max(self.spawn_interval_floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_interval_monotonic_and_floored() {
        let config = DashConfig::default();
        let mut previous = f32::INFINITY;
        for score in 0..500 {
            let interval = config.spawn_interval_for(score);
            assert!(interval <= previous, "score {score}");
            assert!(interval >= config.spawn_interval_floor, "score {score}");
            previous = interval;
        }
        assert_eq!(config.spawn_interval_for(10_000), config.spawn_interval_floor);
    }

    #[test]
    fn negative_shrink_cannot_grow_interval() {
        let config = DashConfig {
            spawn_shrink_per_point: -1.0,
            ..DashConfig::default()
        };
        assert_eq!(config.spawn_interval_for(50), config.spawn_interval);
    }

    #[test]
    fn target_speed_accelerates_then_caps() {
        let config = DashConfig::default();
        assert_eq!(config.target_speed(0.0), config.base_speed);
        let early = config.target_speed(10.0) - config.target_speed(0.0);
        let late = config.target_speed(60.0) - config.target_speed(50.0);
        assert!(late > early, "curve should accelerate");
        assert_eq!(config.target_speed(config.ramp_seconds), config.max_speed);
        assert_eq!(config.target_speed(10_000.0), config.max_speed);

        let mut previous = 0.0;
        for step in 0..200 {
            let speed = config.target_speed(step as f32);
            assert!(speed >= previous);
            previous = speed;
        }
    }

    #[test]
    fn smoothing_approaches_without_overshoot() {
        let config = DashConfig::default();
        let mut speed = 100.0;
        for _ in 0..1000 {
            let next = config.smooth_speed(speed, 200.0, 0.033);
            assert!(next >= speed && next <= 200.0);
            speed = next;
        }
        assert!((speed - 200.0).abs() < 0.01);
        // A zero-length frame changes nothing.
        assert_eq!(config.smooth_speed(150.0, 200.0, 0.0), 150.0);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: DashConfig = toml::from_str("gravity = 900.0\nseed = 5").unwrap();
        assert_eq!(config.gravity, 900.0);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.lift, DashConfig::default().lift);
    }
}
