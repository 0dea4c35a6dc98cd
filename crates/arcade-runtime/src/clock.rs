//! Frame clock and loop scheduling

use std::time::Instant;

/// Default upper bound on a frame's delta time, in seconds.
pub const DEFAULT_MAX_DT: f32 = 0.033;

/// Produces a clamped per-frame `dt`.
///
/// The first tick yields `dt = 0`. Later ticks yield the time since the
/// previous tick clamped to `[0, max_dt]`, so a stalled or suspended process
/// resumes with one small step instead of a large physics jump.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_dt: f32,
    /// Number of ticks taken so far
    pub frame_index: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last: None,
            max_dt: max_dt.max(0.0),
            frame_index: 0,
        }
    }

    /// Advance the clock to `now` and return the clamped delta in seconds.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = match self.last {
            Some(last) => now
                .saturating_duration_since(last)
                .as_secs_f32()
                .clamp(0.0, self.max_dt),
            None => 0.0,
        };
        self.last = Some(now);
        self.frame_index = self.frame_index.wrapping_add(1);
        dt
    }

    /// Advance the clock using the host's monotonic clock.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Forget the previous timestamp; the next tick yields `dt = 0`.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Start/stop state of the continuous frame loop.
///
/// The clock is ephemeral: `run` creates a fresh one and `stop` drops it.
#[derive(Debug)]
pub struct FrameLoop {
    clock: Option<FrameClock>,
    max_dt: f32,
}

impl FrameLoop {
    pub fn new(max_dt: f32) -> Self {
        Self {
            clock: None,
            max_dt,
        }
    }

    /// Start scheduling frames. Returns `false` if already running.
    pub fn run(&mut self) -> bool {
        if self.clock.is_some() {
            return false;
        }
        self.clock = Some(FrameClock::new(self.max_dt));
        true
    }

    /// Halt the loop. Safe to call from inside a frame; no later frame runs.
    pub fn stop(&mut self) {
        self.clock = None;
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_some()
    }

    /// Begin a frame at `now`, returning its `dt` if the loop is running.
    pub fn begin(&mut self, now: Instant) -> Option<f32> {
        self.clock.as_mut().map(|clock| clock.tick_at(now))
    }

    /// Make the next frame start from `dt = 0` (e.g. after a pause).
    pub fn reset_clock(&mut self) {
        if let Some(clock) = &mut self.clock {
            clock.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick_at(Instant::now()), 0.0);
        assert_eq!(clock.frame_index, 1);
    }

    #[test]
    fn test_delta_is_measured() {
        let mut clock = FrameClock::new(0.033);
        let t0 = Instant::now();
        clock.tick_at(t0);
        let dt = clock.tick_at(t0 + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-4);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::new(0.033);
        let t0 = Instant::now();
        clock.tick_at(t0);
        let dt = clock.tick_at(t0 + Duration::from_secs(5));
        assert!((dt - 0.033).abs() < 1e-6);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::new(0.033);
        let t0 = Instant::now() + Duration::from_secs(1);
        clock.tick_at(t0);
        assert_eq!(clock.tick_at(t0 - Duration::from_millis(10)), 0.0);
    }

    #[test]
    fn test_reset_restarts_baseline() {
        let mut clock = FrameClock::new(0.033);
        let t0 = Instant::now();
        clock.tick_at(t0);
        clock.reset();
        assert_eq!(clock.tick_at(t0 + Duration::from_millis(20)), 0.0);
    }

    #[test]
    fn test_run_is_idempotent() {
        let mut frame_loop = FrameLoop::new(0.033);
        let t0 = Instant::now();
        assert!(frame_loop.run());
        frame_loop.begin(t0);
        // A second run must not recreate the clock.
        assert!(!frame_loop.run());
        let dt = frame_loop.begin(t0 + Duration::from_millis(10)).unwrap();
        assert!((dt - 0.010).abs() < 1e-4);
    }

    #[test]
    fn test_stop_prevents_frames() {
        let mut frame_loop = FrameLoop::new(0.033);
        assert!(frame_loop.begin(Instant::now()).is_none());
        frame_loop.run();
        assert!(frame_loop.begin(Instant::now()).is_some());
        frame_loop.stop();
        assert!(!frame_loop.is_running());
        assert!(frame_loop.begin(Instant::now()).is_none());
    }

    #[test]
    fn test_restart_uses_fresh_clock() {
        let mut frame_loop = FrameLoop::new(0.033);
        let t0 = Instant::now();
        frame_loop.run();
        frame_loop.begin(t0);
        frame_loop.stop();
        frame_loop.run();
        assert_eq!(frame_loop.begin(t0 + Duration::from_millis(25)), Some(0.0));
    }
}
