//! Dash: hold to climb, release to fall, dodge the scrolling gaps.
//!
//! ```text
//! Idle --hold/tap--> Running --collision--> Dead
//! ```
//!
//! `Dead` is terminal for the module instance; the host plays again by
//! running a full `destroy`/`init` cycle. The run state, the obstacles and the
//! tuning values in [`DashConfig`] are all in logical units; only drawing
//! multiplies by the runtime's pixel ratio, so a resize mid-run keeps the
//! simulation intact.

mod config;
mod obstacle;

pub use config::DashConfig;
pub use obstacle::{gap_center, spawn_pair, GapSpec, Obstacle, ObstacleKind};

use arcade_core::{Color, Rect};
use arcade_runtime::{Canvas, FrameHandler, Runtime, TextAlign};

use crate::module::{GameMeta, GameModule};
use crate::rng::SpawnRng;

pub static DASH_META: GameMeta = GameMeta {
    id: "dash",
    title: "Dash",
    best_score_key: "best.dash",
};

const SCORE_TONE: (f32, u32) = (880.0, 80);
const CRASH_TONE: (f32, u32) = (180.0, 300);

const BACKGROUND: u32 = 0x0f1420;
const OBSTACLE: u32 = 0x3ddc97;
const PLAYER: u32 = 0xffd166;
const TEXT_DIM: u32 = 0x9aa5b1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Dead,
}

/// Mutable state of one run, in logical units.
#[derive(Debug, Clone)]
struct RunState {
    player_y: f32,
    velocity: f32,
    speed: f32,
    elapsed: f32,
    spawn_timer: f32,
    spawn_interval: f32,
    score: u32,
    best: u32,
    phase: Phase,
}

impl RunState {
    fn fresh(config: &DashConfig, field_height: f32, best: u32) -> Self {
        Self {
            player_y: ((field_height - config.player_size) / 2.0).max(0.0),
            velocity: 0.0,
            speed: config.base_speed,
            elapsed: 0.0,
            spawn_timer: config.first_spawn_delay,
            spawn_interval: config.spawn_interval,
            score: 0,
            best,
            phase: Phase::Idle,
        }
    }
}

pub struct DashGame {
    config: DashConfig,
    state: Option<RunState>,
    obstacles: Vec<Obstacle>,
    rng: SpawnRng,
}

impl DashGame {
    pub fn new(config: DashConfig) -> Self {
        let rng = seeded_rng(&config);
        Self {
            config,
            state: None,
            obstacles: Vec::new(),
            rng,
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        self.state.as_ref().map(|s| s.phase)
    }

    pub fn score(&self) -> u32 {
        self.state.as_ref().map_or(0, |s| s.score)
    }

    pub fn best(&self) -> u32 {
        self.state.as_ref().map_or(0, |s| s.best)
    }

    /// Player's top edge in logical units.
    pub fn player_y(&self) -> Option<f32> {
        self.state.as_ref().map(|s| s.player_y)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    fn player_rect(&self, field_width: f32, player_y: f32) -> Rect {
        let size = self.config.player_size;
        Rect::new(field_width * self.config.player_x, player_y, size, size)
    }

    fn step(&mut self, rt: &mut Runtime, dt: f32) {
        let (width, height) = logical_field(rt);
        let held = rt.input.pointer().down || rt.input.is_action_pressed("hold");
        let Some(state) = self.state.as_mut() else {
            return;
        };

        // Vertical motion
        let accel = if held { -self.config.lift } else { self.config.gravity };
        let max_speed = self.config.max_vertical_speed;
        state.velocity = (state.velocity + accel * dt).clamp(-max_speed, max_speed);
        state.player_y += state.velocity * dt;
        let floor = (height - self.config.player_size).max(0.0);
        if state.player_y < 0.0 {
            state.player_y = 0.0;
            state.velocity = 0.0;
        } else if state.player_y > floor {
            state.player_y = floor;
            state.velocity = 0.0;
        }

        // Spawning
        state.spawn_timer -= dt;
        if state.spawn_timer <= 0.0 {
            let spec = GapSpec {
                gap_size: self.config.gap_size,
                margin: self.config.safe_margin,
                width: self.config.obstacle_width,
            };
            let center = gap_center(&mut self.rng, height, &spec);
            self.obstacles.extend(spawn_pair(width, center, height, &spec));
            state.spawn_timer = state.spawn_interval;
            state.spawn_interval = state
                .spawn_interval
                .min(self.config.spawn_interval_for(state.score));
        }

        // Scrolling
        let shift = state.speed * dt;
        for obstacle in &mut self.obstacles {
            obstacle.x -= shift;
            obstacle.reach_floor(height);
        }
        self.obstacles.retain(|o| !o.is_offscreen());

        // Scoring and collision, in spawn order
        let player = Rect::new(
            width * self.config.player_x,
            state.player_y,
            self.config.player_size,
            self.config.player_size,
        );
        let mut crashed = false;
        for obstacle in &mut self.obstacles {
            if obstacle.try_score_pass(player.x) {
                state.score += 1;
                rt.audio.beep(SCORE_TONE.0, SCORE_TONE.1);
            }
            if player.intersects(&obstacle.bounds()) {
                crashed = true;
                break;
            }
        }

        // Difficulty
        state.elapsed += dt;
        let target = self.config.target_speed(state.elapsed);
        state.speed = self.config.smooth_speed(state.speed, target, dt);

        if crashed {
            self.game_over(rt);
        }
    }

    fn game_over(&mut self, rt: &mut Runtime) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.phase = Phase::Dead;
        state.best = state.best.max(state.score);
        rt.stop();
        rt.store.set_number(DASH_META.best_score_key, f64::from(state.best));
        rt.audio.beep(CRASH_TONE.0, CRASH_TONE.1);
        log::info!("dash: game over (score {}, best {})", state.score, state.best);
    }
}

impl FrameHandler for DashGame {
    fn update(&mut self, rt: &mut Runtime, dt: f32) {
        let Some(phase) = self.phase() else {
            return;
        };
        match phase {
            Phase::Idle => {
                let input = &rt.input;
                let started = input.pointer().down
                    || input.pointer().just_pressed
                    || input.is_action_pressed("hold");
                if started {
                    if let Some(state) = self.state.as_mut() {
                        state.phase = Phase::Running;
                    }
                    self.step(rt, dt);
                }
            }
            Phase::Running => self.step(rt, dt),
            Phase::Dead => {}
        }
    }

    fn render(&mut self, rt: &mut Runtime) {
        let Some(state) = self.state.clone() else {
            return;
        };
        let ratio = rt.pixel_ratio();
        let (width, height) = (rt.width(), rt.height());
        let player = self.player_rect(width / ratio, state.player_y);
        let surface = rt.surface_mut();

        surface.clear(Color::from_hex(BACKGROUND));
        for obstacle in &self.obstacles {
            surface.fill_rect(to_device(obstacle.bounds(), ratio), Color::from_hex(OBSTACLE));
        }
        surface.fill_rect(to_device(player, ratio), Color::from_hex(PLAYER));

        // HUD
        surface.fill_text(
            &state.score.to_string(),
            width / 2.0,
            40.0 * ratio,
            36.0 * ratio,
            Color::WHITE,
            TextAlign::Center,
        );
        surface.fill_text(
            &format!("Best {}", state.best),
            width - 16.0 * ratio,
            24.0 * ratio,
            18.0 * ratio,
            Color::from_hex(TEXT_DIM),
            TextAlign::Right,
        );

        match state.phase {
            Phase::Idle => {
                surface.fill_text(
                    "Hold to climb, release to fall",
                    width / 2.0,
                    height / 2.0 + 60.0 * ratio,
                    20.0 * ratio,
                    Color::WHITE,
                    TextAlign::Center,
                );
            }
            Phase::Running => {}
            Phase::Dead => {
                surface.fill_rect(
                    Rect::new(0.0, 0.0, width, height),
                    Color::BLACK.with_alpha(0.6),
                );
                surface.fill_text(
                    "Game Over",
                    width / 2.0,
                    height / 2.0 - 40.0 * ratio,
                    40.0 * ratio,
                    Color::WHITE,
                    TextAlign::Center,
                );
                surface.fill_text(
                    &format!("Score {}   Best {}", state.score, state.best),
                    width / 2.0,
                    height / 2.0 + 10.0 * ratio,
                    22.0 * ratio,
                    Color::WHITE,
                    TextAlign::Center,
                );
                surface.fill_text(
                    "Tap or press R to retry",
                    width / 2.0,
                    height / 2.0 + 50.0 * ratio,
                    18.0 * ratio,
                    Color::from_hex(TEXT_DIM),
                    TextAlign::Center,
                );
            }
        }
    }
}

impl GameModule for DashGame {
    fn meta(&self) -> &'static GameMeta {
        &DASH_META
    }

    fn init(&mut self, rt: &mut Runtime) {
        let stored = rt.store.get_number(DASH_META.best_score_key, 0.0);
        // Saturating cast: negatives and NaN become 0.
        let best = stored.max(0.0) as u32;
        let (_, height) = logical_field(rt);
        self.state = Some(RunState::fresh(&self.config, height, best));
        self.obstacles.clear();
        self.rng = seeded_rng(&self.config);
        log::debug!("dash: init (best {best})");
    }

    fn start(&mut self, rt: &mut Runtime) {
        if self.phase() != Some(Phase::Dead) {
            rt.reset_clock();
            rt.run();
        }
    }

    fn stop(&mut self, rt: &mut Runtime) {
        rt.stop();
    }

    fn destroy(&mut self, _rt: &mut Runtime) {
        self.state = None;
        self.obstacles.clear();
    }

    fn is_finished(&self) -> bool {
        self.phase() == Some(Phase::Dead)
    }
}

/// Field size in logical units.
fn logical_field(rt: &Runtime) -> (f32, f32) {
    let ratio = rt.pixel_ratio();
    (rt.width() / ratio, rt.height() / ratio)
}

fn to_device(rect: Rect, ratio: f32) -> Rect {
    Rect::new(rect.x * ratio, rect.y * ratio, rect.width * ratio, rect.height * ratio)
}

fn seeded_rng(config: &DashConfig) -> SpawnRng {
    config.seed.map_or_else(SpawnRng::from_time, SpawnRng::new)
}
