//! Obstacle pairs and pass scoring

use arcade_core::Rect;

use crate::rng::SpawnRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Upper half of a pair; carries the score for the pair
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
    /// Set once this obstacle's pass has been scored
    pub counted: bool,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Whether this obstacle is the half of its pair that scores.
    pub fn is_scoring(&self) -> bool {
        self.kind == ObstacleKind::Top
    }

    /// Scrolled fully past the trailing (left) edge.
    pub fn is_offscreen(&self) -> bool {
        self.x + self.width <= 0.0
    }

    /// Mark a pass of `player_x` as scored.
    ///
    /// Returns `true` exactly once: the first time the obstacle's trailing
    /// edge is left of `player_x`. Non-scoring halves never return `true`.
    pub fn try_score_pass(&mut self, player_x: f32) -> bool {
        if !self.is_scoring() || self.counted || self.x + self.width >= player_x {
            return false;
        }
        self.counted = true;
        true
    }

    /// Stretch a bottom half down to `field_height`.
    ///
    /// Keeps the pair closed after the field grows taller mid-run.
    pub fn reach_floor(&mut self, field_height: f32) {
        if self.kind == ObstacleKind::Bottom {
            self.height = (field_height - self.y).max(0.0);
        }
    }
}

/// Vertical gap geometry of a new pair, in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapSpec {
    pub gap_size: f32,
    pub margin: f32,
    pub width: f32,
}

/// Choose a gap center at least `margin` from either field edge.
///
/// A field too short to honor the margin gets a centered gap.
pub fn gap_center(rng: &mut SpawnRng, field_height: f32, spec: &GapSpec) -> f32 {
    let half = spec.gap_size / 2.0;
    let low = spec.margin + half;
    let high = field_height - spec.margin - half;
    if high > low {
        rng.range(low, high)
    } else {
        field_height / 2.0
    }
}

/// Build the top/bottom pair at horizontal position `x` around `center`.
pub fn spawn_pair(x: f32, center: f32, field_height: f32, spec: &GapSpec) -> [Obstacle; 2] {
    let half = spec.gap_size / 2.0;
    let gap_top = (center - half).max(0.0);
    let gap_bottom = (center + half).min(field_height);
    [
        Obstacle {
            x,
            y: 0.0,
            width: spec.width,
            height: gap_top,
            kind: ObstacleKind::Top,
            counted: false,
        },
        Obstacle {
            x,
            y: gap_bottom,
            width: spec.width,
            height: (field_height - gap_bottom).max(0.0),
            kind: ObstacleKind::Bottom,
            counted: false,
        },
    ]
}
