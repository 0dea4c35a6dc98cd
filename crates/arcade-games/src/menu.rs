//! Game selection menu

use arcade_core::{Color, Rect, Vec2};
use arcade_runtime::{Canvas, FrameHandler, KeyCode, PersistentStore, Runtime, TextAlign};

use crate::module::GameMeta;
use crate::registry::GameRegistry;

const DIGITS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

// Layout, in logical units
const TITLE_Y: f32 = 70.0;
const FIRST_ROW_Y: f32 = 130.0;
const ROW_HEIGHT: f32 = 64.0;
const ROW_GAP: f32 = 12.0;
const SIDE_MARGIN: f32 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub meta: &'static GameMeta,
    pub best: u32,
}

/// Lists registered games with their stored best scores.
#[derive(Debug, Default)]
pub struct GameMenu {
    entries: Vec<MenuEntry>,
    muted: bool,
}

impl GameMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-read the game list and best scores.
    pub fn refresh(&mut self, registry: &GameRegistry, store: &PersistentStore) {
        self.entries = registry
            .metas()
            .map(|meta| MenuEntry {
                meta,
                best: store.get_number(meta.best_score_key, 0.0).max(0.0) as u32,
            })
            .collect();
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Row bounds in device pixels.
    fn row_rect(&self, index: usize, rt: &Runtime) -> Rect {
        let ratio = rt.pixel_ratio();
        let y = FIRST_ROW_Y + index as f32 * (ROW_HEIGHT + ROW_GAP);
        Rect::new(
            SIDE_MARGIN * ratio,
            y * ratio,
            (rt.width() - 2.0 * SIDE_MARGIN * ratio).max(0.0),
            ROW_HEIGHT * ratio,
        )
    }

    /// Game under a point given in logical (pointer) coordinates.
    pub fn entry_at(&self, rt: &Runtime, x: f32, y: f32) -> Option<&'static str> {
        let ratio = rt.pixel_ratio();
        let point = Vec2::new(x * ratio, y * ratio);
        self.entries
            .iter()
            .enumerate()
            .find(|(i, _)| self.row_rect(*i, rt).contains(point))
            .map(|(_, entry)| entry.meta.id)
    }

    /// Game chosen this frame by a tap on its row or its number key.
    pub fn selection(&self, rt: &Runtime) -> Option<&'static str> {
        let pointer = rt.input.pointer();
        if pointer.just_pressed {
            if let Some(id) = self.entry_at(rt, pointer.x, pointer.y) {
                return Some(id);
            }
        }
        DIGITS
            .iter()
            .zip(&self.entries)
            .find(|(key, _)| rt.input.is_key_just_pressed(**key))
            .map(|(_, entry)| entry.meta.id)
    }
}

impl FrameHandler for GameMenu {
    fn update(&mut self, _rt: &mut Runtime, _dt: f32) {}

    fn render(&mut self, rt: &mut Runtime) {
        let ratio = rt.pixel_ratio();
        let width = rt.width();
        let rows: Vec<Rect> = (0..self.entries.len()).map(|i| self.row_rect(i, rt)).collect();
        let surface = rt.surface_mut();

        surface.clear(Color::from_hex(0x0f1420));
        surface.fill_text(
            "Arcade",
            width / 2.0,
            TITLE_Y * ratio,
            40.0 * ratio,
            Color::WHITE,
            TextAlign::Center,
        );

        for (i, (entry, row)) in self.entries.iter().zip(rows).enumerate() {
            let text_y = row.y + row.height / 2.0;
            surface.fill_rect(row, Color::from_hex(0x1d2536));
            surface.fill_text(
                &format!("{}  {}", i + 1, entry.meta.title),
                row.x + 16.0 * ratio,
                text_y,
                24.0 * ratio,
                Color::WHITE,
                TextAlign::Left,
            );
            surface.fill_text(
                &format!("Best {}", entry.best),
                row.right() - 16.0 * ratio,
                text_y,
                18.0 * ratio,
                Color::from_hex(0x9aa5b1),
                TextAlign::Right,
            );
        }

        let footer = if self.muted {
            "Sound off (M)"
        } else {
            "Sound on (M)"
        };
        surface.fill_text(
            footer,
            width / 2.0,
            (rows_bottom(self.entries.len()) + 24.0) * ratio,
            16.0 * ratio,
            Color::from_hex(0x9aa5b1),
            TextAlign::Center,
        );
    }
}

/// Logical y just below the last row.
fn rows_bottom(count: usize) -> f32 {
    FIRST_ROW_Y + count as f32 * (ROW_HEIGHT + ROW_GAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::testing::RecordingModule;
    use arcade_runtime::DisplaySize;
    use std::time::Instant;

    static ALPHA: GameMeta = GameMeta {
        id: "alpha",
        title: "Alpha",
        best_score_key: "best.alpha",
    };
    static BETA: GameMeta = GameMeta {
        id: "beta",
        title: "Beta",
        best_score_key: "best.beta",
    };

    fn registry() -> GameRegistry {
        let mut registry = GameRegistry::new();
        for meta in [&ALPHA, &BETA] {
            registry.register(meta, move || {
                Box::new(RecordingModule::new(meta, Default::default()))
            });
        }
        registry
    }

    fn menu(rt: &Runtime) -> GameMenu {
        let mut menu = GameMenu::new();
        menu.refresh(&registry(), &rt.store);
        menu
    }

    #[test]
    fn entries_carry_stored_best() {
        let mut rt = Runtime::headless(400.0, 600.0);
        rt.store.set_number("best.beta", 7.0);
        let menu = menu(&rt);
        let best: Vec<_> = menu.entries().iter().map(|e| (e.meta.id, e.best)).collect();
        assert_eq!(best, vec![("alpha", 0), ("beta", 7)]);
    }

    #[test]
    fn hit_test_uses_logical_coordinates() {
        let mut rt = Runtime::headless(400.0, 600.0);
        rt.resize(DisplaySize::new(400.0, 600.0, 2.0));
        let menu = menu(&rt);

        assert_eq!(menu.entry_at(&rt, 200.0, FIRST_ROW_Y + 1.0), Some("alpha"));
        let second = FIRST_ROW_Y + ROW_HEIGHT + ROW_GAP + 1.0;
        assert_eq!(menu.entry_at(&rt, 200.0, second), Some("beta"));
        // Gap between rows and the side margin select nothing.
        assert_eq!(menu.entry_at(&rt, 200.0, FIRST_ROW_Y + ROW_HEIGHT + 1.0), None);
        assert_eq!(menu.entry_at(&rt, 4.0, FIRST_ROW_Y + 1.0), None);
    }

    #[test]
    fn selects_by_tap_or_number_key() {
        let mut rt = Runtime::headless(400.0, 600.0);
        let menu = menu(&rt);
        assert_eq!(menu.selection(&rt), None);

        rt.input.key_down(KeyCode::Digit2);
        assert_eq!(menu.selection(&rt), Some("beta"));
        rt.input.new_frame();
        assert_eq!(menu.selection(&rt), None);

        // Digit3 has no entry.
        rt.input.key_down(KeyCode::Digit3);
        assert_eq!(menu.selection(&rt), None);
        rt.input.new_frame();

        rt.input.pointer_down(200.0, FIRST_ROW_Y + 10.0, Instant::now());
        assert_eq!(menu.selection(&rt), Some("alpha"));
    }

    #[test]
    fn renders_titles_and_scores() {
        let mut rt = Runtime::headless(400.0, 600.0);
        rt.store.set_number("best.alpha", 3.0);
        let mut menu = menu(&rt);
        menu.set_muted(true);
        menu.render(&mut rt);
        assert!(rt.surface().has_text("Arcade"));
        assert!(rt.surface().has_text("1  Alpha"));
        assert!(rt.surface().has_text("2  Beta"));
        assert!(rt.surface().has_text("Best 3"));
        assert!(rt.surface().has_text("Sound off"));
    }
}
