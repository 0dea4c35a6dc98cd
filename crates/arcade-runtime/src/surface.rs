//! Drawing surface
//!
//! A retained immediate-mode command list sized in device pixels. Games draw
//! through the [`Canvas`] trait each frame; the host presents whatever the
//! list currently holds, so the last frame stays visible while the loop is
//! stopped.

use arcade_core::{Color, Rect};

/// Horizontal anchoring of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A recorded drawing command, in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    FillRect {
        rect: Rect,
        color: Color,
    },
    FillText {
        text: String,
        /// Anchor x (see `align`)
        x: f32,
        /// Vertical center of the text
        y: f32,
        size: f32,
        color: Color,
        align: TextAlign,
    },
}

/// 2D raster drawing operations.
pub trait Canvas {
    /// Discard everything drawn so far and fill with `color`.
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color, align: TextAlign);
}

/// Backing surface owned by the runtime.
#[derive(Debug, Default)]
pub struct Surface {
    width: u32,
    height: u32,
    commands: Vec<DrawCmd>,
    /// Incremented every time the backing store is reallocated
    generation: u64,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            generation: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// Reallocate to `width x height` device pixels, discarding contents.
    ///
    /// Returns `false` and leaves the surface untouched if the size is
    /// unchanged.
    pub fn set_size(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.commands.clear();
        self.generation += 1;
        true
    }

    /// Whether any text command contains `needle` (handy for inspection).
    pub fn has_text(&self, needle: &str) -> bool {
        self.commands.iter().any(|cmd| match cmd {
            DrawCmd::FillText { text, .. } => text.contains(needle),
            _ => false,
        })
    }
}

impl Canvas for Surface {
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCmd::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCmd::FillRect { rect, color });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color, align: TextAlign) {
        self.commands.push(DrawCmd::FillText {
            text: text.to_string(),
            x,
            y,
            size,
            color,
            align,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_discards_previous_frame() {
        let mut surface = Surface::new(100, 100);
        surface.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        surface.clear(Color::BLACK);
        assert_eq!(surface.commands(), &[DrawCmd::Clear(Color::BLACK)]);
    }

    #[test]
    fn unchanged_size_keeps_contents() {
        let mut surface = Surface::new(100, 50);
        surface.fill_text("hi", 1.0, 1.0, 10.0, Color::WHITE, TextAlign::Left);
        assert!(!surface.set_size(100, 50));
        assert_eq!(surface.commands().len(), 1);
        assert_eq!(surface.generation(), 0);
        assert!(surface.has_text("hi"));
    }

    #[test]
    fn new_size_reallocates() {
        let mut surface = Surface::new(100, 50);
        surface.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        assert!(surface.set_size(200, 100));
        assert!(surface.commands().is_empty());
        assert_eq!((surface.width(), surface.height()), (200, 100));
        assert_eq!(surface.generation(), 1);
    }
}
