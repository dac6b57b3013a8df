//! Immediate-mode frame description
//!
//! Games append draw commands in playfield coordinates (top-left origin,
//! y down). A frame is plain data: it can be compared in tests, tessellated
//! for the GPU, or have its text forwarded to the DOM.

use glam::Vec2;

/// Display (sRGB-encoded) RGBA, written to the surface as is
pub type Color = [f32; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Fill the whole playfield
    Clear(Color),
    /// Filled rectangle from its top-left corner
    Rect { pos: Vec2, size: Vec2, color: Color },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Text {
        pos: Vec2,
        size: f32,
        align: TextAlign,
        text: String,
        color: Color,
    },
}

/// One rendered scene
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Playfield size the commands are expressed in
    pub size: Vec2,
    commands: Vec<DrawCmd>,
}

impl Frame {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self, color: Color) {
        self.commands.push(DrawCmd::Clear(color));
    }

    pub fn rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCmd::Rect { pos, size, color });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCmd::Line {
            from,
            to,
            width,
            color,
        });
    }

    /// Centered text
    pub fn text(&mut self, pos: Vec2, size: f32, text: impl Into<String>, color: Color) {
        self.text_aligned(pos, size, TextAlign::Center, text, color);
    }

    pub fn text_aligned(
        &mut self,
        pos: Vec2,
        size: f32,
        align: TextAlign,
        text: impl Into<String>,
        color: Color,
    ) {
        self.commands.push(DrawCmd::Text {
            pos,
            size,
            align,
            text: text.into(),
            color,
        });
    }

    /// Faint grid lines every `cell` pixels
    pub fn grid(&mut self, cols: i32, rows: i32, cell: f32, color: Color) {
        let width = cols as f32 * cell;
        let height = rows as f32 * cell;
        for x in 0..=cols {
            let x = x as f32 * cell;
            self.line(Vec2::new(x, 0.0), Vec2::new(x, height), 1.0, color);
        }
        for y in 0..=rows {
            let y = y as f32 * cell;
            self.line(Vec2::new(0.0, y), Vec2::new(width, y), 1.0, color);
        }
    }

    /// Text commands only, for hosts that draw text outside the GPU pass
    pub fn texts(&self) -> impl Iterator<Item = &DrawCmd> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Text { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::colors;

    #[test]
    fn test_grid_line_count() {
        let mut frame = Frame::new(Vec2::new(40.0, 20.0));
        frame.grid(4, 2, 10.0, colors::GRID);
        // 5 vertical + 3 horizontal
        assert_eq!(frame.len(), 8);
    }

    #[test]
    fn test_texts_filter() {
        let mut frame = Frame::new(Vec2::new(10.0, 10.0));
        frame.clear(colors::BACKGROUND);
        frame.text(Vec2::ZERO, 12.0, "hi", colors::TEXT);
        frame.circle(Vec2::ONE, 1.0, colors::BALL);
        assert_eq!(frame.texts().count(), 1);
    }
}
