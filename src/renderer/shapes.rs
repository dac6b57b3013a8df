//! Tessellation of frame commands into triangles

use glam::Vec2;
use std::f32::consts::PI;

use super::frame::{Color, DrawCmd, Frame};
use super::vertex::Vertex;
use super::colors;

/// Segments used for a full circle
const CIRCLE_SEGMENTS: u32 = 24;

/// Triangle list plus the color to clear to, in playfield coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub clear: Color,
    pub vertices: Vec<Vertex>,
}

/// Convert every drawable command in order. Text is left to the host.
pub fn tessellate(frame: &Frame) -> Mesh {
    let mut mesh = Mesh {
        clear: colors::BACKGROUND,
        vertices: Vec::with_capacity(frame.len() * 6),
    };

    for cmd in frame.commands() {
        match cmd {
            DrawCmd::Clear(color) => {
                // A clear wipes everything drawn before it
                mesh.clear = *color;
                mesh.vertices.clear();
            }
            DrawCmd::Rect { pos, size, color } => {
                mesh.vertices.extend(rect(*pos, *size, *color));
            }
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => {
                mesh.vertices
                    .extend(circle(*center, *radius, *color, CIRCLE_SEGMENTS));
            }
            DrawCmd::Line {
                from,
                to,
                width,
                color,
            } => {
                mesh.vertices.extend(line(*from, *to, *width, *color));
            }
            DrawCmd::Text { .. } => {}
        }
    }

    mesh
}

/// Generate vertices for an axis-aligned rectangle
pub fn rect(pos: Vec2, size: Vec2, color: Color) -> [Vertex; 6] {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    [
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a thick line segment
pub fn line(from: Vec2, to: Vec2, width: f32, color: Color) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let verts = rect(Vec2::new(10.0, 20.0), Vec2::new(5.0, 4.0), colors::TEXT);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 15.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 24.0);
    }

    #[test]
    fn test_tessellate_skips_text_and_honors_clear() {
        let mut frame = Frame::new(Vec2::new(100.0, 100.0));
        frame.rect(Vec2::ZERO, Vec2::ONE, colors::TEXT);
        frame.clear(colors::OVERLAY);
        frame.rect(Vec2::ZERO, Vec2::ONE, colors::TEXT);
        frame.text(Vec2::ZERO, 10.0, "score", colors::TEXT);
        frame.circle(Vec2::splat(50.0), 5.0, colors::BALL);

        let mesh = tessellate(&frame);
        assert_eq!(mesh.clear, colors::OVERLAY);
        assert_eq!(mesh.vertices.len(), 6 + CIRCLE_SEGMENTS as usize * 3);
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, colors::GRID).is_empty());
    }
}
