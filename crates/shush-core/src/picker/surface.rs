//! Drawing primitives the dial renders through.
//!
//! The picker never talks to a real canvas; it issues a handful of filled
//! shapes and text runs against a [`Surface`]. [`DisplayList`] records them,
//! [`SvgSurface`](super::svg::SvgSurface) turns them into an SVG document.

use serde::{Deserialize, Serialize};

/// 32-bit ARGB color, the same packing the persisted `color` setting uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const LIGHT_GREY: Color = Color::rgb(115, 115, 115);
    pub const MAGENTA: Color = Color::rgb(255, 0, 165);
    /// Default accent for the filled arc.
    pub const ACCENT_BLUE: Color = Color(0xFF00_DDFF);

    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::argb(255, r, g, b)
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    /// `#rrggbb` without the alpha channel.
    pub fn hex_rgb(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red(), self.green(), self.blue())
    }

    /// Alpha as a fraction in `[0, 1]`.
    pub fn opacity(self) -> f32 {
        f32::from(self.alpha()) / 255.0
    }
}

/// Pixel size of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Same center, every edge moved inwards by `by`.
    pub fn inset(&self, by: f32) -> Rect {
        Rect::new(self.left + by, self.top + by, self.right - by, self.bottom - by)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub align: TextAlign,
    pub color: Color,
}

/// Something the dial can be drawn on.
///
/// Angles are in degrees, 0 at 3 o'clock, positive sweeps run clockwise.
pub trait Surface {
    fn size(&self) -> Size;

    /// Fills the band between two concentric circles inscribed in `outer`
    /// and `inner`, over `sweep` degrees starting at `start`.
    fn fill_ring_segment(&mut self, outer: Rect, inner: Rect, start: i32, sweep: i32, color: Color);

    /// Fills a pie wedge of the circle inscribed in `bounds`.
    fn fill_wedge(&mut self, bounds: Rect, start: i32, sweep: i32, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draws `text` with its baseline at `y`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    RingSegment {
        outer: Rect,
        inner: Rect,
        start: i32,
        sweep: i32,
        color: Color,
    },
    Wedge {
        bounds: Rect,
        start: i32,
        sweep: i32,
        color: Color,
    },
    Rect {
        rect: Rect,
        color: Color,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
}

/// A surface that only records what was drawn on it.
#[derive(Debug, Clone)]
pub struct DisplayList {
    size: Size,
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn ring_segments(&self) -> impl Iterator<Item = (i32, i32, Color)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::RingSegment {
                start,
                sweep,
                color,
                ..
            } => Some((*start, *sweep, *color)),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn size(&self) -> Size {
        self.size
    }

    fn fill_ring_segment(&mut self, outer: Rect, inner: Rect, start: i32, sweep: i32, color: Color) {
        self.ops.push(DrawOp::RingSegment {
            outer,
            inner,
            start,
            sweep,
            color,
        });
    }

    fn fill_wedge(&mut self, bounds: Rect, start: i32, sweep: i32, color: Color) {
        self.ops.push(DrawOp::Wedge {
            bounds,
            start,
            sweep,
            color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::Rect { rect, color });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_channels() {
        let c = Color::argb(102, 115, 116, 117);
        assert_eq!(c.alpha(), 102);
        assert_eq!(c.red(), 115);
        assert_eq!(c.green(), 116);
        assert_eq!(c.blue(), 117);
        assert_eq!(c.hex_rgb(), "#737475");
        assert_eq!(Color::ACCENT_BLUE.hex_rgb(), "#00ddff");
        assert_eq!(Color::WHITE.opacity(), 1.0);
    }

    #[test]
    fn rect_inset_keeps_center() {
        let r = Rect::new(0.0, 0.0, 100.0, 60.0).inset(10.0);
        assert_eq!(r.width(), 80.0);
        assert_eq!(r.height(), 40.0);
        assert_eq!(r.center_x(), 50.0);
        assert_eq!(r.center_y(), 30.0);
    }
}
