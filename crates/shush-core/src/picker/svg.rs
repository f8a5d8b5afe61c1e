//! SVG rendering backend for the dial.

use std::fmt::Write as _;

use super::surface::{Color, Rect, Size, Surface, TextAlign, TextStyle};

/// Collects draw calls into a standalone SVG document.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    size: Size,
    body: String,
}

impl SvgSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            body: String::new(),
        }
    }

    /// Wraps everything drawn so far in an `<svg>` element.
    pub fn finish(self) -> String {
        let Size { width, height } = self.size;
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
             viewBox=\"0 0 {width} {height}\">\n{}</svg>\n",
            self.body
        )
    }

    fn push_path(&mut self, d: &str, color: Color) {
        let _ = writeln!(
            self.body,
            "  <path d=\"{d}\" fill=\"{}\" fill-opacity=\"{:.3}\"/>",
            color.hex_rgb(),
            color.opacity()
        );
    }
}

fn point_on(bounds: &Rect, degrees: f32) -> (f32, f32) {
    let radians = degrees.to_radians();
    let r = bounds.width() / 2.0;
    (
        bounds.center_x() + r * radians.cos(),
        bounds.center_y() + r * radians.sin(),
    )
}

fn large_arc(sweep: i32) -> u8 {
    u8::from(sweep > 180)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl Surface for SvgSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn fill_ring_segment(&mut self, outer: Rect, inner: Rect, start: i32, sweep: i32, color: Color) {
        if sweep <= 0 {
            return;
        }
        // An arc whose end point equals its start point renders as nothing.
        if sweep >= 360 {
            self.fill_ring_segment(outer, inner, start, 180, color);
            self.fill_ring_segment(outer, inner, start + 180, sweep - 180, color);
            return;
        }
        let end = (start + sweep) as f32;
        let (ox0, oy0) = point_on(&outer, start as f32);
        let (ox1, oy1) = point_on(&outer, end);
        let (ix1, iy1) = point_on(&inner, end);
        let (ix0, iy0) = point_on(&inner, start as f32);
        let ro = outer.width() / 2.0;
        let ri = inner.width() / 2.0;
        let large = large_arc(sweep);
        let d = format!(
            "M {ox0:.2} {oy0:.2} A {ro:.2} {ro:.2} 0 {large} 1 {ox1:.2} {oy1:.2} \
             L {ix1:.2} {iy1:.2} A {ri:.2} {ri:.2} 0 {large} 0 {ix0:.2} {iy0:.2} Z"
        );
        self.push_path(&d, color);
    }

    fn fill_wedge(&mut self, bounds: Rect, start: i32, sweep: i32, color: Color) {
        if sweep <= 0 {
            return;
        }
        if sweep >= 360 {
            self.fill_wedge(bounds, start, 180, color);
            self.fill_wedge(bounds, start + 180, sweep - 180, color);
            return;
        }
        let (cx, cy) = (bounds.center_x(), bounds.center_y());
        let (x0, y0) = point_on(&bounds, start as f32);
        let (x1, y1) = point_on(&bounds, (start + sweep) as f32);
        let r = bounds.width() / 2.0;
        let large = large_arc(sweep);
        let d = format!(
            "M {cx:.2} {cy:.2} L {x0:.2} {y0:.2} A {r:.2} {r:.2} 0 {large} 1 {x1:.2} {y1:.2} Z"
        );
        self.push_path(&d, color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let _ = writeln!(
            self.body,
            "  <rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" fill-opacity=\"{:.3}\"/>",
            rect.left,
            rect.top,
            rect.width(),
            rect.height(),
            color.hex_rgb(),
            color.opacity()
        );
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let anchor = match style.align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
        };
        let weight = if style.bold { "bold" } else { "normal" };
        let _ = writeln!(
            self.body,
            "  <text x=\"{x:.2}\" y=\"{y:.2}\" font-family=\"sans-serif\" font-size=\"{:.2}\" \
             font-weight=\"{weight}\" text-anchor=\"{anchor}\" fill=\"{}\">{}</text>",
            style.size,
            style.color.hex_rgb(),
            escape(text)
        );
    }
}
