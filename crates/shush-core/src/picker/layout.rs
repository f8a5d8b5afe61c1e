//! Size-derived dial geometry, recomputed only when the surface size changes.

use serde::{Deserialize, Serialize};

use super::surface::{Rect, Size};
use crate::geometry::Point;

/// Padding between the surface edge and the outer ring.
const INSETS: i32 = 6;

/// Height never exceeds this fraction of the width.
const MAX_ASPECT: f64 = 0.7;

/// Touches up to this far out (as a fraction of the diameter) still move the slider.
const SLIDER_REACH: f64 = 1.3;

/// Touches inside this fraction of the diameter hit the +/- buttons.
const BUTTON_REACH: f64 = 0.8;

/// Font sizes, as fractions of the diameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSizes {
    pub duration: f32,
    pub units: f32,
    pub ends_at: f32,
    pub percent: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DialLayout {
    pub size: Size,
    pub center: Point,
    pub diameter: i32,
    pub thickness: i32,
    /// Bounds of the outer edge of the ring.
    pub outer: Rect,
    /// Bounds of the inner edge of the ring.
    pub inner: Rect,
    /// Bounds of the pressed-button half discs.
    pub buttons: Rect,
    pub fonts: FontSizes,
}

impl DialLayout {
    pub fn measure(size: Size) -> Self {
        let width = size.width as i32;
        let height = size.height as i32;
        let center = Point::new(width / 2, height / 2);

        let diameter = (width.min(height) - 2 * INSETS).max(0);
        let thickness = diameter / 15;

        let left = (width - diameter) / 2;
        let top = (height - diameter) / 2;
        let outer = Rect::new(
            left as f32,
            top as f32,
            (left + diameter) as f32,
            (top + diameter) as f32,
        );
        let inner = outer.inset(thickness as f32);
        let buttons = outer.inset((thickness * 2) as f32);

        let d = diameter as f32;
        Self {
            size,
            center,
            diameter,
            thickness,
            outer,
            inner,
            buttons,
            fonts: FontSizes {
                duration: d * 0.32,
                units: d * 0.10,
                ends_at: d * 0.13,
                percent: d * 0.08,
            },
        }
    }

    pub fn slider_radius_squared(&self) -> f64 {
        let r = f64::from(self.diameter) * SLIDER_REACH / 2.0;
        r * r
    }

    pub fn button_radius_squared(&self) -> f64 {
        let r = f64::from(self.diameter) * BUTTON_REACH / 2.0;
        r * r
    }

    /// Which part of the dial a point falls on.
    pub fn classify(&self, point: Point) -> HitRegion {
        let distance_squared = point.distance_squared(self.center) as f64;
        if distance_squared < self.button_radius_squared() {
            if point.x > self.center.x {
                HitRegion::Increment
            } else {
                HitRegion::Decrement
            }
        } else if distance_squared < self.slider_radius_squared() {
            HitRegion::Slider
        } else {
            HitRegion::Outside
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    Increment,
    Decrement,
    Slider,
    Outside,
}

/// Size the dial asks for: all the width, and no taller than 0.7x the width.
pub fn preferred_size(available_width: u32, available_height: u32) -> Size {
    let max_height = (f64::from(available_width) * MAX_ASPECT) as u32;
    Size::new(available_width, available_height.min(max_height))
}
