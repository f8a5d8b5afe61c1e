//! The circular duration picker.
//!
//! A slider around a circle selecting a time between now and 12 hours from now.
//! The selection starts at the hour-hand position of `start` and runs clockwise;
//! the middle of the dial holds the duration label, the end time and a pair of
//! +/- buttons stepping by a quarter hour.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

use super::label::{format_clock_time, DurationLabel};
use super::layout::{DialLayout, HitRegion};
use super::surface::{Color, Rect, Surface, TextAlign, TextStyle};
use crate::geometry::{
    angle_to_duration, duration_to_arc, point_to_angle, wall_clock_to_angle, ClockAngle, Point,
    MINUTES_PER_HALF_DAY, QUANTUM_MINUTES,
};

/// Receives "please repaint" requests from the picker.
///
/// Repaints are assumed to be expensive, so the picker only asks when
/// something visible actually changed.
pub trait RedrawRequester {
    fn request_redraw(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    #[default]
    Idle,
    DraggingArc,
    PressingIncrement,
    PressingDecrement,
}

impl InteractionMode {
    fn is_pressing(self) -> bool {
        matches!(
            self,
            InteractionMode::PressingIncrement | InteractionMode::PressingDecrement
        )
    }
}

/// Everything the picker knows about the current selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickerState {
    pub start: DateTime<Local>,
    pub start_angle: ClockAngle,
    pub minutes: u32,
    pub end: DateTime<Local>,
    pub mode: InteractionMode,
}

/// The part of [`PickerState`] that survives a display reconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPickerState {
    pub start: DateTime<Local>,
    pub minutes: u32,
}

/// Colors used by the dial. Only the slider color is user-configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    slider: Color,
    marker: Color,
    empty: Color,
    pressed_background: Color,
    text: Color,
    dim_text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            slider: Color::MAGENTA,
            marker: Color::WHITE,
            empty: Color::LIGHT_GREY,
            pressed_background: Color::argb(102, 115, 115, 115),
            text: Color::WHITE,
            dim_text: Color::LIGHT_GREY,
        }
    }
}

pub struct ClockPicker {
    state: PickerState,
    palette: Palette,
    use_24h_clock: bool,
    /// Cached until the surface size changes.
    layout: Option<DialLayout>,
    redraw: Arc<dyn RedrawRequester>,
}

impl std::fmt::Debug for ClockPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockPicker")
            .field("state", &self.state)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl ClockPicker {
    /// Creates a picker starting at `start` with nothing selected.
    pub fn new(start: DateTime<Local>, redraw: Arc<dyn RedrawRequester>) -> Self {
        Self {
            state: PickerState {
                start,
                start_angle: wall_clock_to_angle(&start),
                minutes: 0,
                end: start,
                mode: InteractionMode::Idle,
            },
            palette: Palette::default(),
            use_24h_clock: true,
            layout: None,
            redraw,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &PickerState {
        &self.state
    }

    pub fn start(&self) -> DateTime<Local> {
        self.state.start
    }

    pub fn start_angle(&self) -> ClockAngle {
        self.state.start_angle
    }

    pub fn duration(&self) -> u32 {
        self.state.minutes
    }

    pub fn end(&self) -> DateTime<Local> {
        self.state.end
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        self.state.mode
    }

    pub fn color(&self) -> Color {
        self.palette.slider
    }

    pub fn layout(&self) -> Option<&DialLayout> {
        self.layout.as_ref()
    }

    pub fn saved_state(&self) -> SavedPickerState {
        SavedPickerState {
            start: self.state.start,
            minutes: self.state.minutes,
        }
    }

    // ── Mutators ─────────────────────────────────────────────────────

    pub fn set_start(&mut self, start: DateTime<Local>) {
        self.state.start = start;
        self.state.start_angle = wall_clock_to_angle(&start);
        self.recompute_end();
        self.redraw.request_redraw();
    }

    /// Selects `minutes`, clamped to 12 hours. Setting the current value again
    /// does not repaint.
    pub fn set_duration(&mut self, minutes: u32) {
        let minutes = minutes.min(MINUTES_PER_HALF_DAY);
        if minutes == self.state.minutes {
            return;
        }
        self.state.minutes = minutes;
        self.recompute_end();
        self.redraw.request_redraw();
    }

    pub fn set_color(&mut self, color: Color) {
        self.palette.slider = color;
    }

    pub fn set_use_24h_clock(&mut self, use_24h_clock: bool) {
        self.use_24h_clock = use_24h_clock;
    }

    /// Reapplies a saved selection. Interaction always resumes from idle.
    pub fn restore(&mut self, saved: SavedPickerState) {
        self.state.mode = InteractionMode::Idle;
        self.set_start(saved.start);
        self.set_duration(saved.minutes);
    }

    fn recompute_end(&mut self) {
        self.state.end = self.state.start + Duration::minutes(i64::from(self.state.minutes));
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Accepts touches near the ring (moving the selection) and on the
    /// center buttons (stepping it). Returns `false` for touches this control
    /// does not claim.
    pub fn handle_pointer_event(&mut self, phase: PointerPhase, x: f32, y: f32) -> bool {
        let Some(layout) = self.layout else {
            // Nothing has been drawn yet, so there is nothing to hit.
            return true;
        };
        let point = Point::new(x as i32, y as i32);
        let was_pressing = self.state.mode.is_pressing();

        match layout.classify(point) {
            region @ (HitRegion::Increment | HitRegion::Decrement) => {
                let increment = region == HitRegion::Increment;
                if phase == PointerPhase::Up {
                    self.state.mode = InteractionMode::Idle;
                    self.set_duration(step_minutes(self.state.minutes, increment));
                    if was_pressing {
                        self.redraw.request_redraw();
                    }
                } else {
                    self.state.mode = if increment {
                        InteractionMode::PressingIncrement
                    } else {
                        InteractionMode::PressingDecrement
                    };
                    self.redraw.request_redraw();
                }
                true
            }
            HitRegion::Slider => {
                // Points this close to the center classify as buttons, so the
                // angle is always defined here.
                let angle = match point_to_angle(point, layout.center) {
                    Ok(angle) => angle,
                    Err(err) => {
                        tracing::error!(%err, "slider touch resolved to the dial center");
                        return false;
                    }
                };
                self.state.mode = if phase == PointerPhase::Up {
                    InteractionMode::Idle
                } else {
                    InteractionMode::DraggingArc
                };
                self.set_duration(angle_to_duration(self.state.start_angle, angle));
                if was_pressing {
                    self.redraw.request_redraw();
                }
                true
            }
            HitRegion::Outside => {
                self.state.mode = InteractionMode::Idle;
                if was_pressing {
                    self.redraw.request_redraw();
                }
                false
            }
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Draws the dial. Layout is re-measured only when the surface size changed.
    pub fn render(&mut self, surface: &mut dyn Surface) {
        let size = surface.size();
        let layout = match self.layout {
            Some(layout) if layout.size == size => layout,
            _ => {
                let layout = DialLayout::measure(size);
                self.layout = Some(layout);
                layout
            }
        };
        self.draw_clock(surface, &layout);
        self.draw_text_and_buttons(surface, &layout);
    }

    /// Filled arc, then the white marker, then the grey remainder.
    fn draw_clock(&self, surface: &mut dyn Surface, layout: &DialLayout) {
        let arc = duration_to_arc(self.state.start_angle, self.state.minutes);
        let segments = [
            (arc.fill_start, arc.fill_sweep, self.palette.slider),
            (arc.marker_start, arc.marker_sweep, self.palette.marker),
            (arc.empty_start, arc.empty_sweep, self.palette.empty),
        ];
        for (start, sweep, color) in segments {
            if sweep > 0 {
                surface.fill_ring_segment(layout.outer, layout.inner, start, sweep, color);
            }
        }
    }

    fn draw_text_and_buttons(&self, surface: &mut dyn Surface, layout: &DialLayout) {
        let mode = self.state.mode;
        let increment_pressed = mode == InteractionMode::PressingIncrement;
        let decrement_pressed = mode == InteractionMode::PressingDecrement;

        if increment_pressed {
            surface.fill_wedge(layout.buttons, 270, 180, self.palette.pressed_background);
        }
        if decrement_pressed {
            surface.fill_wedge(layout.buttons, 90, 180, self.palette.pressed_background);
        }

        let cx = layout.center.x as f32;
        let cy = layout.center.y as f32;
        let d = layout.diameter as f32;

        let label = DurationLabel::for_minutes(self.state.minutes);
        let big = TextStyle {
            size: layout.fonts.duration,
            bold: true,
            align: TextAlign::Center,
            color: self.palette.text,
        };
        surface.draw_text(&label.value, cx, cy - d * 0.08, big);
        surface.draw_text(
            label.unit.as_str(),
            cx,
            cy + d * 0.06,
            TextStyle {
                size: layout.fonts.units,
                bold: false,
                ..big
            },
        );
        surface.draw_text(
            &format_clock_time(&self.state.end, self.use_24h_clock),
            cx,
            cy + d * 0.25,
            TextStyle {
                size: layout.fonts.ends_at,
                color: self.palette.dim_text,
                ..big
            },
        );
        surface.draw_text(
            &format!("{}%", self.state.minutes * 100 / MINUTES_PER_HALF_DAY),
            cx - d * 0.06,
            cy + d * 0.37,
            TextStyle {
                size: layout.fonts.percent,
                bold: true,
                align: TextAlign::Left,
                color: self.palette.dim_text,
            },
        );

        let rect = |l: f32, t: f32, r: f32, b: f32| Rect::new(cx + d * l, cy + d * t, cx + d * r, cy + d * b);
        let pressed_or = |pressed: bool| {
            if pressed {
                self.palette.marker
            } else {
                self.palette.empty
            }
        };

        let minus = pressed_or(decrement_pressed);
        surface.fill_rect(rect(-0.32, -0.01, -0.22, 0.01), minus);

        let plus = pressed_or(increment_pressed);
        surface.fill_rect(rect(0.22, -0.01, 0.32, 0.01), plus);
        surface.fill_rect(rect(0.26, -0.05, 0.28, 0.05), plus);
    }
}

/// One quarter-hour step up or down, wrapping around the dial. At the
/// boundary 720 wins over 0, so stepping never lands on an empty selection
/// that would look like "off".
fn step_minutes(current: u32, increment: bool) -> u32 {
    let stepped = if increment {
        current + QUANTUM_MINUTES
    } else {
        current + MINUTES_PER_HALF_DAY - QUANTUM_MINUTES
    };
    if stepped > MINUTES_PER_HALF_DAY {
        stepped - MINUTES_PER_HALF_DAY
    } else {
        stepped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::surface::{DisplayList, DrawOp, Size};
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingRedraw(AtomicUsize);

    impl CountingRedraw {
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl RedrawRequester for CountingRedraw {
        fn request_redraw(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn ten_am() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    fn picker() -> (ClockPicker, Arc<CountingRedraw>) {
        let redraw = Arc::new(CountingRedraw::default());
        let picker = ClockPicker::new(ten_am(), redraw.clone());
        (picker, redraw)
    }

    /// 312x312 surface: center (156, 156), diameter 300.
    fn drawn_picker() -> (ClockPicker, Arc<CountingRedraw>) {
        let (mut picker, redraw) = picker();
        picker.render(&mut DisplayList::new(Size::new(312, 312)));
        (picker, redraw)
    }

    #[test]
    fn start_fixes_angle_and_end() {
        let (mut picker, _) = picker();
        assert_eq!(picker.start_angle().degrees(), 210);
        picker.set_duration(90);
        assert_eq!(picker.end(), ten_am() + Duration::minutes(90));

        let later = Local.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap();
        picker.set_start(later);
        assert_eq!(picker.start_angle().degrees(), 0);
        assert_eq!(picker.end(), later + Duration::minutes(90));
    }

    #[test]
    fn set_duration_twice_redraws_once() {
        let (mut picker, redraw) = picker();
        picker.set_duration(45);
        picker.set_duration(45);
        assert_eq!(redraw.count(), 1);
    }

    #[test]
    fn set_duration_clamps() {
        let (mut picker, _) = picker();
        picker.set_duration(10_000);
        assert_eq!(picker.duration(), 720);
        assert_eq!(picker.end(), ten_am() + Duration::hours(12));
    }

    #[test]
    fn step_wraps_preferring_twelve_hours() {
        assert_eq!(step_minutes(0, true), 15);
        assert_eq!(step_minutes(705, true), 720);
        assert_eq!(step_minutes(720, true), 15);
        assert_eq!(step_minutes(15, false), 720);
        assert_eq!(step_minutes(0, false), 705);
        assert_eq!(step_minutes(120, false), 105);
    }

    #[test]
    fn events_before_first_render_are_swallowed() {
        let (mut picker, redraw) = picker();
        assert!(picker.handle_pointer_event(PointerPhase::Down, 10.0, 10.0));
        assert_eq!(picker.duration(), 0);
        assert_eq!(redraw.count(), 0);
    }

    #[test]
    fn pressing_increment_waits_for_release() {
        let (mut picker, redraw) = drawn_picker();
        picker.set_duration(60);
        let before = redraw.count();

        assert!(picker.handle_pointer_event(PointerPhase::Down, 200.0, 156.0));
        assert_eq!(picker.interaction_mode(), InteractionMode::PressingIncrement);
        assert_eq!(picker.duration(), 60);
        assert_eq!(redraw.count(), before + 1);

        assert!(picker.handle_pointer_event(PointerPhase::Up, 200.0, 156.0));
        assert_eq!(picker.interaction_mode(), InteractionMode::Idle);
        assert_eq!(picker.duration(), 75);
    }

    #[test]
    fn center_touch_is_a_decrement_press() {
        let (mut picker, _) = drawn_picker();
        picker.set_duration(60);
        assert!(picker.handle_pointer_event(PointerPhase::Down, 156.0, 156.0));
        assert_eq!(picker.interaction_mode(), InteractionMode::PressingDecrement);
        assert!(picker.handle_pointer_event(PointerPhase::Up, 156.0, 156.0));
        assert_eq!(picker.duration(), 45);
    }

    #[test]
    fn dragging_the_ring_selects_sweep() {
        let (mut picker, _) = drawn_picker();
        // start angle 210; 3 o'clock is a 150 degree sweep = 300 minutes
        assert!(picker.handle_pointer_event(PointerPhase::Down, 300.0, 156.0));
        assert_eq!(picker.interaction_mode(), InteractionMode::DraggingArc);
        assert_eq!(picker.duration(), 300);

        // 12 o'clock is 60 degrees = 120 minutes
        assert!(picker.handle_pointer_event(PointerPhase::Move, 156.0, 10.0));
        assert_eq!(picker.duration(), 120);

        assert!(picker.handle_pointer_event(PointerPhase::Up, 156.0, 10.0));
        assert_eq!(picker.interaction_mode(), InteractionMode::Idle);
        assert_eq!(picker.end(), ten_am() + Duration::hours(2));
    }

    #[test]
    fn touches_far_outside_are_not_claimed() {
        let (mut picker, _) = drawn_picker();
        picker.set_duration(30);
        assert!(!picker.handle_pointer_event(PointerPhase::Down, 156.0 + 250.0, 156.0));
        assert_eq!(picker.duration(), 30);
        assert_eq!(picker.interaction_mode(), InteractionMode::Idle);
    }

    #[test]
    fn restore_reapplies_selection() {
        let (mut picker, _) = drawn_picker();
        picker.handle_pointer_event(PointerPhase::Down, 200.0, 156.0);
        let saved = SavedPickerState {
            start: Local.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            minutes: 150,
        };
        picker.restore(saved);
        assert_eq!(picker.saved_state(), saved);
        assert_eq!(picker.interaction_mode(), InteractionMode::Idle);
        assert_eq!(picker.start_angle().degrees(), 180);
    }

    #[test]
    fn render_scenario_ninety_minutes() {
        let (mut picker, _) = picker();
        picker.set_color(Color::ACCENT_BLUE);
        picker.set_duration(90);
        let mut list = DisplayList::new(Size::new(312, 312));
        picker.render(&mut list);

        let segments: Vec<_> = list.ring_segments().collect();
        assert_eq!(
            segments,
            vec![
                (210, 44, Color::ACCENT_BLUE),
                (254, 2, Color::WHITE),
                (256, 314, Color::LIGHT_GREY),
            ]
        );
        let texts: Vec<_> = list.texts().collect();
        assert_eq!(texts, vec!["1½", "hours", "11:30", "12%"]);
    }

    #[test]
    fn render_zero_minutes_has_no_fill() {
        let (mut picker, _) = picker();
        let mut list = DisplayList::new(Size::new(312, 312));
        picker.render(&mut list);
        let segments: Vec<_> = list.ring_segments().collect();
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|(_, _, c)| *c != picker.color()));
    }

    #[test]
    fn pressed_state_shows_in_render() {
        let (mut picker, _) = drawn_picker();
        picker.handle_pointer_event(PointerPhase::Down, 200.0, 156.0);
        let mut list = DisplayList::new(Size::new(312, 312));
        picker.render(&mut list);

        let wedges: Vec<_> = list
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Wedge { start, sweep, .. } => Some((*start, *sweep)),
                _ => None,
            })
            .collect();
        assert_eq!(wedges, vec![(270, 180)]);

        let rect_colors: Vec<_> = list
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(rect_colors, vec![Color::LIGHT_GREY, Color::WHITE, Color::WHITE]);
    }

    #[test]
    fn layout_is_cached_until_resize() {
        let (mut picker, _) = picker();
        let mut list = DisplayList::new(Size::new(312, 312));
        picker.render(&mut list);
        let first = *picker.layout().unwrap();
        picker.render(&mut list);
        assert_eq!(*picker.layout().unwrap(), first);

        list.resize(Size::new(412, 212));
        picker.render(&mut list);
        let resized = picker.layout().unwrap();
        assert_eq!(resized.diameter, 200);
        assert_ne!(resized.center, first.center);
    }
}
