mod dial;
mod label;
mod layout;
mod surface;
mod svg;

pub use dial::{
    ClockPicker, InteractionMode, PickerState, PointerPhase, RedrawRequester, SavedPickerState,
};
pub use label::{format_clock_time, DurationLabel, DurationUnit};
pub use layout::{preferred_size, DialLayout, FontSizes, HitRegion};
pub use surface::{Color, DisplayList, DrawOp, Rect, Size, Surface, TextAlign, TextStyle};
pub use svg::SvgSurface;
