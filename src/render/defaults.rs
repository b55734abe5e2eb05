//! Default sizes and settings (device pixels)

/// Left/right margin and frame origin x
pub const ORIGIN_X: f64 = 60.0;
/// Top/bottom margin and frame origin y
pub const ORIGIN_Y: f64 = 32.0;
pub const CANVAS_WIDTH: f64 = 1000.0;
pub const CANVAS_HEIGHT: f64 = 500.0;
/// Excursion multiplier: a sample at `vmax` deflects this many trace widths
pub const SCALE: f64 = 3.0;
pub const TITLE: &str = "Seismic Section";

/// Traces between trace-axis ticks
pub const TRACE_TICK_EVERY: usize = 20;
/// Samples between time-axis ticks
pub const TIME_TICK_EVERY: usize = 50;
pub const TICK_LENGTH: f64 = 6.0;

pub const FONT_FAMILY: &str = "Verdana";
pub const FONT_SIZE: f64 = 16.0;
pub const STROKE_WIDTH: f64 = 1.0;

pub const FRAME_COLOR: &str = "black";
pub const AXIS_COLOR: &str = "blue";
pub const WIGGLE_COLOR: &str = "black";
pub const BACKGROUND_FILL: &str = "white";
pub const BACKGROUND_STROKE: &str = "blue";

/// Shade for `FillMode::PositiveOnly`
pub const SINGLE_FILL_COLOR: &str = "black";
/// Positive shade for `FillMode::PositiveAndNegative`
pub const POSITIVE_FILL_COLOR: &str = "red";
/// Negative shade for `FillMode::PositiveAndNegative`
pub const NEGATIVE_FILL_COLOR: &str = "blue";
