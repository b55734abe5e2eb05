//! Geometry mapper: trace/sample/amplitude to device coordinates.
//!
//! Device space has its origin at the top-left of the canvas with y growing
//! downward, so time increases down the page.

use glam::{DVec2, dvec2};

use crate::errors::RenderError;
use crate::types::AmplitudeMatrix;

use super::defaults;

/// Canvas rectangle plus the interior drawing area left after margins.
///
/// The origin offset is used as a symmetric margin: the interior spans
/// `(x0, y0)` to `(width - x0, height - y0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x0: f64,
    pub y0: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x0: defaults::ORIGIN_X,
            y0: defaults::ORIGIN_Y,
            width: defaults::CANVAS_WIDTH,
            height: defaults::CANVAS_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(x0: f64, y0: f64, width: f64, height: f64) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
        }
    }

    #[inline]
    pub fn inner_width(&self) -> f64 {
        self.width - 2.0 * self.x0
    }

    #[inline]
    pub fn inner_height(&self) -> f64 {
        self.height - 2.0 * self.y0
    }

    /// Top-left corner of the frame
    #[inline]
    pub fn top_left(&self) -> DVec2 {
        dvec2(self.x0, self.y0)
    }

    /// Bottom-right corner of the frame
    #[inline]
    pub fn bottom_right(&self) -> DVec2 {
        dvec2(self.x0 + self.inner_width(), self.y0 + self.inner_height())
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        let fields = [self.x0, self.y0, self.width, self.height];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(RenderError::InvalidViewport {
                reason: "coordinates must be finite".to_string(),
            });
        }
        if self.x0 < 0.0 || self.y0 < 0.0 {
            return Err(RenderError::InvalidViewport {
                reason: format!("origin ({}, {}) is negative", self.x0, self.y0),
            });
        }
        if self.inner_width() <= 0.0 || self.inner_height() <= 0.0 {
            return Err(RenderError::InvalidViewport {
                reason: format!(
                    "interior area {}x{} is empty",
                    self.inner_width(),
                    self.inner_height()
                ),
            });
        }
        Ok(())
    }
}

/// Read-only values derived once per render and shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleContext {
    pub x0: f64,
    pub y0: f64,
    /// Pixels per trace
    pub dx: f64,
    /// Pixels per sample
    pub dy: f64,
    /// Smallest amplitude in the matrix (signed)
    pub vmin: f64,
    /// Amplitude normalizer, `max(|max|, |min|)`
    pub vmax: f64,
    /// Excursion multiplier
    pub scale: f64,
}

impl ScaleContext {
    /// Runs the full-matrix reduction; must complete before any trace is
    /// scaled.
    pub fn new(
        viewport: &Viewport,
        matrix: &AmplitudeMatrix<'_>,
        scale: f64,
    ) -> Result<Self, RenderError> {
        viewport.validate()?;
        if !scale.is_finite() || scale < 0.0 {
            return Err(RenderError::InvalidScale { value: scale });
        }

        let (vmin, max) = matrix.range();
        let vmax = max.abs().max(vmin.abs());

        Ok(Self {
            x0: viewport.x0,
            y0: viewport.y0,
            dx: viewport.inner_width() / matrix.n_trace() as f64,
            dy: viewport.inner_height() / matrix.n_sample() as f64,
            vmin,
            vmax,
            scale,
        })
    }

    /// The matrix is uniformly zero; traces render without deflection.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.vmax == 0.0
    }

    /// Vertical centerline of trace `i`
    #[inline]
    pub fn x_baseline(&self, i: usize) -> f64 {
        self.x0 + self.dx * (i as f64 + 0.5)
    }

    /// Baseline shifted by the normalized amplitude `v`
    #[inline]
    pub fn x_deflected(&self, i: usize, v: f64) -> f64 {
        let base = self.x_baseline(i);
        if self.is_degenerate() {
            return base;
        }
        base + self.scale * self.dx * (v / self.vmax)
    }

    /// Vertical position of sample `j`
    #[inline]
    pub fn y(&self, j: usize) -> f64 {
        self.y0 + self.dy * j as f64
    }

    #[inline]
    pub fn vertex(&self, i: usize, j: usize, v: f64) -> DVec2 {
        dvec2(self.x_deflected(i, v), self.y(j))
    }
}

/// A transient device-space segment shared by the wiggle and fill passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedSegment {
    pub start: DVec2,
    pub end: DVec2,
}

impl RenderedSegment {
    /// Iterate the consecutive sample pairs of trace `i` as segments.
    pub fn along_trace<'a>(
        ctx: &'a ScaleContext,
        i: usize,
        samples: &'a [f32],
    ) -> impl Iterator<Item = RenderedSegment> + 'a {
        samples.windows(2).enumerate().map(move |(j, pair)| RenderedSegment {
            start: ctx.vertex(i, j, f64::from(pair[0])),
            end: ctx.vertex(i, j + 1, f64::from(pair[1])),
        })
    }
}
