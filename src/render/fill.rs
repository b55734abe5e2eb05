//! Variable-area fill: shading between each trace's waveform and its baseline.
//!
//! A sample-pair segment is shaded for a polarity when neither endpoint lies
//! on the opposite side of the baseline and at least one lies strictly on the
//! fill side. Segments that cross the baseline are not split at the zero
//! crossing and get no fill at all; conventional variable-area plots
//! interpolate there, this renderer does not.

use glam::dvec2;

use crate::types::{FillMode, Polarity};

use super::defaults;
use super::geometry::{RenderedSegment, ScaleContext};
use super::svg::{Group, Line, Points, Polygon, SvgNode};

/// How shaded regions are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillStyle {
    /// One-pixel-tall horizontal strokes from the baseline to the waveform
    #[default]
    Scanlines,
    /// One polygon per run of shaded segments
    Polygons,
}

/// Shade for a polarity under the given mode
pub fn fill_color(mode: FillMode, polarity: Polarity) -> &'static str {
    match (mode, polarity) {
        (FillMode::PositiveAndNegative, Polarity::Positive) => defaults::POSITIVE_FILL_COLOR,
        (FillMode::PositiveAndNegative, Polarity::Negative) => defaults::NEGATIVE_FILL_COLOR,
        _ => defaults::SINGLE_FILL_COLOR,
    }
}

/// Whether `seg` lies on the `polarity` side of the baseline at `xb`.
pub fn on_fill_side(seg: &RenderedSegment, xb: f64, polarity: Polarity) -> bool {
    let a = (seg.start.x - xb) * polarity.sign();
    let b = (seg.end.x - xb) * polarity.sign();
    a >= 0.0 && b >= 0.0 && (a > 0.0 || b > 0.0)
}

/// Append the scanlines covering one segment.
///
/// One stroke per whole pixel of height, starting at the upper endpoint.
/// Flat segments (`y2 == y1`) produce nothing.
pub fn scanlines(seg: &RenderedSegment, xb: f64, out: &mut Vec<Line>) {
    let (x1, y1) = (seg.start.x, seg.start.y);
    let (x2, y2) = (seg.end.x, seg.end.y);
    let height = y2 - y1;
    if height <= 0.0 {
        return;
    }

    let steps = height.floor() as usize;
    for k in 0..=steps {
        let k = k as f64;
        let x3 = x1 + (x2 - x1) * k / height;
        out.push(Line::new(dvec2(xb, y1 + k), dvec2(x3, y1 + k)));
    }
}

/// Shaded primitives for one trace and polarity.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceFill {
    pub trace: usize,
    pub polarity: Polarity,
    pub nodes: Vec<SvgNode>,
}

impl TraceFill {
    /// Group wrapping this trace's primitives
    pub fn into_group(self) -> SvgNode {
        let id = format!("{}-{:04}", self.polarity.name(), self.trace + 1);
        SvgNode::G(Group::new("trace").with_id(id).with_children(self.nodes))
    }
}

/// Fill for trace `i`, or `None` when nothing on that side qualifies.
pub fn fill_trace(
    ctx: &ScaleContext,
    i: usize,
    samples: &[f32],
    polarity: Polarity,
    style: FillStyle,
) -> Option<TraceFill> {
    if samples.len() < 2 || ctx.is_degenerate() {
        return None;
    }

    let xb = ctx.x_baseline(i);
    let nodes = match style {
        FillStyle::Scanlines => {
            let mut lines = Vec::new();
            for seg in RenderedSegment::along_trace(ctx, i, samples) {
                if on_fill_side(&seg, xb, polarity) {
                    scanlines(&seg, xb, &mut lines);
                }
            }
            lines.into_iter().map(SvgNode::Line).collect::<Vec<_>>()
        }
        FillStyle::Polygons => excursion_polygons(ctx, i, samples, polarity)
            .into_iter()
            .map(SvgNode::Polygon)
            .collect(),
    };

    if nodes.is_empty() {
        return None;
    }
    Some(TraceFill {
        trace: i,
        polarity,
        nodes,
    })
}

/// Close each maximal run of qualifying segments against the baseline.
fn excursion_polygons(
    ctx: &ScaleContext,
    i: usize,
    samples: &[f32],
    polarity: Polarity,
) -> Vec<Polygon> {
    let xb = ctx.x_baseline(i);
    let mut polygons = Vec::new();
    let mut run: Option<Points> = None;

    for (j, seg) in RenderedSegment::along_trace(ctx, i, samples).enumerate() {
        let shaded = on_fill_side(&seg, xb, polarity) && seg.end.y > seg.start.y;
        if !shaded {
            if let Some(points) = run.take() {
                polygons.push(close_run(points, xb));
            }
            continue;
        }
        match run.as_mut() {
            Some(points) => points.0.push(seg.end),
            None => {
                let mut points = Points::with_capacity(samples.len() - j + 2);
                points.0.push(dvec2(xb, seg.start.y));
                points.0.push(seg.start);
                points.0.push(seg.end);
                run = Some(points);
            }
        }
    }
    if let Some(points) = run.take() {
        polygons.push(close_run(points, xb));
    }
    polygons
}

fn close_run(mut points: Points, xb: f64) -> Polygon {
    if let Some(last) = points.0.last().copied() {
        points.0.push(dvec2(xb, last.y));
    }
    Polygon { points }
}

/// Wrap the per-trace fills (already in trace order) in one pass group.
pub fn fill_pass(mode: FillMode, polarity: Polarity, traces: Vec<TraceFill>) -> SvgNode {
    let color = fill_color(mode, polarity);
    let children = traces.into_iter().map(TraceFill::into_group).collect();
    SvgNode::G(
        Group::new(format!("fill {}", polarity.name()))
            .fill(color)
            .stroke(color, defaults::STROKE_WIDTH)
            .with_children(children),
    )
}
