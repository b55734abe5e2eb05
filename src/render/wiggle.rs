//! Wiggle traces: one polyline per trace through every sample.

use super::defaults;
use super::geometry::ScaleContext;
use super::svg::{Group, Points, Polyline, SvgNode};

/// Polyline for trace `i`, one vertex per sample.
pub fn wiggle_trace(ctx: &ScaleContext, i: usize, samples: &[f32]) -> Polyline {
    let points = samples
        .iter()
        .enumerate()
        .map(|(j, &v)| ctx.vertex(i, j, f64::from(v)))
        .collect::<Points>();
    Polyline { points }
}

/// Wrap the per-trace polylines (already in trace order) in the wiggle group.
pub fn wiggle_group(traces: Vec<Polyline>) -> SvgNode {
    let children = traces.into_iter().map(SvgNode::Polyline).collect();
    SvgNode::G(
        Group::new("wiggle")
            .fill("none")
            .stroke(defaults::WIGGLE_COLOR, defaults::STROKE_WIDTH)
            .with_children(children),
    )
}
