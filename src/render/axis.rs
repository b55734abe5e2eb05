//! Frame and axis annotation: the bounding rectangle, tick marks, and the
//! trace-number and time labels on all four edges.

use glam::dvec2;

use crate::types::SectionHeader;

use super::defaults;
use super::geometry::{ScaleContext, Viewport};
use super::svg::{Group, Line, SvgNode, Text, fmt_num};

/// Tick spacing along one axis.
///
/// `every` is the number of traces (or samples) between ticks and is never
/// zero; ticks run `k = 0..=count`, so there is always at least the origin
/// tick and the loop is bounded by `n / every`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisStep {
    pub every: usize,
    pub count: usize,
    /// The requested interval was 0 and got clamped to 1.
    pub clamped: bool,
}

impl AxisStep {
    pub fn new(n: usize, every: usize) -> Self {
        let clamped = every == 0;
        let every = every.max(1);
        Self {
            every,
            count: n / every,
            clamped,
        }
    }

    /// Fewer items than one interval: only the origin tick is drawn.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.count == 0
    }

    pub fn ticks(&self) -> impl Iterator<Item = usize> + use<> {
        0..=self.count
    }
}

/// Trace label for tick `k`: 1-based trace number, zero-padded
pub fn trace_label(step: &AxisStep, k: usize) -> String {
    format!("{:04}", 1 + step.every * k)
}

/// Time label for tick `k`, in milliseconds
pub fn time_label(header: &SectionHeader, step: &AxisStep, k: usize) -> String {
    let t = header.start_time_ms + (k * step.every) as f64 * header.dt_ms();
    let whole = t.round();
    if (t - whole).abs() < 1e-9 {
        format!("{:04}", whole as i64)
    } else {
        fmt_num(t)
    }
}

/// Closed rectangle around the interior area
pub fn frame(viewport: &Viewport) -> SvgNode {
    let tl = viewport.top_left();
    let br = viewport.bottom_right();
    let tr = dvec2(br.x, tl.y);
    let bl = dvec2(tl.x, br.y);

    let edges = [(tl, tr), (tr, br), (bl, br), (tl, bl)]
        .into_iter()
        .map(|(a, b)| SvgNode::Line(Line::new(a, b)))
        .collect();

    SvgNode::G(
        Group::new("frame")
            .stroke(defaults::FRAME_COLOR, defaults::STROKE_WIDTH)
            .with_children(edges),
    )
}

/// Ticks and labels for both axes, as one styled group
pub fn axes(
    ctx: &ScaleContext,
    viewport: &Viewport,
    header: &SectionHeader,
    traces: &AxisStep,
    samples: &AxisStep,
) -> SvgNode {
    let tl = viewport.top_left();
    let br = viewport.bottom_right();
    let tick = defaults::TICK_LENGTH;

    let mut trace_axis = Vec::with_capacity(4 * (traces.count + 1));
    let stride = traces.every as f64 * ctx.dx;
    for k in traces.ticks() {
        let x = tl.x + k as f64 * stride;
        let label = trace_label(traces, k);
        trace_axis.push(SvgNode::Line(Line::new(dvec2(x, tl.y), dvec2(x, tl.y - tick))));
        trace_axis.push(SvgNode::Line(Line::new(dvec2(x, br.y), dvec2(x, br.y + tick))));
        trace_axis.push(SvgNode::Text(Text::new(x - 20.0, tl.y - 8.0, label.clone())));
        trace_axis.push(SvgNode::Text(Text::new(x - 20.0, br.y + 20.0, label)));
    }

    let mut time_axis = Vec::with_capacity(4 * (samples.count + 1));
    let stride = samples.every as f64 * ctx.dy;
    for k in samples.ticks() {
        let y = tl.y + k as f64 * stride;
        let label = time_label(header, samples, k);
        time_axis.push(SvgNode::Line(Line::new(dvec2(tl.x, y), dvec2(tl.x - tick, y))));
        time_axis.push(SvgNode::Line(Line::new(dvec2(br.x, y), dvec2(br.x + tick, y))));
        time_axis.push(SvgNode::Text(Text::new(tl.x - 48.0, y + 6.0, label.clone())));
        time_axis.push(SvgNode::Text(Text::new(br.x + 8.0, y + 6.0, label)));
    }

    crate::log::debug!(
        trace_ticks = traces.count + 1,
        time_ticks = samples.count + 1,
        "axis ticks"
    );

    SvgNode::G(
        Group::new("axes")
            .font(defaults::FONT_FAMILY, defaults::FONT_SIZE)
            .fill(defaults::AXIS_COLOR)
            .stroke(defaults::AXIS_COLOR, defaults::STROKE_WIDTH)
            .with_children(vec![
                SvgNode::G(Group::new("trace-axis").with_children(trace_axis)),
                SvgNode::G(Group::new("time-axis").with_children(time_axis)),
            ]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_counts_whole_intervals() {
        let step = AxisStep::new(100, 20);
        assert_eq!(step.count, 5);
        assert_eq!(step.ticks().count(), 6);
        assert!(!step.is_degenerate());
    }

    #[test]
    fn short_axis_keeps_origin_tick() {
        let step = AxisStep::new(7, 20);
        assert!(step.is_degenerate());
        assert_eq!(step.ticks().collect::<Vec<_>>(), [0]);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let step = AxisStep::new(3, 0);
        assert!(step.clamped);
        assert_eq!(step.every, 1);
        assert_eq!(step.count, 3);
    }

    #[test]
    fn trace_labels_step_by_interval() {
        let step = AxisStep::new(60, 20);
        let labels: Vec<_> = step.ticks().map(|k| trace_label(&step, k)).collect();
        assert_eq!(labels, ["0001", "0021", "0041", "0061"]);
    }

    #[test]
    fn time_labels_use_milliseconds() {
        let header = SectionHeader::new(4000.0);
        let step = AxisStep::new(120, 50);
        assert_eq!(time_label(&header, &step, 0), "0000");
        assert_eq!(time_label(&header, &step, 2), "0400");

        let header = SectionHeader::new(250.0).with_start_time_ms(100.0);
        assert_eq!(time_label(&header, &step, 1), "112.5");
    }

    #[test]
    fn frame_has_four_edges() {
        let node = frame(&Viewport::default());
        assert_eq!(node.leaf_count(), 4);
    }
}
