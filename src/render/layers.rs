//! Render layers, composed in document order: frame, axes, wiggle, fill.

use enum_dispatch::enum_dispatch;

use crate::types::{AmplitudeMatrix, FillMode, Polarity, SectionHeader};

use super::axis::{self, AxisStep};
use super::fill::{self, FillStyle, TraceFill};
use super::geometry::{ScaleContext, Viewport};
use super::svg::SvgNode;
use super::wiggle;

/// Everything a layer may read. Shared read-only across trace workers.
pub struct LayerInput<'a> {
    pub ctx: &'a ScaleContext,
    pub matrix: &'a AmplitudeMatrix<'a>,
    pub viewport: &'a Viewport,
    pub header: &'a SectionHeader,
    pub trace_step: AxisStep,
    pub time_step: AxisStep,
    pub fill_mode: FillMode,
    pub fill_style: FillStyle,
}

/// Counters collected while layers render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStats {
    pub wiggle_traces: usize,
    pub wiggle_vertices: usize,
    pub positive_fill: usize,
    pub negative_fill: usize,
}

#[enum_dispatch]
pub trait Layer {
    fn name(&self) -> &'static str;

    /// Render this layer, or `None` when it has nothing to draw.
    fn render(&self, input: &LayerInput<'_>, stats: &mut LayerStats) -> Option<SvgNode>;
}

#[derive(Debug, Clone, Copy)]
pub struct FrameLayer;

#[derive(Debug, Clone, Copy)]
pub struct AxisLayer;

#[derive(Debug, Clone, Copy)]
pub struct WiggleLayer;

#[derive(Debug, Clone, Copy)]
pub struct FillLayer {
    pub polarity: Polarity,
}

#[enum_dispatch(Layer)]
#[derive(Debug, Clone, Copy)]
pub enum SectionLayer {
    FrameLayer,
    AxisLayer,
    WiggleLayer,
    FillLayer,
}

/// Layers for a render, in emission order. Every positive pass precedes
/// the negative one.
pub fn layer_stack(mode: FillMode) -> Vec<SectionLayer> {
    let mut layers: Vec<SectionLayer> =
        vec![FrameLayer.into(), AxisLayer.into(), WiggleLayer.into()];
    layers.extend(
        mode.polarities()
            .iter()
            .map(|&polarity| SectionLayer::from(FillLayer { polarity })),
    );
    layers
}

impl Layer for FrameLayer {
    fn name(&self) -> &'static str {
        "frame"
    }

    fn render(&self, input: &LayerInput<'_>, _stats: &mut LayerStats) -> Option<SvgNode> {
        Some(axis::frame(input.viewport))
    }
}

impl Layer for AxisLayer {
    fn name(&self) -> &'static str {
        "axes"
    }

    fn render(&self, input: &LayerInput<'_>, _stats: &mut LayerStats) -> Option<SvgNode> {
        Some(axis::axes(
            input.ctx,
            input.viewport,
            input.header,
            &input.trace_step,
            &input.time_step,
        ))
    }
}

impl Layer for WiggleLayer {
    fn name(&self) -> &'static str {
        "wiggle"
    }

    fn render(&self, input: &LayerInput<'_>, stats: &mut LayerStats) -> Option<SvgNode> {
        let ctx = input.ctx;
        let traces = map_traces(input.matrix, |i, samples| {
            wiggle::wiggle_trace(ctx, i, samples)
        });
        stats.wiggle_traces += traces.len();
        stats.wiggle_vertices += traces.iter().map(|t| t.points.len()).sum::<usize>();
        Some(wiggle::wiggle_group(traces))
    }
}

impl Layer for FillLayer {
    fn name(&self) -> &'static str {
        match self.polarity {
            Polarity::Positive => "fill-positive",
            Polarity::Negative => "fill-negative",
        }
    }

    fn render(&self, input: &LayerInput<'_>, stats: &mut LayerStats) -> Option<SvgNode> {
        let ctx = input.ctx;
        let (polarity, style) = (self.polarity, input.fill_style);
        let fills: Vec<TraceFill> = map_traces(input.matrix, |i, samples| {
            fill::fill_trace(ctx, i, samples, polarity, style)
        })
        .into_iter()
        .flatten()
        .collect();

        let primitives: usize = fills.iter().map(|f| f.nodes.len()).sum();
        match polarity {
            Polarity::Positive => stats.positive_fill += primitives,
            Polarity::Negative => stats.negative_fill += primitives,
        }
        crate::log::debug!(
            layer = self.name(),
            traces = fills.len(),
            primitives,
            "fill pass"
        );
        Some(fill::fill_pass(input.fill_mode, polarity, fills))
    }
}

/// Apply `f` to every trace, returning results in trace order.
#[cfg(not(feature = "parallel"))]
fn map_traces<T, F>(matrix: &AmplitudeMatrix<'_>, f: F) -> Vec<T>
where
    F: Fn(usize, &[f32]) -> T,
{
    matrix.traces().enumerate().map(|(i, s)| f(i, s)).collect()
}

/// Apply `f` to every trace on the rayon pool, returning results in trace
/// order regardless of completion order.
#[cfg(feature = "parallel")]
fn map_traces<T, F>(matrix: &AmplitudeMatrix<'_>, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, &[f32]) -> T + Sync + Send,
{
    use rayon::prelude::*;

    (0..matrix.n_trace())
        .into_par_iter()
        .map(|i| f(i, matrix.trace(i)))
        .collect()
}
