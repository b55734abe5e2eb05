//! Typed SVG elements emitted by the render layers.
//!
//! Only the handful of elements a seismic section needs: groups, lines,
//! polylines, polygons, rects and text. Serialization lives in
//! [`super::document`].

use std::fmt;

use glam::DVec2;

/// Any SVG node a layer can emit
#[derive(Debug, Clone, PartialEq)]
pub enum SvgNode {
    G(Group),
    Rect(Rect),
    Line(Line),
    Polyline(Polyline),
    Polygon(Polygon),
    Text(Text),
}

impl SvgNode {
    /// Number of leaf (non-group) elements below and including this node.
    #[cfg(test)]
    pub(crate) fn leaf_count(&self) -> usize {
        match self {
            SvgNode::G(g) => g.children.iter().map(SvgNode::leaf_count).sum(),
            _ => 1,
        }
    }
}

/// Presentation attributes shared by groups and shapes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Presentation {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
}

impl Presentation {
    pub fn attrs(&self) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::new();
        if let Some(ref family) = self.font_family {
            attrs.push(("font-family", family.clone()));
        }
        if let Some(size) = self.font_size {
            attrs.push(("font-size", fmt_num(size)));
        }
        if let Some(ref fill) = self.fill {
            attrs.push(("fill", fill.clone()));
        }
        if let Some(ref stroke) = self.stroke {
            attrs.push(("stroke", stroke.clone()));
        }
        if let Some(width) = self.stroke_width {
            attrs.push(("stroke-width", fmt_num(width)));
        }
        attrs
    }
}

/// SVG group element (`<g>`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub id: Option<String>,
    pub class: Option<String>,
    pub style: Presentation,
    pub children: Vec<SvgNode>,
}

impl Group {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn fill(mut self, color: &str) -> Self {
        self.style.fill = Some(color.to_string());
        self
    }

    pub fn stroke(mut self, color: &str, width: f64) -> Self {
        self.style.stroke = Some(color.to_string());
        self.style.stroke_width = Some(width);
        self
    }

    pub fn font(mut self, family: &str, size: f64) -> Self {
        self.style.font_family = Some(family.to_string());
        self.style.font_size = Some(size);
        self
    }

    pub fn with_children(mut self, children: Vec<SvgNode>) -> Self {
        self.children = children;
        self
    }

    pub fn attrs(&self) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::new();
        if let Some(ref id) = self.id {
            attrs.push(("id", id.clone()));
        }
        if let Some(ref class) = self.class {
            attrs.push(("class", class.clone()));
        }
        attrs.extend(self.style.attrs());
        attrs
    }
}

/// SVG rect element (`<rect>`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rect {
    pub id: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub style: Presentation,
}

impl Rect {
    pub fn attrs(&self) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::new();
        if let Some(ref id) = self.id {
            attrs.push(("id", id.clone()));
        }
        attrs.push(("x", fmt_num(self.x)));
        attrs.push(("y", fmt_num(self.y)));
        attrs.push(("width", fmt_num(self.width)));
        attrs.push(("height", fmt_num(self.height)));
        attrs.extend(self.style.attrs());
        attrs
    }
}

/// SVG line element (`<line>`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: DVec2,
    pub end: DVec2,
}

impl Line {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    pub fn attrs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("x1", fmt_num(self.start.x)),
            ("y1", fmt_num(self.start.y)),
            ("x2", fmt_num(self.end.x)),
            ("y2", fmt_num(self.end.y)),
        ]
    }
}

/// Vertex list of a polyline or polygon, serialized as `x,y x,y ...`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Points(pub Vec<DVec2>);

impl Points {
    pub fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    #[cfg(test)]
    fn with_point(mut self, x: f64, y: f64) -> Self {
        self.0.push(DVec2::new(x, y));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<DVec2> for Points {
    fn from_iter<I: IntoIterator<Item = DVec2>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{},{}", fmt_num(p.x), fmt_num(p.y))?;
        }
        Ok(())
    }
}

/// SVG polyline element (`<polyline>`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub points: Points,
}

impl Polyline {
    pub fn attrs(&self) -> Vec<(&'static str, String)> {
        vec![("points", self.points.to_string())]
    }
}

/// SVG polygon element (`<polygon>`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub points: Points,
}

impl Polygon {
    pub fn attrs(&self) -> Vec<(&'static str, String)> {
        vec![("points", self.points.to_string())]
    }
}

/// SVG text element (`<text>`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub content: String,
}

impl Text {
    pub fn new(x: f64, y: f64, content: impl Into<String>) -> Self {
        Self {
            x,
            y,
            content: content.into(),
        }
    }

    pub fn attrs(&self) -> Vec<(&'static str, String)> {
        vec![("x", fmt_num(self.x)), ("y", fmt_num(self.y))]
    }
}

/// Format a number with 6 significant figures, trailing zeros trimmed.
pub(crate) fn fmt_num(value: f64) -> String {
    fmt_num_precision(value, 6)
}

/// Format a number with specified significant figures, trailing zeros trimmed.
fn fmt_num_precision(value: f64, sig_figs: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }

    // Round to specified significant figures
    let abs_val = value.abs();
    let magnitude = abs_val.log10().floor() as i32;
    let scale = 10_f64.powi(sig_figs - 1 - magnitude);
    let rounded = (value * scale).round() / scale;

    // Format with enough decimal places, then trim
    let decimals = (sig_figs - 1 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_num_trims_trailing_zeros() {
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(60.0), "60");
        assert_eq!(fmt_num(64.4), "64.4");
        assert_eq!(fmt_num(1234.56789), "1234.57");
        assert_eq!(fmt_num(-0.5), "-0.5");
        assert_eq!(fmt_num(1000.0), "1000");
    }

    #[test]
    fn fmt_num_never_prints_negative_zero() {
        assert_eq!(fmt_num(-0.0000000001), "-0.0000000001");
        assert_eq!(fmt_num(-0.0), "0");
    }

    #[test]
    fn points_display() {
        let pts = Points::default().with_point(1.0, 2.5).with_point(3.0, 4.0);
        assert_eq!(pts.to_string(), "1,2.5 3,4");
        assert_eq!(pts.len(), 2);
    }

    #[test]
    fn group_attrs_in_order() {
        let g = Group::new("wiggle").fill("none").stroke("black", 1.0);
        let names: Vec<_> = g.attrs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["class", "fill", "stroke", "stroke-width"]);
    }

    #[test]
    fn leaf_count_recurses() {
        let inner = Group::new("t").with_children(vec![
            SvgNode::Line(Line::new(DVec2::ZERO, DVec2::ONE)),
            SvgNode::Line(Line::new(DVec2::ONE, DVec2::ZERO)),
        ]);
        let outer = SvgNode::G(Group::new("o").with_children(vec![
            SvgNode::G(inner),
            SvgNode::Text(Text::new(0.0, 0.0, "x")),
        ]));
        assert_eq!(outer.leaf_count(), 3);
    }
}
