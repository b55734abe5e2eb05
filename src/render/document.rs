//! Document writer: preamble, layer serialization, and trailer.
//!
//! Elements can only be opened through [`XmlWriter::element`], which closes
//! the element when its body returns, so the trailer is always written after
//! every group has been closed. [`XmlWriter::finish`] re-checks the depth.

use std::io::{self, Write};

use crate::errors::RenderError;

use super::defaults;
use super::geometry::Viewport;
use super::svg::{Presentation, Rect, SvgNode, fmt_num};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Container format of the emitted document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentKind {
    /// An HTML page with the section centered in its body
    #[default]
    Html,
    /// A standalone `.svg` file
    Svg,
}

impl DocumentKind {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Html => "html",
            DocumentKind::Svg => "svg",
        }
    }
}

/// Streaming XML writer with scoped element emission.
pub struct XmlWriter<W: Write> {
    out: W,
    depth: usize,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    /// Number of currently open elements
    #[cfg(test)]
    fn depth(&self) -> usize {
        self.depth
    }

    pub fn raw(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }

    fn open_tag(&mut self, tag: &str, attrs: &[(&str, String)]) -> io::Result<()> {
        write!(self.out, "<{tag}")?;
        for (name, value) in attrs {
            write!(self.out, " {name}=\"{}\"", escape(value, true))?;
        }
        Ok(())
    }

    /// Self-closing element
    pub fn empty(&mut self, tag: &str, attrs: &[(&str, String)]) -> io::Result<()> {
        self.open_tag(tag, attrs)?;
        self.out.write_all(b" />\n")
    }

    /// Element holding only escaped text
    pub fn text(&mut self, tag: &str, attrs: &[(&str, String)], content: &str) -> io::Result<()> {
        self.open_tag(tag, attrs)?;
        writeln!(self.out, ">{}</{tag}>", escape(content, false))
    }

    /// Element whose children are written by `body`; closed when `body` returns.
    pub fn element<F>(&mut self, tag: &str, attrs: &[(&str, String)], body: F) -> io::Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        self.open_tag(tag, attrs)?;
        self.out.write_all(b">\n")?;
        self.depth += 1;
        body(self)?;
        self.depth -= 1;
        writeln!(self.out, "</{tag}>")
    }

    /// Serialize a node and its children
    pub fn node(&mut self, node: &SvgNode) -> io::Result<()> {
        match node {
            SvgNode::G(g) => self.element("g", &g.attrs(), |w| {
                for child in &g.children {
                    w.node(child)?;
                }
                Ok(())
            }),
            SvgNode::Rect(r) => self.empty("rect", &r.attrs()),
            SvgNode::Line(l) => self.empty("line", &l.attrs()),
            SvgNode::Polyline(p) => self.empty("polyline", &p.attrs()),
            SvgNode::Polygon(p) => self.empty("polygon", &p.attrs()),
            SvgNode::Text(t) => self.text("text", &t.attrs(), &t.content),
        }
    }

    /// Hand back the destination, refusing an unbalanced document.
    pub fn finish(mut self) -> Result<W, RenderError> {
        if self.depth != 0 {
            return Err(RenderError::UnbalancedDocument { depth: self.depth });
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Escape text content, and quotes too when `attr` is set
pub fn escape(s: &str, attr: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            '\'' if attr => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Write a complete document around the rendered layers.
pub fn write_document<W: Write>(
    out: W,
    kind: DocumentKind,
    title: &str,
    viewport: &Viewport,
    layers: &[SvgNode],
) -> Result<W, RenderError> {
    let mut w = XmlWriter::new(out);
    match kind {
        DocumentKind::Html => {
            w.raw("<!DOCTYPE html>\n")?;
            w.element("html", &[], |w| {
                w.element("head", &[], |w| {
                    w.text("title", &[], title)?;
                    meta(w, "keywords", title)?;
                    meta(w, "description", "Seismic Section")?;
                    meta(w, "content-type", "text/html; charset=UTF-8")
                })?;
                let body = [
                    ("leftmargin", "0".to_string()),
                    ("topmargin", "8".to_string()),
                    ("marginwidth", "0".to_string()),
                ];
                w.element("body", &body, |w| {
                    w.element("center", &[], |w| svg_root(w, None, viewport, layers))
                })
            })?;
        }
        DocumentKind::Svg => {
            w.raw("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n")?;
            svg_root(&mut w, Some(title), viewport, layers)?;
        }
    }
    w.finish()
}

fn meta<W: Write>(w: &mut XmlWriter<W>, name: &str, content: &str) -> io::Result<()> {
    w.empty(
        "meta",
        &[("http-equiv", name.to_string()), ("content", content.to_string())],
    )
}

fn svg_root<W: Write>(
    w: &mut XmlWriter<W>,
    title: Option<&str>,
    viewport: &Viewport,
    layers: &[SvgNode],
) -> io::Result<()> {
    let width = fmt_num(viewport.width);
    let height = fmt_num(viewport.height);
    let attrs = [
        ("width", width.clone()),
        ("height", height.clone()),
        ("viewBox", format!("0 0 {width} {height}")),
        ("xmlns", SVG_NS.to_string()),
        ("xmlns:xlink", XLINK_NS.to_string()),
        ("version", "1.1".to_string()),
    ];
    w.element("svg", &attrs, |w| {
        if let Some(title) = title {
            w.text("title", &[], title)?;
        }
        let background = Rect {
            id: Some("B".to_string()),
            x: 0.0,
            y: 0.0,
            width: viewport.width,
            height: viewport.height,
            style: Presentation {
                fill: Some(defaults::BACKGROUND_FILL.to_string()),
                stroke: Some(defaults::BACKGROUND_STROKE.to_string()),
                ..Default::default()
            },
        };
        w.node(&SvgNode::Rect(background))?;
        for layer in layers {
            w.node(layer)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::svg::{Group, Line, Text};
    use glam::DVec2;

    fn to_string(kind: DocumentKind, layers: &[SvgNode]) -> String {
        let buf = write_document(Vec::new(), kind, "T & <S>", &Viewport::default(), layers)
            .expect("document renders");
        String::from_utf8(buf).expect("utf-8")
    }

    #[test]
    fn element_closes_its_scope() {
        let mut w = XmlWriter::new(Vec::new());
        w.element("g", &[("class", "a".to_string())], |w| {
            assert_eq!(w.depth(), 1);
            w.empty("line", &[])
        })
        .unwrap();
        assert_eq!(w.depth(), 0);
        let out = String::from_utf8(w.finish().unwrap()).unwrap();
        assert_eq!(out, "<g class=\"a\">\n<line />\n</g>\n");
    }

    #[test]
    fn failed_body_is_unbalanced() {
        let mut w = XmlWriter::new(Vec::new());
        let res = w.element("g", &[], |_| Err(io::Error::other("boom")));
        assert!(res.is_err());
        assert!(matches!(
            w.finish(),
            Err(RenderError::UnbalancedDocument { depth: 1 })
        ));
    }

    #[test]
    fn escapes_text_and_attributes() {
        assert_eq!(escape("a<b>&c", false), "a&lt;b&gt;&amp;c");
        assert_eq!(escape("\"q\"", true), "&quot;q&quot;");
        assert_eq!(escape("\"q\"", false), "\"q\"");
    }

    #[test]
    fn html_wraps_svg() {
        let out = to_string(DocumentKind::Html, &[]);
        assert!(out.starts_with("<!DOCTYPE html>\n<html>\n<head>\n<title>T &amp; &lt;S&gt;</title>"));
        assert!(out.contains("<svg width=\"1000\" height=\"500\" viewBox=\"0 0 1000 500\""));
        assert!(out.contains("<rect id=\"B\" x=\"0\" y=\"0\" width=\"1000\" height=\"500\" fill=\"white\" stroke=\"blue\" />"));
        assert!(out.ends_with("</svg>\n</center>\n</body>\n</html>\n"));
    }

    #[test]
    fn standalone_svg_has_title() {
        let layer = SvgNode::G(Group::new("x").with_children(vec![
            SvgNode::Line(Line::new(DVec2::ZERO, DVec2::new(1.0, 2.0))),
            SvgNode::Text(Text::new(3.0, 4.0, "0001")),
        ]));
        let out = to_string(DocumentKind::Svg, &[layer]);
        assert!(out.starts_with("<?xml"));
        assert!(out.contains("<title>T &amp; &lt;S&gt;</title>"));
        assert!(out.contains("<line x1=\"0\" y1=\"0\" x2=\"1\" y2=\"2\" />"));
        assert!(out.contains("<text x=\"3\" y=\"4\">0001</text>"));
        assert!(out.ends_with("</g>\n</svg>\n"));
    }
}
