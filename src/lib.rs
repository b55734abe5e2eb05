//! Seismic section plotting to SVG.
//!
//! Renders a matrix of traces x time samples as a framed section with wiggle
//! lines and variable-area fill, written as a self-contained HTML or SVG
//! document.
//!
//! ```
//! use seisvg::{FillMode, RenderOptions, Section, SectionHeader, render_to_string};
//!
//! let traces = vec![vec![0.0, 0.5, -0.5, 0.0]; 4];
//! let section = Section::new(SectionHeader::new(4000.0), traces);
//! let options = RenderOptions::default().with_fill_mode(FillMode::PositiveAndNegative);
//! let (document, diagnostics) = render_to_string(&section, &options).unwrap();
//! assert!(document.contains("<polyline"));
//! assert_eq!(diagnostics.n_trace, 4);
//! ```

pub mod errors;
pub(crate) mod log;
pub mod parse;
pub mod render;
pub mod types;

pub use errors::{ParseError, RenderError};
pub use parse::{parse_named, parse_section};
pub use render::{
    Diagnostics, DocumentKind, FillStyle, RenderOptions, Viewport, render_layers,
    render_section, render_to_path, render_to_string,
};
pub use types::{AmplitudeMatrix, FillMode, Polarity, Section, SectionHeader};

/// Render a section in the text format to an HTML document with default
/// options.
///
/// Returns the document on success, or an error with diagnostics.
pub fn seisvg(source: &str) -> Result<String, miette::Report> {
    let section = parse_section(source)?;
    let (document, _) = render_to_string(&section, &RenderOptions::default())?;
    Ok(document)
}
