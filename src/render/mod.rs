//! SVG rendering for seismic sections
//!
//! This module is organized into submodules:
//! - `defaults`: Default sizes, colors and tick spacing
//! - `geometry`: Viewport and the trace/sample to device mapping
//! - `axis`: Frame, ticks and labels
//! - `wiggle`: Per-trace waveform polylines
//! - `fill`: Variable-area shading
//! - `layers`: The layer stack composing the above in document order
//! - `svg`: Typed SVG elements
//! - `document`: Preamble/trailer and serialization

pub mod axis;
pub mod defaults;
pub mod document;
pub mod fill;
pub mod geometry;
pub mod layers;
pub mod svg;
pub mod wiggle;

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::RenderError;
use crate::types::{AmplitudeMatrix, FillMode, Section, SectionHeader};

pub use axis::AxisStep;
pub use document::DocumentKind;
pub use fill::FillStyle;
pub use geometry::{RenderedSegment, ScaleContext, Viewport};
pub use layers::LayerStats;

use layers::{Layer, LayerInput, layer_stack};
use svg::SvgNode;

/// Rendering options
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub viewport: Viewport,
    /// Excursion multiplier: a sample at `vmax` deflects `scale` trace widths
    pub scale: f64,
    pub fill_mode: FillMode,
    pub fill_style: FillStyle,
    pub document: DocumentKind,
    pub title: String,
    /// Traces between trace-axis ticks (0 is clamped to 1)
    pub trace_tick_every: usize,
    /// Samples between time-axis ticks (0 is clamped to 1)
    pub time_tick_every: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            scale: defaults::SCALE,
            fill_mode: FillMode::default(),
            fill_style: FillStyle::default(),
            document: DocumentKind::default(),
            title: defaults::TITLE.to_string(),
            trace_tick_every: defaults::TRACE_TICK_EVERY,
            time_tick_every: defaults::TIME_TICK_EVERY,
        }
    }
}

impl RenderOptions {
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_fill_mode(mut self, fill_mode: FillMode) -> Self {
        self.fill_mode = fill_mode;
        self
    }

    pub fn with_fill_style(mut self, fill_style: FillStyle) -> Self {
        self.fill_style = fill_style;
        self
    }

    pub fn with_document(mut self, document: DocumentKind) -> Self {
        self.document = document;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_ticks(mut self, trace_every: usize, time_every: usize) -> Self {
        self.trace_tick_every = trace_every;
        self.time_tick_every = time_every;
        self
    }
}

/// Summary of one render, returned alongside the document
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub n_trace: usize,
    pub n_sample: usize,
    pub vmin: f64,
    pub vmax: f64,
    /// All amplitudes are zero; traces were drawn undeflected
    pub degenerate_scale: bool,
    pub trace_step: AxisStep,
    pub time_step: AxisStep,
    pub stats: LayerStats,
    pub bytes_written: usize,
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### Seismic section")?;
        writeln!(f, "    Number of Traces    = {}", self.n_trace)?;
        writeln!(f, "    Number of Samples   = {}", self.n_sample)?;
        writeln!(f, "    Value Range: ( {:.6} - {:+.6} )", self.vmin, self.vmax)?;
        if self.degenerate_scale {
            writeln!(f, "    Flat section: all amplitudes are zero, no deflection")?;
        }
        for (name, step) in [("Trace", &self.trace_step), ("Time", &self.time_step)] {
            write!(f, "    {name} ticks = {} every {}", step.count + 1, step.every)?;
            if step.clamped {
                write!(f, " (interval clamped)")?;
            }
            if step.is_degenerate() {
                write!(f, " (origin only)")?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "    Wiggle vertices     = {}",
            self.stats.wiggle_vertices
        )?;
        writeln!(
            f,
            "    Fill primitives     = {} positive, {} negative",
            self.stats.positive_fill, self.stats.negative_fill
        )?;
        write!(f, "    Document size       = {} bytes", self.bytes_written)
    }
}

/// Render the layers without serializing them.
///
/// Validation happens here, before anything is produced.
pub fn render_layers(
    matrix: &AmplitudeMatrix<'_>,
    header: &SectionHeader,
    options: &RenderOptions,
) -> Result<(Vec<SvgNode>, Diagnostics), RenderError> {
    let dt = header.sample_interval_us;
    if !dt.is_finite() || dt <= 0.0 {
        return Err(RenderError::InvalidInterval { value: dt });
    }
    let ctx = ScaleContext::new(&options.viewport, matrix, options.scale)?;
    if ctx.is_degenerate() {
        crate::log::warn!("all amplitudes are zero; rendering flat traces");
    }

    let trace_step = AxisStep::new(matrix.n_trace(), options.trace_tick_every);
    let time_step = AxisStep::new(matrix.n_sample(), options.time_tick_every);
    if trace_step.clamped || time_step.clamped {
        crate::log::warn!(
            trace_every = options.trace_tick_every,
            time_every = options.time_tick_every,
            "tick interval of 0 clamped to 1"
        );
    }

    crate::log::debug!(
        n_trace = matrix.n_trace(),
        n_sample = matrix.n_sample(),
        dx = ctx.dx,
        dy = ctx.dy,
        vmin = ctx.vmin,
        vmax = ctx.vmax,
        "scale context"
    );

    let input = LayerInput {
        ctx: &ctx,
        matrix,
        viewport: &options.viewport,
        header,
        trace_step,
        time_step,
        fill_mode: options.fill_mode,
        fill_style: options.fill_style,
    };

    let mut stats = LayerStats::default();
    let nodes = layer_stack(options.fill_mode)
        .iter()
        .filter_map(|layer| layer.render(&input, &mut stats))
        .collect();

    let diagnostics = Diagnostics {
        n_trace: matrix.n_trace(),
        n_sample: matrix.n_sample(),
        vmin: ctx.vmin,
        vmax: ctx.vmax,
        degenerate_scale: ctx.is_degenerate(),
        trace_step,
        time_step,
        stats,
        bytes_written: 0,
    };
    Ok((nodes, diagnostics))
}

/// Render `section` and write the finished document to `out`.
///
/// The document is assembled in memory first, so a shape or option error
/// writes nothing, and a write failure is reported before success is.
pub fn render_section<W: Write>(
    section: &Section,
    options: &RenderOptions,
    mut out: W,
) -> Result<Diagnostics, RenderError> {
    let (bytes, diagnostics) = render_bytes(section, options)?;
    out.write_all(&bytes)?;
    out.flush()?;
    Ok(diagnostics)
}

/// Render `section` to an in-memory document string.
pub fn render_to_string(
    section: &Section,
    options: &RenderOptions,
) -> Result<(String, Diagnostics), RenderError> {
    let (bytes, diagnostics) = render_bytes(section, options)?;
    // The writer only ever emits UTF-8 text
    let text = String::from_utf8(bytes).map_err(|e| RenderError::DestinationWrite {
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    Ok((text, diagnostics))
}

/// Render `section` into the file at `path`.
///
/// Writes a sibling temporary file and renames it over `path`, so a failed
/// render never leaves a truncated document behind. Each call uses its own
/// temporary name and never touches a file it did not create.
pub fn render_to_path(
    section: &Section,
    options: &RenderOptions,
    path: impl AsRef<Path>,
) -> Result<Diagnostics, RenderError> {
    let path = path.as_ref();
    let (bytes, diagnostics) = render_bytes(section, options)?;

    let tmp = temp_path(path);
    if let Err(source) = write_new(&tmp, &bytes) {
        if source.kind() != io::ErrorKind::AlreadyExists {
            let _ = fs::remove_file(&tmp);
        }
        return Err(RenderError::DestinationWrite { source });
    }
    if let Err(source) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(RenderError::DestinationWrite { source });
    }

    crate::log::debug!(path = %path.display(), bytes = bytes.len(), "document written");
    Ok(diagnostics)
}

fn render_bytes(
    section: &Section,
    options: &RenderOptions,
) -> Result<(Vec<u8>, Diagnostics), RenderError> {
    let matrix = section.matrix()?;
    let (nodes, mut diagnostics) = render_layers(&matrix, &section.header, options)?;
    let bytes = document::write_document(
        Vec::new(),
        options.document,
        &options.title,
        &options.viewport,
        &nodes,
    )?;
    diagnostics.bytes_written = bytes.len();
    Ok((bytes, diagnostics))
}

/// Sibling of `path` unique to this process and call
fn temp_path(path: &Path) -> PathBuf {
    static NEXT: AtomicUsize = AtomicUsize::new(0);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "section".to_string());
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{name}.{}.{n}.tmp", std::process::id()))
}

/// Write `bytes` to a file that must not exist yet
fn write_new(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(traces: Vec<Vec<f32>>) -> Section {
        Section::new(SectionHeader::new(4000.0), traces)
    }

    #[test]
    fn invalid_shape_writes_nothing() {
        let mut out = Vec::new();
        let err = render_section(&section(vec![vec![1.0]]), &RenderOptions::default(), &mut out)
            .unwrap_err();
        assert!(err.is_input_shape());
        assert!(out.is_empty());
    }

    #[test]
    fn diagnostics_report_range_and_counts() {
        let s = section(vec![vec![0.0, 0.5, -0.25, 0.0]; 3]);
        let (doc, diag) = render_to_string(&s, &RenderOptions::default()).unwrap();
        assert_eq!(diag.n_trace, 3);
        assert_eq!(diag.n_sample, 4);
        assert_eq!(diag.vmin, -0.25);
        assert_eq!(diag.vmax, 0.5);
        assert!(!diag.degenerate_scale);
        assert_eq!(diag.stats.wiggle_traces, 3);
        assert_eq!(diag.stats.wiggle_vertices, 12);
        assert_eq!(diag.bytes_written, doc.len());
        assert!(diag.trace_step.is_degenerate());
        assert!(diag.to_string().contains("Number of Traces    = 3"));
    }

    #[test]
    fn flat_section_is_flagged() {
        let s = section(vec![vec![0.0; 8]; 2]);
        let (_, diag) = render_to_string(&s, &RenderOptions::default()).unwrap();
        assert!(diag.degenerate_scale);
        assert_eq!(diag.stats.positive_fill, 0);
        assert!(diag.to_string().contains("Flat section"));
    }

    #[test]
    fn zero_tick_interval_is_reported() {
        let s = section(vec![vec![1.0, -1.0]; 4]);
        let opts = RenderOptions::default().with_ticks(0, 0);
        let (_, diag) = render_to_string(&s, &opts).unwrap();
        assert!(diag.trace_step.clamped && diag.time_step.clamped);
        assert_eq!(diag.trace_step.count, 4);
        assert!(diag.to_string().contains("interval clamped"));
    }

    #[test]
    fn non_positive_interval_writes_nothing() {
        for dt in [0.0, -4000.0, f64::NAN] {
            let s = Section::new(SectionHeader::new(dt), vec![vec![1.0, -1.0]; 2]);
            let mut out = Vec::new();
            let err = render_section(&s, &RenderOptions::default(), &mut out).unwrap_err();
            assert!(matches!(err, RenderError::InvalidInterval { .. }));
            assert!(out.is_empty());
        }
    }

    #[test]
    fn write_failure_is_reported() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let s = section(vec![vec![1.0, -1.0]; 2]);
        let err = render_section(&s, &RenderOptions::default(), Broken).unwrap_err();
        assert!(matches!(err, RenderError::DestinationWrite { .. }));
    }

    #[test]
    fn render_to_path_replaces_target() {
        let dir = std::env::temp_dir().join(format!("seisvg-render-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let target = dir.join("section.svg");
        fs::write(&target, "old").unwrap();

        let s = section(vec![vec![1.0, -1.0, 0.5]; 2]);
        let opts = RenderOptions::default().with_document(DocumentKind::Svg);
        let diag = render_to_path(&s, &opts, &target).unwrap();

        let written = fs::read_to_string(&target).unwrap();
        assert_eq!(written.len(), diag.bytes_written);
        assert!(written.starts_with("<?xml"));
        let entries: Vec<_> = fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 1, "temporary file left behind");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn temp_names_are_unique_per_call() {
        let target = Path::new("out").join("section.html");
        let a = temp_path(&target);
        let b = temp_path(&target);
        assert_ne!(a, b);
        assert_eq!(a.parent(), target.parent());
    }

    #[test]
    fn render_to_path_keeps_unrelated_temp_files() {
        let dir = std::env::temp_dir().join(format!("seisvg-keep-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let target = dir.join("section.html");
        let bystander = dir.join(".section.html.tmp");
        fs::write(&bystander, "not ours").unwrap();

        let s = section(vec![vec![1.0, -1.0]; 2]);
        render_to_path(&s, &RenderOptions::default(), &target).unwrap();

        assert_eq!(fs::read_to_string(&bystander).unwrap(), "not ours");
        assert!(fs::read_to_string(&target).unwrap().ends_with("</html>\n"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn concurrent_renders_to_one_target_both_succeed() {
        let dir = std::env::temp_dir().join(format!("seisvg-race-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let target = dir.join("section.svg");

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let target = target.clone();
                std::thread::spawn(move || {
                    let s = section(vec![vec![i as f32, -1.0, 0.5]; 3]);
                    let opts = RenderOptions::default().with_document(DocumentKind::Svg);
                    render_to_path(&s, &opts, &target)
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }

        assert!(fs::read_to_string(&target).unwrap().ends_with("</svg>\n"));
        let entries: Vec<_> = fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 1, "temporary file left behind");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn render_to_path_fails_for_missing_directory() {
        let target = std::env::temp_dir()
            .join(format!("seisvg-missing-{}", std::process::id()))
            .join("nested")
            .join("section.html");
        let s = section(vec![vec![1.0, -1.0]; 2]);
        let err = render_to_path(&s, &RenderOptions::default(), &target).unwrap_err();
        assert!(matches!(err, RenderError::DestinationWrite { .. }));
        assert!(!target.exists());
    }
}
