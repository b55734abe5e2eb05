//! Render a section in the text format to HTML or SVG.
//!
//! Usage: `cargo run --example render_file <input.seis> [none|positive|both] [polygons]`
//!
//! The document is written next to the input, with an `.html` extension (or
//! `.svg` when `SEISVG_SVG` is set).

use std::path::Path;

use miette::{IntoDiagnostic, WrapErr};
use seisvg::{DocumentKind, FillMode, FillStyle, RenderOptions, parse_named, render_to_path};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        miette::bail!("usage: render_file <input.seis> [none|positive|both] [polygons]");
    };
    let fill_mode = match args.next() {
        Some(mode) => mode
            .parse::<FillMode>()
            .map_err(|e| miette::miette!("{e}"))?,
        None => FillMode::default(),
    };
    let fill_style = match args.next().as_deref() {
        Some("polygons") => FillStyle::Polygons,
        _ => FillStyle::Scanlines,
    };
    let document = if std::env::var_os("SEISVG_SVG").is_some() {
        DocumentKind::Svg
    } else {
        DocumentKind::Html
    };

    let source = std::fs::read_to_string(&input)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {input}"))?;
    let section = parse_named(&input, &source)?;

    let output = Path::new(&input).with_extension(document.extension());
    let title = Path::new(&input)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Seismic Section".to_string());
    let options = RenderOptions::default()
        .with_fill_mode(fill_mode)
        .with_fill_style(fill_style)
        .with_document(document)
        .with_title(title);

    let diagnostics = render_to_path(&section, &options, &output)?;
    eprintln!("{diagnostics}");
    eprintln!("wrote {}", output.display());
    Ok(())
}
