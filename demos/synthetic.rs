//! Render a synthetic section of dipping Ricker-wavelet reflectors.
//!
//! Usage: `cargo run --example synthetic [output] [none|positive|both]`
//! Set `RUST_LOG=debug` (with `--features tracing`) to see render stages.

use std::f64::consts::PI;

use seisvg::{DocumentKind, FillMode, RenderOptions, Section, SectionHeader, render_to_path};

const N_TRACE: usize = 120;
const N_SAMPLE: usize = 400;
const DT_US: f64 = 2000.0;

/// Ricker wavelet with peak frequency `f` (Hz) at time `t` (s)
fn ricker(f: f64, t: f64) -> f64 {
    let a = (PI * f * t).powi(2);
    (1.0 - 2.0 * a) * (-a).exp()
}

fn synthetic_traces() -> Vec<Vec<f32>> {
    let dt = DT_US * 1e-6;
    // (intercept time s, dip s/trace, reflectivity)
    let reflectors = [(0.15, 0.0004, 1.0), (0.35, -0.0002, -0.6), (0.55, 0.0, 0.8)];
    (0..N_TRACE)
        .map(|i| {
            (0..N_SAMPLE)
                .map(|j| {
                    let t = j as f64 * dt;
                    reflectors
                        .iter()
                        .map(|&(t0, dip, r)| r * ricker(25.0, t - t0 - dip * i as f64))
                        .sum::<f64>() as f32
                })
                .collect()
        })
        .collect()
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "synthetic.html".to_string());
    let fill_mode = match args.next() {
        Some(mode) => mode
            .parse::<FillMode>()
            .map_err(|e| miette::miette!("{e}"))?,
        None => FillMode::PositiveAndNegative,
    };
    let document = if output.ends_with(".svg") {
        DocumentKind::Svg
    } else {
        DocumentKind::Html
    };

    let section = Section::new(SectionHeader::new(DT_US), synthetic_traces());
    let options = RenderOptions::default()
        .with_fill_mode(fill_mode)
        .with_document(document)
        .with_title("Synthetic Section");
    let diagnostics = render_to_path(&section, &options, &output)?;

    eprintln!("{diagnostics}");
    eprintln!("wrote {output}");
    Ok(())
}
