//! Input model: section metadata, the validated amplitude matrix, and the
//! fill selectors.

use std::fmt;
use std::str::FromStr;

use crate::errors::RenderError;

/// Scalar metadata that travels with an amplitude matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionHeader {
    /// Time between consecutive samples, in microseconds. Must be positive;
    /// rendering rejects anything else.
    pub sample_interval_us: f64,
    /// Time of the first sample, in milliseconds.
    pub start_time_ms: f64,
}

impl SectionHeader {
    pub fn new(sample_interval_us: f64) -> Self {
        Self {
            sample_interval_us,
            start_time_ms: 0.0,
        }
    }

    pub fn with_start_time_ms(mut self, start_time_ms: f64) -> Self {
        self.start_time_ms = start_time_ms;
        self
    }

    /// Sample interval in milliseconds
    #[inline]
    pub fn dt_ms(&self) -> f64 {
        self.sample_interval_us / 1000.0
    }
}

impl Default for SectionHeader {
    fn default() -> Self {
        // 4 ms, the most common interval for post-stack data
        Self::new(4000.0)
    }
}

/// A seismic section as handed over by a trace reader: one row per trace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub header: SectionHeader,
    pub traces: Vec<Vec<f32>>,
}

impl Section {
    pub fn new(header: SectionHeader, traces: Vec<Vec<f32>>) -> Self {
        Self { header, traces }
    }

    /// Borrow the traces as a validated matrix.
    pub fn matrix(&self) -> Result<AmplitudeMatrix<'_>, RenderError> {
        AmplitudeMatrix::new(&self.traces)
    }
}

/// Read-only view over a rectangular, finite amplitude matrix.
///
/// Construction is the only place shape is checked; everything downstream
/// relies on `n_trace >= 1`, `n_sample >= 2` and uniform row length.
#[derive(Debug, Clone, Copy)]
pub struct AmplitudeMatrix<'a> {
    rows: &'a [Vec<f32>],
    n_sample: usize,
}

impl<'a> AmplitudeMatrix<'a> {
    pub fn new(rows: &'a [Vec<f32>]) -> Result<Self, RenderError> {
        let first = rows.first().ok_or(RenderError::EmptySection)?;
        let n_sample = first.len();
        if n_sample < 2 {
            return Err(RenderError::TooFewSamples { found: n_sample });
        }

        for (trace, row) in rows.iter().enumerate() {
            if row.len() != n_sample {
                return Err(RenderError::RaggedTrace {
                    trace,
                    expected: n_sample,
                    found: row.len(),
                });
            }
            if let Some(sample) = row.iter().position(|v| !v.is_finite()) {
                return Err(RenderError::NonFiniteAmplitude { trace, sample });
            }
        }

        Ok(Self { rows, n_sample })
    }

    #[inline]
    pub fn n_trace(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn n_sample(&self) -> usize {
        self.n_sample
    }

    /// Samples of trace `i`
    #[inline]
    pub fn trace(&self, i: usize) -> &'a [f32] {
        &self.rows[i]
    }

    pub fn traces(&self) -> impl ExactSizeIterator<Item = &'a [f32]> + 'a {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Signed `(min, max)` over the whole matrix.
    pub fn range(&self) -> (f64, f64) {
        self.rows
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                let v = f64::from(v);
                (lo.min(v), hi.max(v))
            })
    }
}

/// Which excursions get variable-area shading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Wiggle lines only
    None,
    /// Shade excursions to the right of the baseline
    #[default]
    PositiveOnly,
    /// Shade both sides, each in its own color
    PositiveAndNegative,
}

impl FillMode {
    /// The polarities to shade, in emission order.
    pub fn polarities(self) -> &'static [Polarity] {
        match self {
            FillMode::None => &[],
            FillMode::PositiveOnly => &[Polarity::Positive],
            FillMode::PositiveAndNegative => &[Polarity::Positive, Polarity::Negative],
        }
    }
}

impl FromStr for FillMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "0" => Ok(FillMode::None),
            "positive" | "1" => Ok(FillMode::PositiveOnly),
            "both" | "2" => Ok(FillMode::PositiveAndNegative),
            other => Err(format!(
                "unknown fill mode `{other}` (expected none, positive or both)"
            )),
        }
    }
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FillMode::None => "none",
            FillMode::PositiveOnly => "positive",
            FillMode::PositiveAndNegative => "both",
        })
    }
}

/// Side of the baseline a fill pass shades
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    /// +1 for right of the baseline, -1 for left.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Polarity::Positive => 1.0,
            Polarity::Negative => -1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_rejects_empty() {
        let rows: Vec<Vec<f32>> = Vec::new();
        assert!(matches!(
            AmplitudeMatrix::new(&rows),
            Err(RenderError::EmptySection)
        ));
    }

    #[test]
    fn matrix_rejects_single_sample() {
        let rows = vec![vec![1.0]];
        assert!(matches!(
            AmplitudeMatrix::new(&rows),
            Err(RenderError::TooFewSamples { found: 1 })
        ));
    }

    #[test]
    fn matrix_rejects_ragged_rows() {
        let rows = vec![vec![0.0, 1.0, 2.0], vec![0.0, 1.0]];
        let err = AmplitudeMatrix::new(&rows).unwrap_err();
        assert!(err.is_input_shape());
        assert!(matches!(
            err,
            RenderError::RaggedTrace {
                trace: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn matrix_rejects_nan() {
        let rows = vec![vec![0.0, 1.0], vec![0.0, f32::NAN]];
        assert!(matches!(
            AmplitudeMatrix::new(&rows),
            Err(RenderError::NonFiniteAmplitude { trace: 1, sample: 1 })
        ));
    }

    #[test]
    fn range_is_signed() {
        let rows = vec![vec![0.5, -2.0], vec![1.5, 0.0]];
        let m = AmplitudeMatrix::new(&rows).unwrap();
        assert_eq!(m.range(), (-2.0, 1.5));
        assert_eq!(m.n_trace(), 2);
        assert_eq!(m.n_sample(), 2);
    }

    #[test]
    fn fill_mode_parses_names_and_codes() {
        assert_eq!("none".parse::<FillMode>(), Ok(FillMode::None));
        assert_eq!("1".parse::<FillMode>(), Ok(FillMode::PositiveOnly));
        assert_eq!("Both".parse::<FillMode>(), Ok(FillMode::PositiveAndNegative));
        assert!("sideways".parse::<FillMode>().is_err());
    }

    #[test]
    fn polarities_are_positive_first() {
        assert_eq!(
            FillMode::PositiveAndNegative.polarities(),
            &[Polarity::Positive, Polarity::Negative]
        );
        assert!(FillMode::None.polarities().is_empty());
    }

    #[test]
    fn dt_is_converted_to_ms() {
        assert_eq!(SectionHeader::new(2000.0).dt_ms(), 2.0);
    }
}
