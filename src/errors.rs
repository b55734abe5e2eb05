//! Error types with rich diagnostics using miette
//!
//! Parse errors carry source spans for readable error messages; render errors
//! describe input shapes and output failures.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    /// Create a new source context
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Errors that occur while reading the text section format
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("syntax error: {message}")]
    #[diagnostic(code(seisvg::parse::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("invalid number: {text}")]
    #[diagnostic(
        code(seisvg::parse::invalid_number),
        help("amplitudes and settings must be finite numbers")
    )]
    InvalidNumber {
        text: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid number")]
        span: SourceSpan,
    },

    #[error("unknown setting: {name}")]
    #[diagnostic(
        code(seisvg::parse::unknown_setting),
        help("known settings are `dt` (microseconds) and `t0` (milliseconds)")
    )]
    UnknownSetting {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("unknown setting")]
        span: SourceSpan,
    },

    #[error("setting `{name}` given twice")]
    #[diagnostic(code(seisvg::parse::duplicate_setting))]
    DuplicateSetting {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("first set here")]
        first: SourceSpan,
        #[label("set again here")]
        second: SourceSpan,
    },

    #[error("missing sample interval")]
    #[diagnostic(
        code(seisvg::parse::missing_interval),
        help("add a line like `dt = 4000` (microseconds)")
    )]
    MissingInterval {
        #[source_code]
        src: NamedSource<String>,
        #[label("no `dt` setting in this section")]
        span: SourceSpan,
    },

    #[error("sample interval must be positive, got {value}")]
    #[diagnostic(
        code(seisvg::parse::invalid_interval),
        help("`dt` is the time between samples in microseconds, e.g. `dt = 4000`")
    )]
    InvalidInterval {
        value: f64,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a positive interval")]
        span: SourceSpan,
    },

    #[error("trace {trace} has {found} samples, expected {expected}")]
    #[diagnostic(
        code(seisvg::parse::ragged_trace),
        help("every trace must have as many samples as the first one")
    )]
    RaggedTrace {
        trace: usize,
        expected: usize,
        found: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("this trace")]
        span: SourceSpan,
    },
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors that occur during rendering
#[derive(Error, Diagnostic, Debug)]
pub enum RenderError {
    #[error("section has no traces")]
    #[diagnostic(code(seisvg::render::empty_section))]
    EmptySection,

    #[error("traces have {found} samples, at least 2 are required")]
    #[diagnostic(code(seisvg::render::too_few_samples))]
    TooFewSamples { found: usize },

    #[error("trace {trace} has {found} samples, expected {expected}")]
    #[diagnostic(code(seisvg::render::ragged_trace))]
    RaggedTrace {
        trace: usize,
        expected: usize,
        found: usize,
    },

    #[error("amplitude at trace {trace}, sample {sample} is NaN or infinite")]
    #[diagnostic(code(seisvg::render::non_finite_amplitude))]
    NonFiniteAmplitude { trace: usize, sample: usize },

    #[error("invalid sample interval: {value} us")]
    #[diagnostic(
        code(seisvg::render::invalid_interval),
        help("the sample interval must be a finite, positive number of microseconds")
    )]
    InvalidInterval { value: f64 },

    #[error("invalid viewport: {reason}")]
    #[diagnostic(
        code(seisvg::render::invalid_viewport),
        help("the canvas must be larger than twice its origin offset on both axes")
    )]
    InvalidViewport { reason: String },

    #[error("invalid scale: {value}")]
    #[diagnostic(
        code(seisvg::render::invalid_scale),
        help("the excursion scale must be a finite, non-negative number")
    )]
    InvalidScale { value: f64 },

    #[error("document has {depth} unclosed element(s)")]
    #[diagnostic(code(seisvg::render::unbalanced_document))]
    UnbalancedDocument { depth: usize },

    #[error("failed to write document")]
    #[diagnostic(code(seisvg::render::destination_write))]
    DestinationWrite {
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// True for the errors that describe a malformed amplitude matrix.
    pub fn is_input_shape(&self) -> bool {
        matches!(
            self,
            RenderError::EmptySection
                | RenderError::TooFewSamples { .. }
                | RenderError::RaggedTrace { .. }
        )
    }
}

impl From<std::io::Error> for RenderError {
    fn from(source: std::io::Error) -> Self {
        RenderError::DestinationWrite { source }
    }
}
