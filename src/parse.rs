//! Reader for the text section format (see `section.pest`).

use miette::SourceSpan;
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::errors::{ParseError, SourceContext};
use crate::types::{Section, SectionHeader};

#[derive(Parser)]
#[grammar = "section.pest"]
pub struct SectionParser;

/// Parse a section read from an unnamed source.
pub fn parse_section(source: &str) -> Result<Section, ParseError> {
    parse_named("<input>", source)
}

/// Parse a section, naming the source in diagnostics (usually a file name).
pub fn parse_named(name: &str, source: &str) -> Result<Section, ParseError> {
    let ctx = SourceContext::new(name, source);
    let pairs = SectionParser::parse(Rule::section, source).map_err(|e| syntax_error(&ctx, e))?;

    let mut reader = SectionReader::new(&ctx);
    for pair in pairs.flat_map(|p| p.into_inner()) {
        match pair.as_rule() {
            Rule::setting => reader.setting(pair)?,
            Rule::trace => reader.trace(pair)?,
            _ => {}
        }
    }
    reader.finish()
}

fn span_of(pair: &Pair<'_, Rule>) -> SourceSpan {
    let span = pair.as_span();
    SourceSpan::from((span.start(), span.end() - span.start()))
}

fn syntax_error(ctx: &SourceContext, err: pest::error::Error<Rule>) -> ParseError {
    let span = match err.location {
        InputLocation::Pos(pos) => (pos, usize::from(pos < ctx.source.len())),
        InputLocation::Span((start, end)) => (start, end - start),
    };
    ParseError::Syntax {
        message: err.variant.message().into_owned(),
        src: ctx.named_source(),
        span: span.into(),
    }
}

/// Accumulates settings and traces while walking the parse tree
struct SectionReader<'a> {
    ctx: &'a SourceContext,
    dt: Option<(f64, SourceSpan)>,
    t0: Option<(f64, SourceSpan)>,
    traces: Vec<Vec<f32>>,
}

impl<'a> SectionReader<'a> {
    fn new(ctx: &'a SourceContext) -> Self {
        Self {
            ctx,
            dt: None,
            t0: None,
            traces: Vec::new(),
        }
    }

    fn number(&self, pair: &Pair<'_, Rule>) -> Result<f64, ParseError> {
        let text = pair.as_str();
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(ParseError::InvalidNumber {
                text: text.to_string(),
                src: self.ctx.named_source(),
                span: span_of(pair),
            }),
        }
    }

    fn setting(&mut self, pair: Pair<'_, Rule>) -> Result<(), ParseError> {
        let span = span_of(&pair);
        let mut inner = pair.into_inner();
        let (Some(ident), Some(value)) = (inner.next(), inner.next()) else {
            return Ok(());
        };
        let name = ident.as_str();
        let value_span = span_of(&value);
        let value = self.number(&value)?;
        if name == "dt" && value <= 0.0 {
            return Err(ParseError::InvalidInterval {
                value,
                src: self.ctx.named_source(),
                span: value_span,
            });
        }

        let slot = match name {
            "dt" => &mut self.dt,
            "t0" => &mut self.t0,
            _ => {
                return Err(ParseError::UnknownSetting {
                    name: name.to_string(),
                    src: self.ctx.named_source(),
                    span: span_of(&ident),
                });
            }
        };
        if let Some((_, first)) = slot {
            return Err(ParseError::DuplicateSetting {
                name: name.to_string(),
                src: self.ctx.named_source(),
                first: *first,
                second: span,
            });
        }
        *slot = Some((value, span));
        Ok(())
    }

    fn trace(&mut self, pair: Pair<'_, Rule>) -> Result<(), ParseError> {
        let span = span_of(&pair);
        let mut samples = Vec::new();
        for number in pair.into_inner().flat_map(|p| p.into_inner()) {
            let v = self.number(&number)? as f32;
            if !v.is_finite() {
                return Err(ParseError::InvalidNumber {
                    text: number.as_str().to_string(),
                    src: self.ctx.named_source(),
                    span: span_of(&number),
                });
            }
            samples.push(v);
        }

        if let Some(first) = self.traces.first() {
            if first.len() != samples.len() {
                return Err(ParseError::RaggedTrace {
                    trace: self.traces.len(),
                    expected: first.len(),
                    found: samples.len(),
                    src: self.ctx.named_source(),
                    span,
                });
            }
        }
        self.traces.push(samples);
        Ok(())
    }

    fn finish(self) -> Result<Section, ParseError> {
        let Some((dt, _)) = self.dt else {
            return Err(ParseError::MissingInterval {
                src: self.ctx.named_source(),
                span: SourceSpan::from((0, 0)),
            });
        };
        let mut header = SectionHeader::new(dt);
        if let Some((t0, _)) = self.t0 {
            header = header.with_start_time_ms(t0);
        }
        Ok(Section::new(header, self.traces))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_settings_and_traces() {
        let input = "dt = 2000\nt0 = 100\ntrace: 0.0 0.5 -0.5 0.0\ntrace: 1 2 3 4\n";
        let section = parse_section(input).unwrap();
        assert_eq!(section.header.sample_interval_us, 2000.0);
        assert_eq!(section.header.start_time_ms, 100.0);
        assert_eq!(section.traces.len(), 2);
        assert_eq!(section.traces[0], vec![0.0, 0.5, -0.5, 0.0]);
    }

    #[test]
    fn parse_comments_and_blank_lines() {
        let input = "# header\n\ndt = 4000   # us\n\n  trace: 1e-3 -2.5E2 .5  # first\n";
        let section = parse_section(input).unwrap();
        assert_eq!(section.traces, vec![vec![0.001, -250.0, 0.5]]);
        assert_eq!(section.header.start_time_ms, 0.0);
    }

    #[test]
    fn parse_without_trailing_newline() {
        let section = parse_section("dt=1000\ntrace: 1 2").unwrap();
        assert_eq!(section.traces.len(), 1);
    }

    #[test]
    fn parse_rule_trace() {
        let result = SectionParser::parse(Rule::trace, "trace: 1 -2 3.5");
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn syntax_error_has_span() {
        let err = parse_section("dt = 4000\ntrace: 1 two 3\n").unwrap_err();
        let ParseError::Syntax { span, .. } = err else {
            panic!("expected syntax error, got {err:?}");
        };
        assert_eq!(span.offset(), 19);
    }

    #[test]
    fn unknown_setting_is_rejected() {
        let err = parse_section("dt = 4000\ngain = 2\n").unwrap_err();
        assert!(matches!(err, ParseError::UnknownSetting { ref name, .. } if name == "gain"));
    }

    #[test]
    fn duplicate_setting_is_rejected() {
        let err = parse_section("dt = 4000\ndt = 2000\n").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateSetting { .. }));
    }

    #[test]
    fn non_positive_interval_is_rejected() {
        for input in ["dt = 0\ntrace: 1 2\n", "dt = -4000\ntrace: 1 2\n"] {
            let err = parse_section(input).unwrap_err();
            let ParseError::InvalidInterval { span, .. } = err else {
                panic!("expected invalid interval, got {err:?}");
            };
            assert_eq!(span.offset(), 5);
        }
    }

    #[test]
    fn negative_start_time_is_allowed() {
        let section = parse_section("dt = 4000\nt0 = -8\ntrace: 1 2\n").unwrap();
        assert_eq!(section.header.start_time_ms, -8.0);
    }

    #[test]
    fn missing_interval_is_rejected() {
        let err = parse_section("trace: 1 2 3\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingInterval { .. }));
    }

    #[test]
    fn ragged_trace_is_rejected() {
        let err = parse_section("dt = 4000\ntrace: 1 2 3\ntrace: 1 2\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::RaggedTrace {
                trace: 1,
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn overflowing_amplitude_is_rejected() {
        let err = parse_section("dt = 4000\ntrace: 1 1e300\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { ref text, .. } if text == "1e300"));
    }
}
