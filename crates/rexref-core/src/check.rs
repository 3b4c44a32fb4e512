//! Regex check contract
//!
//! Checks inspect a parsed regex and report issues in pattern offsets. The
//! reporter converts those to reconstructed-string intervals; mapping them
//! onto host source ranges happens in the dispatcher.

use crate::diagnostics::Severity;
use crate::regex::RegexParseResult;
use crate::source::RegexSource;
use regex_syntax::ast::Span;
use std::ops::Range;

/// A check run on every regex found in the host source
pub trait RegexCheck: Send + Sync {
    /// Stable identifier, e.g. `regex/empty-group`
    fn id(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, regex: &RegexParseResult, reporter: &mut RegexIssueReporter<'_>);
}

/// Secondary location of a reported issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexSecondary {
    /// Interval in the reconstructed string
    pub range: Range<usize>,
    pub message: Option<String>,
}

/// An issue expressed in reconstructed-string intervals
#[derive(Debug, Clone, PartialEq)]
pub struct ReportedIssue {
    pub rule_id: &'static str,
    pub range: Range<usize>,
    pub message: String,
    pub secondaries: Vec<RegexSecondary>,
    pub gap: Option<f64>,
}

/// Collects the issues of one check run on one regex
pub struct RegexIssueReporter<'a> {
    rule_id: &'static str,
    source: &'a RegexSource,
    issues: Vec<ReportedIssue>,
}

impl<'a> RegexIssueReporter<'a> {
    pub fn new(rule_id: &'static str, source: &'a RegexSource) -> Self {
        Self {
            rule_id,
            source,
            issues: Vec::new(),
        }
    }

    pub fn source(&self) -> &'a RegexSource {
        self.source
    }

    /// Secondary location for a pattern span
    pub fn secondary(&self, span: &Span, message: Option<String>) -> RegexSecondary {
        self.secondary_range(pattern_range(span), message)
    }

    /// Secondary location for a raw pattern byte interval
    pub fn secondary_range(&self, span: Range<usize>, message: Option<String>) -> RegexSecondary {
        RegexSecondary {
            range: self.source.to_reconstructed(span),
            message,
        }
    }

    pub fn report(&mut self, span: &Span, message: impl Into<String>) {
        self.report_with(span, message, Vec::new(), None);
    }

    pub fn report_with(
        &mut self,
        span: &Span,
        message: impl Into<String>,
        secondaries: Vec<RegexSecondary>,
        gap: Option<f64>,
    ) {
        self.report_range(pattern_range(span), message, secondaries, gap);
    }

    /// Report on a raw pattern byte interval
    pub fn report_range(
        &mut self,
        span: Range<usize>,
        message: impl Into<String>,
        secondaries: Vec<RegexSecondary>,
        gap: Option<f64>,
    ) {
        let range = self.source.to_reconstructed(span);
        tracing::trace!(rule = self.rule_id, ?range, "regex issue");
        self.issues.push(ReportedIssue {
            rule_id: self.rule_id,
            range,
            message: message.into(),
            secondaries,
            gap,
        });
    }

    pub fn issues(&self) -> &[ReportedIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<ReportedIssue> {
        self.issues
    }
}

fn pattern_range(span: &Span) -> Range<usize> {
    span.start.offset..span.end.offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragments::SourceFragment;
    use biome_text_size::{TextRange, TextSize};
    use regex_syntax::ast::Position;

    fn span(start: usize, end: usize) -> Span {
        Span::new(Position::new(start, 1, start + 1), Position::new(end, 1, end + 1))
    }

    #[test]
    fn test_reporter_converts_pattern_spans() {
        // "\\d|x" in source, pattern is \d|x
        let range = |s: u32, e: u32| TextRange::new(TextSize::from(s), TextSize::from(e));
        let source = RegexSource::from_fragments(&[
            SourceFragment::backslash("\\\\", range(1, 3)),
            SourceFragment::new("d|x", range(3, 6)),
        ]);
        let mut reporter = RegexIssueReporter::new("regex/test", &source);
        let secondary = reporter.secondary(&span(3, 4), Some("here".to_string()));
        reporter.report_with(&span(0, 2), "message", vec![secondary], Some(1.0));

        let issues = reporter.into_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule_id, "regex/test");
        assert_eq!(issues[0].range, 0..3);
        assert_eq!(issues[0].secondaries[0].range, 4..5);
        assert_eq!(issues[0].gap, Some(1.0));
    }
}
