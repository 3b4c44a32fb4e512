//! Regex syntax errors

use rexref_core::check::{RegexCheck, RegexIssueReporter};
use rexref_core::{RegexParseResult, Severity};

pub const RULE_ID: &str = "regex/syntax-error";

pub const MESSAGE: &str = "Fix the syntax error inside this regex.";

/// Forwards the regex parser's own diagnostic
pub struct SyntaxErrorCheck;

impl RegexCheck for SyntaxErrorCheck {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Regular expressions should be syntactically valid"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, regex: &RegexParseResult, reporter: &mut RegexIssueReporter<'_>) {
        let Some(error) = regex.syntax_error() else {
            return;
        };
        let detail = reporter.secondary_range(error.span.clone(), Some(error.message.clone()));
        reporter.report_range(error.span.clone(), MESSAGE, vec![detail], None);
    }
}
