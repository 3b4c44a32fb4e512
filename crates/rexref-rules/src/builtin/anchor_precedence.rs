//! Anchors in top-level alternations
//!
//! In `^a|b|c$` the anchors bind to the first and last branch only, which
//! is rarely what was meant.

use regex_syntax::ast::{Alternation, Ast, AssertionKind};
use rexref_core::RegexParseResult;
use rexref_core::check::{RegexCheck, RegexIssueReporter};

pub const RULE_ID: &str = "regex/anchor-precedence";

pub const MESSAGE: &str =
    "Group parts of the regex together to make the intended operator precedence explicit.";

pub struct AnchorPrecedenceCheck;

impl RegexCheck for AnchorPrecedenceCheck {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Alternatives in regular expressions should be grouped when used with anchors"
    }

    fn check(&self, regex: &RegexParseResult, reporter: &mut RegexIssueReporter<'_>) {
        if let Some(Ast::Alternation(alternation)) = regex.ast()
            && has_ambiguous_anchors(alternation)
        {
            reporter.report(&alternation.span, MESSAGE);
        }
    }
}

fn has_ambiguous_anchors(alternation: &Alternation) -> bool {
    let branches = &alternation.asts;
    let (Some(first), Some(last)) = (branches.first(), branches.last()) else {
        return false;
    };
    if branches.len() < 2 {
        return false;
    }
    let start_only_on_first =
        starts_anchored(first) && branches[1..].iter().any(|branch| !starts_anchored(branch));
    let end_only_on_last = ends_anchored(last)
        && branches[..branches.len() - 1]
            .iter()
            .any(|branch| !ends_anchored(branch));
    start_only_on_first || end_only_on_last
}

fn starts_anchored(ast: &Ast) -> bool {
    match ast {
        Ast::Assertion(assertion) => matches!(
            assertion.kind,
            AssertionKind::StartLine | AssertionKind::StartText
        ),
        Ast::Concat(concat) => concat.asts.first().is_some_and(starts_anchored),
        _ => false,
    }
}

fn ends_anchored(ast: &Ast) -> bool {
    match ast {
        Ast::Assertion(assertion) => matches!(
            assertion.kind,
            AssertionKind::EndLine | AssertionKind::EndText
        ),
        Ast::Concat(concat) => concat.asts.last().is_some_and(ends_anchored),
        _ => false,
    }
}
