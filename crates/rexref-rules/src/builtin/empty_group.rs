//! Groups with nothing inside

use regex_syntax::ast::{self, Ast, Span, Visitor};
use rexref_core::RegexParseResult;
use rexref_core::check::{RegexCheck, RegexIssueReporter};
use std::convert::Infallible;

pub const RULE_ID: &str = "regex/empty-group";

pub const MESSAGE: &str = "Remove this empty group.";

pub struct EmptyGroupCheck;

impl RegexCheck for EmptyGroupCheck {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Regular expressions should not contain empty groups"
    }

    fn check(&self, regex: &RegexParseResult, reporter: &mut RegexIssueReporter<'_>) {
        let Some(tree) = regex.ast() else {
            return;
        };
        for span in ast::visit(tree, EmptyGroups::default()).unwrap_or_default() {
            reporter.report(&span, MESSAGE);
        }
    }
}

#[derive(Default)]
struct EmptyGroups {
    spans: Vec<Span>,
}

impl Visitor for EmptyGroups {
    type Output = Vec<Span>;
    type Err = Infallible;

    fn finish(self) -> Result<Vec<Span>, Infallible> {
        Ok(self.spans)
    }

    fn visit_pre(&mut self, ast: &Ast) -> Result<(), Infallible> {
        if let Ast::Group(group) = ast
            && matches_nothing(&group.ast)
        {
            self.spans.push(group.span);
        }
        Ok(())
    }
}

/// `()` or `(|)`: a body that can only match the empty string
fn matches_nothing(ast: &Ast) -> bool {
    match ast {
        Ast::Empty(_) => true,
        Ast::Alternation(alternation) => alternation.asts.iter().all(matches_nothing),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::reported_texts;

    #[test]
    fn test_empty_groups() {
        assert_eq!(reported_texts(&EmptyGroupCheck, "a()b"), vec!["()"]);
        assert_eq!(reported_texts(&EmptyGroupCheck, "(?:)"), vec!["(?:)"]);
        assert_eq!(reported_texts(&EmptyGroupCheck, "x(|)"), vec!["(|)"]);
    }

    #[test]
    fn test_nested_empty_group() {
        assert_eq!(reported_texts(&EmptyGroupCheck, "(a())"), vec!["()"]);
    }

    #[test]
    fn test_non_empty_groups() {
        assert!(reported_texts(&EmptyGroupCheck, "(a)(b|)").is_empty());
        assert!(reported_texts(&EmptyGroupCheck, "(?i)a").is_empty());
    }
}
