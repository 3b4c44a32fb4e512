//! Alternations of single characters
//!
//! `a|b|c` is better written as the class `[abc]`.

use regex_syntax::ast::{self, Ast, Span, Visitor};
use rexref_core::RegexParseResult;
use rexref_core::check::{RegexCheck, RegexIssueReporter};
use std::convert::Infallible;

pub const RULE_ID: &str = "regex/single-char-alternation";

pub const MESSAGE: &str = "Replace this alternation with a character class.";

pub struct SingleCharAlternationCheck;

impl RegexCheck for SingleCharAlternationCheck {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Single-character alternations should be replaced with character classes"
    }

    fn check(&self, regex: &RegexParseResult, reporter: &mut RegexIssueReporter<'_>) {
        let Some(tree) = regex.ast() else {
            return;
        };
        for span in ast::visit(tree, SingleCharAlternations::default()).unwrap_or_default() {
            reporter.report(&span, MESSAGE);
        }
    }
}

#[derive(Default)]
struct SingleCharAlternations {
    spans: Vec<Span>,
}

impl Visitor for SingleCharAlternations {
    type Output = Vec<Span>;
    type Err = Infallible;

    fn finish(self) -> Result<Vec<Span>, Infallible> {
        Ok(self.spans)
    }

    fn visit_pre(&mut self, ast: &Ast) -> Result<(), Infallible> {
        if let Ast::Alternation(alternation) = ast
            && alternation.asts.len() > 1
            && alternation
                .asts
                .iter()
                .all(|branch| matches!(branch, Ast::Literal(_)))
        {
            self.spans.push(alternation.span);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::reported_texts;

    #[test]
    fn test_single_character_branches() {
        assert_eq!(
            reported_texts(&SingleCharAlternationCheck, "a|b|c"),
            vec!["a|b|c"]
        );
        assert_eq!(
            reported_texts(&SingleCharAlternationCheck, "x(1|2)y"),
            vec!["1|2"]
        );
        assert_eq!(
            reported_texts(&SingleCharAlternationCheck, "(\\.|-)"),
            vec!["\\.|-"]
        );
    }

    #[test]
    fn test_longer_branches_are_fine() {
        assert!(reported_texts(&SingleCharAlternationCheck, "ab|c").is_empty());
        assert!(reported_texts(&SingleCharAlternationCheck, "a|[bc]").is_empty());
        assert!(reported_texts(&SingleCharAlternationCheck, "a|").is_empty());
    }
}
