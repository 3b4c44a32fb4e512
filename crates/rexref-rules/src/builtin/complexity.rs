//! Regex complexity
//!
//! Scores a regex the way cognitive complexity scores code: every `|`,
//! every repetition operator, every bracketed class and every inline flag
//! group costs one, and alternations and repetitions nested inside other
//! alternations or repetitions cost one more per level. Each contribution
//! becomes a secondary location of the issue.

use regex_syntax::ast::{self, Ast, GroupKind, Visitor};
use rexref_core::RegexParseResult;
use rexref_core::check::{RegexCheck, RegexIssueReporter};
use rexref_core::config::DEFAULT_COMPLEXITY_MAX;
use std::convert::Infallible;
use std::ops::Range;

pub const RULE_ID: &str = "regex/complexity";

pub struct ComplexityCheck {
    max: u32,
}

impl ComplexityCheck {
    pub fn new(max: u32) -> Self {
        Self { max }
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

impl Default for ComplexityCheck {
    fn default() -> Self {
        Self::new(DEFAULT_COMPLEXITY_MAX)
    }
}

impl RegexCheck for ComplexityCheck {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Regular expressions should not be too complicated"
    }

    fn check(&self, regex: &RegexParseResult, reporter: &mut RegexIssueReporter<'_>) {
        let Some(tree) = regex.ast() else {
            return;
        };
        let scorer = Scorer {
            pattern: regex.source().pattern(),
            nesting: 0,
            contributions: Vec::new(),
        };
        let contributions = ast::visit(tree, scorer).unwrap_or_default();
        let score: u32 = contributions.iter().map(|c| c.points).sum();
        if score <= self.max {
            return;
        }

        let secondaries = contributions
            .into_iter()
            .map(|c| {
                let message = c.message();
                reporter.secondary_range(c.range, Some(message))
            })
            .collect();
        reporter.report_with(
            tree.span(),
            format!(
                "Simplify this regular expression to reduce its complexity from {score} to the {} allowed.",
                self.max
            ),
            secondaries,
            Some(f64::from(score - self.max)),
        );
    }
}

struct Contribution {
    range: Range<usize>,
    points: u32,
    nesting: u32,
}

impl Contribution {
    fn message(&self) -> String {
        if self.nesting == 0 {
            format!("+{}", self.points)
        } else {
            format!("+{} (incl {} for nesting)", self.points, self.nesting)
        }
    }
}

struct Scorer<'p> {
    pattern: &'p str,
    nesting: u32,
    contributions: Vec<Contribution>,
}

impl Scorer<'_> {
    fn nested(&mut self, range: Range<usize>) {
        self.contributions.push(Contribution {
            range,
            points: 1 + self.nesting,
            nesting: self.nesting,
        });
    }

    fn flat(&mut self, range: Range<usize>) {
        self.contributions.push(Contribution {
            range,
            points: 1,
            nesting: 0,
        });
    }

    /// Offset of the `|` between two branches
    fn pipe_between(&self, left_end: usize, right_start: usize) -> Range<usize> {
        let gap = self.pattern.get(left_end..right_start).unwrap_or_default();
        let offset = gap.find('|').map_or(left_end, |found| left_end + found);
        offset..offset + 1
    }
}

impl Visitor for Scorer<'_> {
    type Output = Vec<Contribution>;
    type Err = Infallible;

    fn finish(self) -> Result<Vec<Contribution>, Infallible> {
        Ok(self.contributions)
    }

    fn visit_pre(&mut self, ast: &Ast) -> Result<(), Infallible> {
        match ast {
            Ast::Alternation(alternation) => {
                for pair in alternation.asts.windows(2) {
                    let pipe =
                        self.pipe_between(pair[0].span().end.offset, pair[1].span().start.offset);
                    self.nested(pipe);
                }
                self.nesting += 1;
            }
            Ast::Repetition(repetition) => {
                let op = &repetition.op.span;
                self.nested(op.start.offset..op.end.offset);
                self.nesting += 1;
            }
            Ast::ClassBracketed(class) => {
                self.flat(class.span.start.offset..class.span.end.offset);
            }
            Ast::Flags(flags) => {
                self.flat(flags.span.start.offset..flags.span.end.offset);
            }
            Ast::Group(group) => {
                if let GroupKind::NonCapturing(flags) = &group.kind
                    && !flags.items.is_empty()
                {
                    self.flat(flags.span.start.offset..flags.span.end.offset);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn visit_post(&mut self, ast: &Ast) -> Result<(), Infallible> {
        if matches!(ast, Ast::Alternation(_) | Ast::Repetition(_)) {
            self.nesting -= 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::run_check;
    use rexref_core::RegexFlags;

    const PATTERN: &str = "(a|b)*c+(d|e|f)?";

    #[test]
    fn test_score_and_gap() {
        let issues = run_check(&ComplexityCheck::new(5), PATTERN, RegexFlags::NONE);
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(
            issue.message,
            "Simplify this regular expression to reduce its complexity from 9 to the 5 allowed."
        );
        assert_eq!(issue.gap, Some(4.0));
        assert_eq!(issue.range, 0..PATTERN.len());
    }

    #[test]
    fn test_contributions_are_secondaries() {
        let issues = run_check(&ComplexityCheck::new(0), PATTERN, RegexFlags::NONE);
        let secondaries: Vec<(&str, &str)> = issues[0]
            .secondaries
            .iter()
            .map(|s| (&PATTERN[s.range.clone()], s.message.as_deref().unwrap()))
            .collect();
        assert_eq!(
            secondaries,
            vec![
                ("*", "+1"),
                ("|", "+2 (incl 1 for nesting)"),
                ("+", "+1"),
                ("?", "+1"),
                ("|", "+2 (incl 1 for nesting)"),
                ("|", "+2 (incl 1 for nesting)"),
            ]
        );
    }

    #[test]
    fn test_classes_and_flags() {
        let issues = run_check(&ComplexityCheck::new(1), "(?i)[a-z](?s:.)", RegexFlags::NONE);
        assert_eq!(issues[0].gap, Some(2.0));
    }

    #[test]
    fn test_within_limit() {
        assert!(run_check(&ComplexityCheck::default(), PATTERN, RegexFlags::NONE).is_empty());
        assert!(run_check(&ComplexityCheck::new(9), PATTERN, RegexFlags::NONE).is_empty());
    }
}
