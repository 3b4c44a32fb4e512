//! Duplicate characters in character classes
//!
//! Detects class items that are already covered by an earlier item of the
//! same class: repeated characters (`[aa]`), characters inside an earlier
//! range (`[a-za]`) and overlapping ranges (`[0-50-9]`). Under
//! case-insensitive matching, ASCII letters fold together.

use regex_syntax::ast::{self, Ast, ClassBracketed, ClassSet, ClassSetItem, Span, Visitor};
use rexref_core::check::{RegexCheck, RegexIssueReporter};
use rexref_core::{RegexFlags, RegexParseResult};
use std::convert::Infallible;
use std::ops::RangeInclusive;

pub const RULE_ID: &str = "regex/duplicate-class-chars";

pub const MESSAGE: &str = "Remove duplicates in this character class.";

pub const DUPLICATE_MESSAGE: &str = "Additional duplicate";

pub struct DuplicateClassCharsCheck;

impl RegexCheck for DuplicateClassCharsCheck {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Character classes should not contain the same character twice"
    }

    fn check(&self, regex: &RegexParseResult, reporter: &mut RegexIssueReporter<'_>) {
        let Some(tree) = regex.ast() else {
            return;
        };
        let finder = DuplicateFinder {
            case_insensitive: regex.flags().contains(RegexFlags::CASE_INSENSITIVE),
            findings: Vec::new(),
        };
        for (class, duplicates) in ast::visit(tree, finder).unwrap_or_default() {
            let secondaries = duplicates
                .iter()
                .map(|span| reporter.secondary(span, Some(DUPLICATE_MESSAGE.to_string())))
                .collect();
            reporter.report_with(&class, MESSAGE, secondaries, None);
        }
    }
}

/// A class span and the spans of its duplicate items
type Finding = (Span, Vec<Span>);

struct DuplicateFinder {
    case_insensitive: bool,
    findings: Vec<Finding>,
}

impl DuplicateFinder {
    fn inspect(&mut self, class: &ClassBracketed) {
        let ClassSet::Item(item) = &class.kind else {
            return;
        };
        let items: &[ClassSetItem] = match item {
            ClassSetItem::Union(union) => &union.items,
            single => std::slice::from_ref(single),
        };

        let mut seen: Vec<RangeInclusive<char>> = Vec::new();
        let mut duplicates = Vec::new();
        for item in items {
            let Some(chars) = self.char_range(item) else {
                continue;
            };
            if seen.iter().any(|earlier| overlaps(earlier, &chars)) {
                duplicates.push(*item.span());
            }
            seen.push(chars);
        }

        if !duplicates.is_empty() {
            self.findings.push((class.span, duplicates));
        }
    }

    /// Characters matched by a literal or range item
    fn char_range(&self, item: &ClassSetItem) -> Option<RangeInclusive<char>> {
        let (start, end) = match item {
            ClassSetItem::Literal(literal) => (literal.c, literal.c),
            ClassSetItem::Range(range) => (range.start.c, range.end.c),
            _ => return None,
        };
        if self.case_insensitive && start.is_ascii_alphabetic() && end.is_ascii_alphabetic() {
            let (start, end) = (start.to_ascii_lowercase(), end.to_ascii_lowercase());
            if start <= end {
                return Some(start..=end);
            }
        }
        Some(start..=end)
    }
}

impl Visitor for DuplicateFinder {
    type Output = Vec<Finding>;
    type Err = Infallible;

    fn finish(self) -> Result<Vec<Finding>, Infallible> {
        Ok(self.findings)
    }

    fn visit_pre(&mut self, ast: &Ast) -> Result<(), Infallible> {
        if let Ast::ClassBracketed(class) = ast {
            self.inspect(class);
        }
        Ok(())
    }

    fn visit_class_set_item_pre(&mut self, item: &ClassSetItem) -> Result<(), Infallible> {
        if let ClassSetItem::Bracketed(class) = item {
            self.inspect(class);
        }
        Ok(())
    }
}

fn overlaps(a: &RangeInclusive<char>, b: &RangeInclusive<char>) -> bool {
    a.start() <= b.end() && b.start() <= a.end()
}
