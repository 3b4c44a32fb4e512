//! Built-in regex checks

use crate::dispatch::EnabledCheck;
use rexref_core::check::RegexCheck;
use rexref_core::RexrefConfig;

pub mod anchor_precedence;
pub mod complexity;
pub mod duplicate_class_chars;
pub mod empty_group;
pub mod single_char_alternation;
pub mod syntax_error;

pub use anchor_precedence::AnchorPrecedenceCheck;
pub use complexity::ComplexityCheck;
pub use duplicate_class_chars::DuplicateClassCharsCheck;
pub use empty_group::EmptyGroupCheck;
pub use single_char_alternation::SingleCharAlternationCheck;
pub use syntax_error::SyntaxErrorCheck;

/// Collection of built-in regex checks
pub struct BuiltinChecks;

impl BuiltinChecks {
    /// Every built-in check, configured from `config`
    pub fn all(config: &RexrefConfig) -> Vec<Box<dyn RegexCheck>> {
        vec![
            Box::new(SyntaxErrorCheck),
            Box::new(EmptyGroupCheck),
            Box::new(SingleCharAlternationCheck),
            Box::new(DuplicateClassCharsCheck),
            Box::new(AnchorPrecedenceCheck),
            Box::new(ComplexityCheck::new(config.complexity_max())),
        ]
    }

    /// Built-in checks not turned off, each at its configured severity
    pub fn enabled(config: &RexrefConfig) -> Vec<EnabledCheck> {
        Self::all(config)
            .into_iter()
            .filter_map(|check| {
                let severity = config.rule_severity(check.id(), check.default_severity());
                if severity.is_none() {
                    tracing::debug!("Check {} is disabled", check.id());
                }
                severity.map(|severity| EnabledCheck::new(check, severity))
            })
            .collect()
    }

    pub fn ids() -> Vec<&'static str> {
        vec![
            syntax_error::RULE_ID,
            empty_group::RULE_ID,
            single_char_alternation::RULE_ID,
            duplicate_class_chars::RULE_ID,
            anchor_precedence::RULE_ID,
            complexity::RULE_ID,
        ]
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use biome_text_size::{TextRange, TextSize};
    use rexref_core::check::{RegexCheck, RegexIssueReporter, ReportedIssue};
    use rexref_core::{
        RegexDialectParser, RegexFlags, RegexParseResult, RegexSource, SourceFragment,
        SyntaxParser,
    };

    pub fn parse(pattern: &str, flags: RegexFlags) -> RegexParseResult {
        let range = TextRange::new(TextSize::from(0), TextSize::from(pattern.len() as u32));
        let source = RegexSource::from_fragments(&[SourceFragment::new(pattern, range)]);
        SyntaxParser::new().parse(source, flags)
    }

    /// Issues of `check` on a pattern written without escapes
    pub fn run_check(check: &dyn RegexCheck, pattern: &str, flags: RegexFlags) -> Vec<ReportedIssue> {
        let result = parse(pattern, flags);
        let mut reporter = RegexIssueReporter::new(check.id(), result.source());
        check.check(&result, &mut reporter);
        reporter.into_issues()
    }

    /// Pattern text of each reported primary location
    pub fn reported_texts(check: &dyn RegexCheck, pattern: &str) -> Vec<String> {
        run_check(check, pattern, RegexFlags::NONE)
            .into_iter()
            .map(|issue| pattern[issue.range].to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_checks_have_unique_ids() {
        let config = RexrefConfig::default();
        let ids: Vec<&str> = BuiltinChecks::all(&config).iter().map(|c| c.id()).collect();
        assert_eq!(ids, BuiltinChecks::ids());
    }

    #[test]
    fn test_disabled_checks_are_dropped() {
        let config = RexrefConfig::from_toml(
            "[rules.levels]\n\"regex/empty-group\" = \"off\"\n\"regex/complexity\" = \"info\"\n",
        )
        .unwrap();
        let enabled = BuiltinChecks::enabled(&config);
        assert_eq!(enabled.len(), BuiltinChecks::ids().len() - 1);
        assert!(enabled.iter().all(|e| e.check.id() != empty_group::RULE_ID));
        let complexity = enabled
            .iter()
            .find(|e| e.check.id() == complexity::RULE_ID)
            .unwrap();
        assert_eq!(complexity.severity, rexref_core::Severity::Info);
    }
}
