//! End-to-end tests: host source in, diagnostics on source ranges out
//!
//! This test suite covers:
//! - Reconstruction of single and concatenated literals
//! - Abandoned occurrences (templates, LITERAL flag)
//! - Flag resolution seen by checks
//! - Translation of issues that cross literal boundaries
//! - Cache sharing under both keying strategies

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rexref_core::check::{RegexCheck, RegexIssueReporter};
use rexref_core::syntax::parse_script;
use rexref_core::{
    CacheKeying, Diagnostic, RegexDialectParser, RegexFlags, RegexParseResult, RegexSource,
    RexrefConfig, Severity, SyntaxParser,
};
use rexref_rules::{CALL_SITE_MESSAGE, CheckDispatcher, EnabledCheck, RegexEngine, SignatureRegistry};

/// Delegates to the real parser and counts parses
struct CountingParser {
    parses: Arc<AtomicUsize>,
}

impl RegexDialectParser for CountingParser {
    fn parse(&self, source: RegexSource, flags: RegexFlags) -> RegexParseResult {
        self.parses.fetch_add(1, Ordering::SeqCst);
        SyntaxParser::new().parse(source, flags)
    }
}

/// Records the reconstructed string and flags of every regex it sees
struct Recorder {
    seen: Arc<Mutex<Vec<(String, RegexFlags)>>>,
}

impl RegexCheck for Recorder {
    fn id(&self) -> &'static str {
        "test/recorder"
    }

    fn description(&self) -> &'static str {
        "Records regexes"
    }

    fn check(&self, regex: &RegexParseResult, _reporter: &mut RegexIssueReporter<'_>) {
        self.seen
            .lock()
            .unwrap()
            .push((regex.source().reconstructed().to_string(), regex.flags()));
    }
}

/// Reports a fixed pattern byte interval, clamped to the pattern
struct ReportSpan {
    start: usize,
    end: usize,
}

impl RegexCheck for ReportSpan {
    fn id(&self) -> &'static str {
        "test/report-span"
    }

    fn description(&self) -> &'static str {
        "Reports a fixed interval"
    }

    fn check(&self, regex: &RegexParseResult, reporter: &mut RegexIssueReporter<'_>) {
        let len = regex.source().pattern().len();
        reporter.report_range(self.start.min(len)..self.end.min(len), "span", Vec::new(), None);
    }
}

struct Run {
    diagnostics: Vec<Diagnostic>,
    parses: usize,
    seen: Vec<(String, RegexFlags)>,
}

fn run_with(source: &str, extra: Vec<EnabledCheck>) -> Run {
    let parses = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut checks = vec![EnabledCheck::new(
        Box::new(Recorder { seen: Arc::clone(&seen) }),
        Severity::Info,
    )];
    checks.extend(extra);

    let engine = RegexEngine::new(&RexrefConfig::default())
        .unwrap()
        .with_checks(checks)
        .with_parser(Box::new(CountingParser {
            parses: Arc::clone(&parses),
        }));
    let report = engine.analyze_source(Path::new("Sample.kt"), source).unwrap();

    let seen = seen.lock().unwrap().clone();
    Run {
        diagnostics: report.diagnostics,
        parses: parses.load(Ordering::SeqCst),
        seen,
    }
}

fn run(source: &str) -> Run {
    run_with(source, Vec::new())
}

fn span_check(start: usize, end: usize) -> Vec<EnabledCheck> {
    vec![EnabledCheck::new(
        Box::new(ReportSpan { start, end }),
        Severity::Warning,
    )]
}

fn secondary_texts<'s>(diagnostic: &Diagnostic, source: &'s str) -> Vec<&'s str> {
    diagnostic
        .secondary_locations
        .iter()
        .map(|secondary| secondary.location.text(source))
        .collect()
}

#[test]
fn test_single_literal() {
    let source = r#"val re = Regex("a.b")"#;
    let run = run_with(source, span_check(0, 3));

    assert_eq!(run.seen, vec![("a.b".to_string(), RegexFlags::NONE)]);
    assert_eq!(run.diagnostics.len(), 1);
    let diagnostic = &run.diagnostics[0];
    assert_eq!(diagnostic.location.text(source), "a.b");
    assert_eq!(secondary_texts(diagnostic, source), vec!["Regex"]);
    assert_eq!(
        diagnostic.secondary_locations[0].message.as_deref(),
        Some(CALL_SITE_MESSAGE)
    );
}

#[test]
fn test_concatenated_literals() {
    let source = r#"Regex("a" + "b")"#;
    let run = run_with(source, span_check(0, 2));

    assert_eq!(run.seen[0].0, "ab");
    let diagnostic = &run.diagnostics[0];
    assert_eq!(diagnostic.location.text(source), "a");
    assert_eq!(secondary_texts(diagnostic, source), vec!["b", "Regex"]);
}

#[test]
fn test_interpolated_pattern_is_never_parsed() {
    let source = "val name = \"x\"\nRegex(\"a$name\")\nRegex(\"a${name}b\" + \"c\")";
    let run = run_with(source, span_check(0, 1));

    assert_eq!(run.parses, 0);
    assert!(run.diagnostics.is_empty());
    assert!(run.seen.is_empty());
}

#[test]
fn test_flags_reach_checks() {
    let source = r#"
        Pattern.compile("a", Pattern.CASE_INSENSITIVE or Pattern.MULTILINE)
        Pattern.compile("b", Pattern.MULTILINE or Pattern.NOT_A_FLAG)
        Regex("c", setOf(RegexOption.IGNORE_CASE, RegexOption.DOT_MATCHES_ALL))
    "#;
    let run = run(source);

    assert_eq!(
        run.seen,
        vec![
            ("a".to_string(), RegexFlags::CASE_INSENSITIVE | RegexFlags::MULTILINE),
            ("b".to_string(), RegexFlags::MULTILINE),
            ("c".to_string(), RegexFlags::CASE_INSENSITIVE | RegexFlags::DOTALL),
        ]
    );
}

#[test]
fn test_literal_flag_abandons_occurrence() {
    let source = r#"
        Regex("a|b", RegexOption.LITERAL)
        Pattern.compile("(", Pattern.LITERAL or Pattern.COMMENTS)
    "#;
    let run = run_with(source, span_check(0, 1));

    assert_eq!(run.parses, 0);
    assert!(run.diagnostics.is_empty());
}

#[test]
fn test_issue_crossing_two_literals() {
    let source = r#"Regex("ab" + "cd")"#;
    let run = run_with(source, span_check(1, 3));

    let diagnostic = &run.diagnostics[0];
    assert_eq!(diagnostic.location.text(source), "b");
    assert_eq!(secondary_texts(diagnostic, source), vec!["c", "Regex"]);
    assert_eq!(diagnostic.secondary_locations[0].message, None);
}

#[test]
fn test_escaped_backslash_maps_to_source_spelling() {
    let source = r#"val re = "\\d+" + "x"
Pattern.compile(re)"#;
    let run = run_with(source, span_check(0, 2));

    assert_eq!(run.seen[0].0, "\\\\d+x");
    let diagnostic = &run.diagnostics[0];
    assert_eq!(diagnostic.location.text(source), "\\\\d");
    assert_eq!(secondary_texts(diagnostic, source), vec!["compile"]);
}

#[test]
fn test_raw_string_backslash() {
    let source = "\"\"\"\\w+\"\"\".toRegex()";
    let run = run_with(source, span_check(0, 2));

    assert_eq!(run.seen[0].0, "\\\\w+");
    assert_eq!(run.diagnostics[0].location.text(source), "\\w");
}

#[test]
fn test_builtin_check_across_literals() {
    let source = "val sep = Regex(\"a|\" + \"b\")";
    let engine = RegexEngine::new(&RexrefConfig::default()).unwrap();
    let report = engine.analyze_source(Path::new("Sep.kt"), source).unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.rule_id, "regex/single-char-alternation");
    assert_eq!(diagnostic.severity, Severity::Warning);
    assert_eq!(diagnostic.location.text(source), "a|");
    assert_eq!(secondary_texts(diagnostic, source), vec!["b", "Regex"]);
}

#[test]
fn test_zero_width_issue_falls_back_to_callee() {
    let source = r#"Regex("abc")"#;
    let run = run_with(source, span_check(3, 3));

    let diagnostic = &run.diagnostics[0];
    assert_eq!(diagnostic.location.text(source), "Regex");
    assert_eq!(secondary_texts(diagnostic, source), vec!["Regex"]);
}

fn dispatch_parses(source: &str, keying: CacheKeying, repeat_first_call: bool) -> usize {
    let script = parse_script(source).unwrap();
    let registry = SignatureRegistry::builtin();
    let parses = Arc::new(AtomicUsize::new(0));
    let parser = CountingParser {
        parses: Arc::clone(&parses),
    };
    let checks: Vec<EnabledCheck> = Vec::new();
    let file = Path::new("Cache.kt");
    let mut dispatcher =
        CheckDispatcher::new(file, source, &script, &registry, &checks, &parser, keying);

    let mut diagnostics = Vec::new();
    let calls = script.calls();
    if repeat_first_call {
        dispatcher.dispatch(calls[0], &mut diagnostics);
        dispatcher.dispatch(calls[0], &mut diagnostics);
    } else {
        dispatcher.dispatch_all(&script, &mut diagnostics);
    }
    parses.load(Ordering::SeqCst)
}

#[test]
fn test_same_occurrence_parses_once() {
    let source = r#"Regex("x+")"#;
    assert_eq!(dispatch_parses(source, CacheKeying::Identity, true), 1);
    assert_eq!(dispatch_parses(source, CacheKeying::Text, true), 1);
}

#[test]
fn test_identical_patterns_at_two_sites() {
    let source = "Regex(\"x+\")\nRegex(\"x+\")";
    assert_eq!(dispatch_parses(source, CacheKeying::Identity, false), 2);
    assert_eq!(dispatch_parses(source, CacheKeying::Text, false), 1);
}

#[test]
fn test_same_text_different_flags_parses_twice() {
    let source = "Regex(\"x+\")\nRegex(\"x+\", RegexOption.IGNORE_CASE)";
    assert_eq!(dispatch_parses(source, CacheKeying::Text, false), 2);
}
