//! Per-call-site check dispatch
//!
//! For every call in a file: match it against the signature registry,
//! rebuild the pattern from its literal fragments, resolve flags, parse
//! (through the per-file cache), run the enabled checks and translate the
//! issues they report back onto source ranges.

use crate::signatures::SignatureRegistry;
use biome_text_size::TextRange;
use indexmap::IndexSet;
use rexref_core::check::{RegexCheck, RegexIssueReporter, ReportedIssue};
use rexref_core::syntax::{BinaryOp, CallExpr, Expr, ExprKind, Script, ValueScope};
use rexref_core::{
    CacheKeying, Diagnostic, InverseIndex, IssueSink, RegexCache, RegexDialectParser, RegexFlags,
    SecondaryLocation, Severity, SourceFragment, SourceMap, reconstruct, resolve_flags,
};
use std::path::Path;

/// Message of the secondary location placed on the callee of every issue
pub const CALL_SITE_MESSAGE: &str =
    "Function call whose argument is interpreted as a regular expression.";

/// Concatenation depth at which a pattern expression is abandoned
const MAX_CONCAT_DEPTH: usize = 64;

/// Expression nodes a pattern may expand to before it is abandoned
const MAX_CONCAT_NODES: usize = 4096;

/// A check together with the severity it reports at
pub struct EnabledCheck {
    pub check: Box<dyn RegexCheck>,
    pub severity: Severity,
}

impl EnabledCheck {
    pub fn new(check: Box<dyn RegexCheck>, severity: Severity) -> Self {
        Self { check, severity }
    }
}

/// Dispatch state for the analysis of one file
pub struct CheckDispatcher<'a> {
    file: &'a Path,
    source: &'a str,
    source_map: SourceMap,
    scope: ValueScope<'a>,
    registry: &'a SignatureRegistry,
    checks: &'a [EnabledCheck],
    parser: &'a dyn RegexDialectParser,
    cache: RegexCache,
}

impl<'a> CheckDispatcher<'a> {
    pub fn new(
        file: &'a Path,
        source: &'a str,
        script: &'a Script,
        registry: &'a SignatureRegistry,
        checks: &'a [EnabledCheck],
        parser: &'a dyn RegexDialectParser,
        keying: CacheKeying,
    ) -> Self {
        Self {
            file,
            source,
            source_map: SourceMap::new(source),
            scope: ValueScope::from_script(script),
            registry,
            checks,
            parser,
            cache: RegexCache::new(keying),
        }
    }

    pub fn cache(&self) -> &RegexCache {
        &self.cache
    }

    /// Analyse every call of the script, in source order
    pub fn dispatch_all(&mut self, script: &'a Script, sink: &mut dyn IssueSink) {
        for call in script.calls() {
            self.dispatch(call, sink);
        }
    }

    /// Analyse one call site; calls that cannot be analysed are skipped silently
    pub fn dispatch(&mut self, call: &'a CallExpr, sink: &mut dyn IssueSink) {
        let Some(signature) = self.registry.match_call(call) else {
            return;
        };
        let Some(pattern) = signature.pattern_expr(call) else {
            return;
        };
        let Some(fragments) = self.flatten(pattern) else {
            return;
        };
        if fragments.is_empty() {
            return;
        }
        let flags = resolve_flags(signature.flags_expr(call), &self.scope);
        if flags.contains(RegexFlags::LITERAL) {
            return;
        }

        let result = self.cache.get_or_parse(&fragments, flags, self.parser);

        // A text-keyed hit may come from another call site with the same
        // pattern; offsets agree but the source ranges are this site's own.
        let own_index;
        let index = if same_sites(result.source().index(), &fragments) {
            result.source().index()
        } else {
            own_index = reconstruct(&fragments).index;
            &own_index
        };

        for enabled in self.checks {
            let mut reporter = RegexIssueReporter::new(enabled.check.id(), result.source());
            enabled.check.check(&result, &mut reporter);
            for issue in reporter.into_issues() {
                let diagnostic = self.translate(issue, index, call, enabled.severity);
                sink.report_issue(diagnostic);
            }
        }
    }

    /// Literal fragments of a pattern expression, depth-first and left to right
    ///
    /// Returns None when any leaf is not a template-free string literal, or
    /// when bindings expand the expression past the depth or node limits.
    fn flatten(&self, expr: &'a Expr) -> Option<Vec<SourceFragment>> {
        let mut fragments = Vec::new();
        let mut stack = vec![(expr, 0usize)];
        let mut visited = 0usize;

        while let Some((expr, depth)) = stack.pop() {
            visited += 1;
            if depth > MAX_CONCAT_DEPTH || visited > MAX_CONCAT_NODES {
                return None;
            }
            let expr = self.scope.predict(expr);
            match &expr.kind {
                ExprKind::String(literal) => fragments.extend(literal.fragments()?),
                ExprKind::Binary {
                    op: BinaryOp::Plus,
                    lhs,
                    rhs,
                } => {
                    stack.push((&**rhs, depth + 1));
                    stack.push((&**lhs, depth + 1));
                }
                _ => return None,
            }
        }

        Some(fragments)
    }

    fn translate(
        &self,
        issue: ReportedIssue,
        index: &InverseIndex,
        call: &CallExpr,
        severity: Severity,
    ) -> Diagnostic {
        let callee = call.callee_token_range();
        let mut primary_ranges = index
            .text_ranges_between(issue.range.start, issue.range.end)
            .into_iter();
        let primary = primary_ranges.next().unwrap_or(callee);

        let mut secondaries: IndexSet<(TextRange, Option<String>)> = IndexSet::new();
        for secondary in issue.secondaries {
            for range in index.text_ranges_between(secondary.range.start, secondary.range.end) {
                secondaries.insert((range, secondary.message.clone()));
            }
        }
        secondaries.extend(primary_ranges.map(|range| (range, None)));

        let mut diagnostic = Diagnostic::new(
            issue.rule_id,
            severity,
            issue.message,
            self.location(primary),
        )
        .with_gap(issue.gap);
        for (range, message) in secondaries {
            diagnostic =
                diagnostic.with_secondary(SecondaryLocation::new(self.location(range), message));
        }
        diagnostic.with_secondary(SecondaryLocation::new(
            self.location(callee),
            Some(CALL_SITE_MESSAGE.to_string()),
        ))
    }

    fn location(&self, range: TextRange) -> rexref_core::Location {
        self.source_map.range_to_location(range, self.source, self.file)
    }
}

/// The index was built from fragments at the same source ranges
fn same_sites(index: &InverseIndex, fragments: &[SourceFragment]) -> bool {
    index
        .boundaries()
        .iter()
        .map(|boundary| boundary.source_range)
        .eq(fragments.iter().map(|fragment| fragment.source_range))
}
