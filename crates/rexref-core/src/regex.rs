//! Regex dialect parser seam
//!
//! The default dialect is the `regex-syntax` AST parser. A parse never fails
//! the host analysis: syntax errors are kept in the result for checks to
//! report.

use crate::flags::RegexFlags;
use crate::source::RegexSource;
use regex_syntax::ast::Ast;
use regex_syntax::ast::parse::ParserBuilder;
use std::ops::Range;

/// Syntax error reported by the regex parser, in pattern byte offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexSyntaxError {
    pub message: String,
    pub span: Range<usize>,
}

/// A parsed regex together with the source it was parsed from
#[derive(Debug)]
pub struct RegexParseResult {
    source: RegexSource,
    flags: RegexFlags,
    outcome: Result<Ast, RegexSyntaxError>,
}

impl RegexParseResult {
    pub fn new(source: RegexSource, flags: RegexFlags, outcome: Result<Ast, RegexSyntaxError>) -> Self {
        Self {
            source,
            flags,
            outcome,
        }
    }

    pub fn source(&self) -> &RegexSource {
        &self.source
    }

    pub fn flags(&self) -> RegexFlags {
        self.flags
    }

    /// Parsed AST, absent when the pattern has a syntax error
    pub fn ast(&self) -> Option<&Ast> {
        self.outcome.as_ref().ok()
    }

    pub fn syntax_error(&self) -> Option<&RegexSyntaxError> {
        self.outcome.as_ref().err()
    }
}

/// Parser for one regex dialect
pub trait RegexDialectParser: Send + Sync {
    fn parse(&self, source: RegexSource, flags: RegexFlags) -> RegexParseResult;
}

/// `regex-syntax` backed parser
#[derive(Debug, Clone)]
pub struct SyntaxParser {
    nest_limit: u32,
}

impl SyntaxParser {
    pub fn new() -> Self {
        Self { nest_limit: 250 }
    }
}

impl Default for SyntaxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RegexDialectParser for SyntaxParser {
    fn parse(&self, source: RegexSource, flags: RegexFlags) -> RegexParseResult {
        let outcome = ParserBuilder::new()
            .ignore_whitespace(flags.contains(RegexFlags::COMMENTS))
            .nest_limit(self.nest_limit)
            .build()
            .parse(source.pattern())
            .map_err(|err| RegexSyntaxError {
                message: err.kind().to_string(),
                span: err.span().start.offset..err.span().end.offset,
            });
        RegexParseResult::new(source, flags, outcome)
    }
}
