//! Rexref Core
//!
//! Building blocks for analysing regular expressions written as string
//! literals in host source code. A regex may be split over several
//! literals joined with `+`, and may use escapes, so its characters are
//! scattered over the source file. This crate reconstructs the regex text,
//! keeps an inverse index back to source ranges, resolves flags, parses the
//! regex and lets checks report issues that land on the right source text.

pub mod cache;
pub mod check;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod flags;
pub mod fragments;
pub mod index;
pub mod regex;
pub mod result;
pub mod source;
pub mod syntax;

// Re-export commonly used types
pub use cache::{CacheKey, CacheKeying, CacheStats, RegexCache};
pub use check::{RegexCheck, RegexIssueReporter, RegexSecondary, ReportedIssue};
pub use config::{ConfigLoader, RexrefConfig, RuleSeverity, SignatureConfiguration};
pub use diagnostics::{Diagnostic, IssueSink, Location, SecondaryLocation, Severity, SourceMap};
pub use error::{ErrorKind, RexrefError};
pub use flags::{RegexFlags, resolve_flags};
pub use fragments::{ESCAPED_BACKSLASH, Reconstruction, SourceFragment, reconstruct};
pub use index::{Boundary, InverseIndex};
pub use regex::{RegexDialectParser, RegexParseResult, RegexSyntaxError, SyntaxParser};
pub use result::{Result, ResultExt};
pub use source::RegexSource;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rexref=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
