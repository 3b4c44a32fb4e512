//! Rexref Rules
//!
//! Finds regular expressions in host source calls, runs the built-in regex
//! checks on them and reports diagnostics on the source text the regex was
//! written in.

pub mod builtin;
pub mod dispatch;
pub mod engine;
pub mod signatures;

// Re-export commonly used types
pub use builtin::BuiltinChecks;
pub use dispatch::{CALL_SITE_MESSAGE, CheckDispatcher, EnabledCheck};
pub use engine::{FileReport, RegexEngine};
pub use signatures::{PatternSource, Receiver, Signature, SignatureRegistry};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
