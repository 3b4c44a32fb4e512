//! Configuration for rexref
//!
//! Configuration lives in `.rexref.toml`, `rexref.toml` or `rexref.json`,
//! discovered by walking up from the analysed directory.
//!
//! ```toml
//! threads = 4
//!
//! [rules.levels]
//! "regex/empty-group" = "off"
//! "regex/complexity" = "error"
//!
//! [rules.complexity]
//! max = 15
//!
//! [cache]
//! keying = "text"
//!
//! [[signatures]]
//! name = "compileRegex"
//! patternArgument = 0
//! ```

pub mod loader;
pub mod rexref_config;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use rexref_config::{
    CacheConfiguration, ComplexityOptions, DEFAULT_COMPLEXITY_MAX, RexrefConfig, RuleSeverity,
    RulesConfiguration, SignatureConfiguration,
};
