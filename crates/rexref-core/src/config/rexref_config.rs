//! Configuration types for rexref

use crate::cache::CacheKeying;
use crate::diagnostics::Severity;
use crate::error::RexrefError;
use crate::result::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default maximum for `regex/complexity`
pub const DEFAULT_COMPLEXITY_MAX: u32 = 20;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RexrefConfig {
    /// JSON schema reference
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[schemars(description = "Check severities and options")]
    pub rules: Option<RulesConfiguration>,

    #[schemars(description = "Additional call signatures that take a regex")]
    pub signatures: Option<Vec<SignatureConfiguration>>,

    #[schemars(description = "Per-file regex cache settings")]
    pub cache: Option<CacheConfiguration>,

    /// Worker threads for file analysis; absent uses the rayon default
    #[schemars(description = "Number of worker threads")]
    pub threads: Option<usize>,
}

/// Rules configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RulesConfiguration {
    /// Severity per check id, `off` disables the check
    #[schemars(description = "Severity per check id")]
    pub levels: Option<HashMap<String, RuleSeverity>>,

    #[schemars(description = "Options for regex/complexity")]
    pub complexity: Option<ComplexityOptions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityOptions {
    /// Highest score accepted without an issue
    pub max: Option<u32>,
}

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    Info,
    Warn,
    Error,
}

impl RuleSeverity {
    /// Diagnostic severity, `None` when the rule is off
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Off => None,
            RuleSeverity::Info => Some(Severity::Info),
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Error => Some(Severity::Error),
        }
    }
}

/// A call shape whose argument is a regex
///
/// ```toml
/// [[signatures]]
/// name = "compileRegex"
/// patternArgument = 0
/// flagsArgument = 1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignatureConfiguration {
    /// Called function or method name
    pub name: String,

    /// Receiver qualifier (`Pattern`), or `string` for methods on a string
    /// value; absent for plain function calls
    pub receiver: Option<String>,

    /// Argument holding the pattern; absent when the receiver is the pattern
    pub pattern_argument: Option<usize>,

    /// Argument holding the flags
    pub flags_argument: Option<usize>,

    pub min_arguments: Option<usize>,
    pub max_arguments: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfiguration {
    #[schemars(description = "Cache key: `text` or `identity`")]
    pub keying: Option<CacheKeying>,
}

impl RexrefConfig {
    /// Load configuration from a TOML or JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RexrefError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(RexrefError::config_error(format!(
                "Unsupported file extension for '{}' (expected .toml or .json)",
                path.display()
            ))),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| RexrefError::config_error(e.to_string()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| RexrefError::config_error(e.to_string()))
    }

    /// Effective severity of a check, `None` when disabled
    pub fn rule_severity(&self, rule_id: &str, default: Severity) -> Option<Severity> {
        self.rules
            .as_ref()
            .and_then(|rules| rules.levels.as_ref())
            .and_then(|levels| levels.get(rule_id))
            .map_or(Some(default), |level| level.to_severity())
    }

    pub fn complexity_max(&self) -> u32 {
        self.rules
            .as_ref()
            .and_then(|rules| rules.complexity.as_ref())
            .and_then(|complexity| complexity.max)
            .unwrap_or(DEFAULT_COMPLEXITY_MAX)
    }

    pub fn cache_keying(&self) -> CacheKeying {
        self.cache
            .as_ref()
            .and_then(|cache| cache.keying)
            .unwrap_or_default()
    }

    pub fn signatures(&self) -> &[SignatureConfiguration] {
        self.signatures.as_deref().unwrap_or_default()
    }

    /// JSON schema of the configuration file
    pub fn json_schema() -> Result<String> {
        let schema = schemars::schema_for!(RexrefConfig);
        serde_json::to_string_pretty(&schema)
            .map_err(|e| RexrefError::internal_error(format!("Failed to render schema: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_severity_serialization() {
        let json = serde_json::to_string(&RuleSeverity::Warn).unwrap();
        assert_eq!(json, r#""warn""#);
        assert_eq!(RuleSeverity::Off.to_severity(), None);
    }

    #[test]
    fn test_defaults() {
        let config = RexrefConfig::default();
        assert_eq!(config.complexity_max(), DEFAULT_COMPLEXITY_MAX);
        assert_eq!(config.cache_keying(), CacheKeying::Text);
        assert!(config.signatures().is_empty());
        assert_eq!(
            config.rule_severity("regex/empty-group", Severity::Warning),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn test_toml_configuration() {
        let config = RexrefConfig::from_toml(
            r#"
threads = 2

[rules.levels]
"regex/empty-group" = "off"
"regex/complexity" = "error"

[rules.complexity]
max = 8

[cache]
keying = "identity"

[[signatures]]
name = "compileRegex"
patternArgument = 0
flagsArgument = 1
"#,
        )
        .unwrap();

        assert_eq!(config.threads, Some(2));
        assert_eq!(config.rule_severity("regex/empty-group", Severity::Warning), None);
        assert_eq!(
            config.rule_severity("regex/complexity", Severity::Warning),
            Some(Severity::Error)
        );
        assert_eq!(config.complexity_max(), 8);
        assert_eq!(config.cache_keying(), CacheKeying::Identity);
        assert_eq!(config.signatures()[0].name, "compileRegex");
        assert_eq!(config.signatures()[0].flags_argument, Some(1));
    }

    #[test]
    fn test_json_configuration() {
        let config = RexrefConfig::from_json(
            r#"{ "rules": { "levels": { "regex/syntax-error": "info" } }, "cache": { "keying": "text" } }"#,
        )
        .unwrap();
        assert_eq!(
            config.rule_severity("regex/syntax-error", Severity::Error),
            Some(Severity::Info)
        );
    }

    #[test]
    fn test_invalid_configuration_is_config_error() {
        let err = RexrefConfig::from_toml("threads = \"many\"").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }

    #[test]
    fn test_schema_mentions_sections() {
        let schema = RexrefConfig::json_schema().unwrap();
        assert!(schema.contains("signatures"));
        assert!(schema.contains("keying"));
    }
}
