//! Call signatures that take a regular expression
//!
//! The registry is an immutable value, built once from the built-in table
//! plus any configured signatures and shared by reference across files.

use rexref_core::syntax::{CallExpr, Expr};
use rexref_core::{RexrefConfig, RexrefError, Result, SignatureConfiguration};

/// What a call is made on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    /// Unqualified call: `Regex(...)`
    None,
    /// Call qualified by a type: `Pattern.compile(...)`; a fully qualified
    /// path (`java.util.regex.Pattern`) matches on its last segment
    Type(String),
    /// Method on a string value: `"a+".toRegex()`, `input.matches(...)`
    StringValue,
}

/// Where the pattern of a matched call comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSource {
    Receiver,
    Argument(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub receiver: Receiver,
    pub pattern: PatternSource,
    /// Argument holding the flags, if the call takes any
    pub flags: Option<usize>,
    pub min_args: usize,
    pub max_args: usize,
}

impl Signature {
    fn new(
        name: &str,
        receiver: Receiver,
        pattern: PatternSource,
        flags: Option<usize>,
        min_args: usize,
        max_args: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            receiver,
            pattern,
            flags,
            min_args,
            max_args,
        }
    }

    pub fn matches(&self, call: &CallExpr) -> bool {
        if call.name() != Some(self.name.as_str()) {
            return false;
        }
        if !(self.min_args..=self.max_args).contains(&call.args.len()) {
            return false;
        }
        match (&self.receiver, call.receiver()) {
            (Receiver::None, None) => true,
            (Receiver::Type(expected), Some(receiver)) => receiver
                .dotted_path()
                .is_some_and(|path| path.rsplit('.').next() == Some(expected.as_str())),
            (Receiver::StringValue, Some(receiver)) => !is_type_reference(receiver),
            _ => false,
        }
    }

    /// Pattern sub-expression of a matched call
    pub fn pattern_expr<'c>(&self, call: &'c CallExpr) -> Option<&'c Expr> {
        match self.pattern {
            PatternSource::Receiver => call.receiver(),
            PatternSource::Argument(index) => call.args.get(index),
        }
    }

    /// Flags sub-expression of a matched call; absent when not passed
    pub fn flags_expr<'c>(&self, call: &'c CallExpr) -> Option<&'c Expr> {
        self.flags.and_then(|index| call.args.get(index))
    }
}

impl TryFrom<&SignatureConfiguration> for Signature {
    type Error = RexrefError;

    fn try_from(config: &SignatureConfiguration) -> Result<Self> {
        let receiver = match config.receiver.as_deref() {
            None => Receiver::None,
            Some("string") => Receiver::StringValue,
            Some(name) => Receiver::Type(name.to_string()),
        };
        let pattern = match (config.pattern_argument, &receiver) {
            (Some(index), _) => PatternSource::Argument(index),
            (None, Receiver::StringValue) => PatternSource::Receiver,
            (None, _) => {
                return Err(RexrefError::config_error(format!(
                    "Signature '{}' needs patternArgument unless its receiver is \"string\"",
                    config.name
                )));
            }
        };

        let required = match pattern {
            PatternSource::Argument(index) => index + 1,
            PatternSource::Receiver => 0,
        };
        let widest = required.max(config.flags_argument.map_or(0, |index| index + 1));
        let min_args = config.min_arguments.unwrap_or(required);
        let max_args = config.max_arguments.unwrap_or(widest);
        if min_args < required || max_args < min_args {
            return Err(RexrefError::config_error(format!(
                "Signature '{}' has an invalid argument range {min_args}..={max_args}",
                config.name
            )));
        }

        Ok(Self {
            name: config.name.clone(),
            receiver,
            pattern,
            flags: config.flags_argument,
            min_args,
            max_args,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SignatureRegistry {
    signatures: Vec<Signature>,
}

impl SignatureRegistry {
    /// Regex-consuming calls of the Kotlin and Java standard libraries
    pub fn builtin() -> Self {
        use PatternSource::{Argument, Receiver as OnReceiver};

        let pattern_type = || Receiver::Type("Pattern".to_string());
        Self {
            signatures: vec![
                Signature::new("Regex", Receiver::None, Argument(0), Some(1), 1, 2),
                Signature::new("compile", pattern_type(), Argument(0), Some(1), 1, 2),
                Signature::new("matches", pattern_type(), Argument(0), None, 2, 2),
                Signature::new("toRegex", Receiver::StringValue, OnReceiver, Some(0), 0, 1),
                Signature::new("toPattern", Receiver::StringValue, OnReceiver, Some(0), 0, 1),
                Signature::new("matches", Receiver::StringValue, Argument(0), None, 1, 1),
                Signature::new("replaceAll", Receiver::StringValue, Argument(0), None, 2, 2),
                Signature::new("replaceFirst", Receiver::StringValue, Argument(0), None, 2, 2),
            ],
        }
    }

    /// Built-in signatures followed by the configured ones
    pub fn from_config(config: &RexrefConfig) -> Result<Self> {
        let mut registry = Self::builtin();
        for entry in config.signatures() {
            registry.signatures.push(Signature::try_from(entry)?);
        }
        tracing::debug!("Signature registry holds {} signatures", registry.len());
        Ok(registry)
    }

    /// First signature matching the call
    pub fn match_call(&self, call: &CallExpr) -> Option<&Signature> {
        self.signatures
            .iter()
            .find(|signature| signature.matches(call))
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

impl Default for SignatureRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// `Pattern`, `java.util.regex.Pattern`: a capitalised name path
fn is_type_reference(expr: &Expr) -> bool {
    expr.dotted_path()
        .and_then(|path| path.rsplit('.').next().and_then(|last| last.chars().next()))
        .is_some_and(char::is_uppercase)
}
