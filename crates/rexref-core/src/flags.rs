//! Regex flag resolution
//!
//! Flags are named constants (`Pattern.MULTILINE`, `RegexOption.IGNORE_CASE`)
//! combined with `or`, collected with `setOf(...)`, or plain integers.
//! Unknown names contribute nothing.

use crate::syntax::{BinaryOp, Expr, ExprKind, ValueScope};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Flag bitmask using the `java.util.regex.Pattern` bit values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegexFlags(u32);

impl RegexFlags {
    pub const NONE: Self = Self(0);
    pub const UNIX_LINES: Self = Self(0x01);
    pub const CASE_INSENSITIVE: Self = Self(0x02);
    pub const COMMENTS: Self = Self(0x04);
    pub const MULTILINE: Self = Self(0x08);
    pub const LITERAL: Self = Self(0x10);
    pub const DOTALL: Self = Self(0x20);
    pub const UNICODE_CASE: Self = Self(0x40);
    pub const CANON_EQ: Self = Self(0x80);
    pub const UNICODE_CHARACTER_CLASS: Self = Self(0x100);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Flag constant for a symbol name, in either spelling
    pub fn from_name(name: &str) -> Option<Self> {
        FLAG_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, flag)| *flag)
    }
}

const FLAG_NAMES: &[(&str, RegexFlags)] = &[
    ("UNIX_LINES", RegexFlags::UNIX_LINES),
    ("CASE_INSENSITIVE", RegexFlags::CASE_INSENSITIVE),
    ("IGNORE_CASE", RegexFlags::CASE_INSENSITIVE),
    ("COMMENTS", RegexFlags::COMMENTS),
    ("MULTILINE", RegexFlags::MULTILINE),
    ("LITERAL", RegexFlags::LITERAL),
    ("DOTALL", RegexFlags::DOTALL),
    ("DOT_MATCHES_ALL", RegexFlags::DOTALL),
    ("UNICODE_CASE", RegexFlags::UNICODE_CASE),
    ("CANON_EQ", RegexFlags::CANON_EQ),
    ("UNICODE_CHARACTER_CLASS", RegexFlags::UNICODE_CHARACTER_CLASS),
];

impl BitOr for RegexFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for RegexFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for RegexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Calls whose arguments are a collection of flags
const FLAG_COLLECTIONS: &[&str] = &["setOf", "listOf", "arrayOf", "of"];

/// Nesting limit for self-referencing flag declarations
const MAX_DEPTH: usize = 32;

/// Resolve a flags expression to a bitmask; no expression means no flags
pub fn resolve_flags<'a>(expr: Option<&'a Expr>, scope: &ValueScope<'a>) -> RegexFlags {
    expr.map_or(RegexFlags::NONE, |expr| resolve(expr, scope, 0))
}

fn resolve<'a>(expr: &'a Expr, scope: &ValueScope<'a>, depth: usize) -> RegexFlags {
    if depth > MAX_DEPTH {
        return RegexFlags::NONE;
    }
    let expr = scope.predict(expr);
    match &expr.kind {
        ExprKind::Binary {
            op: BinaryOp::Or,
            lhs,
            rhs,
        } => resolve(lhs, scope, depth + 1) | resolve(rhs, scope, depth + 1),
        ExprKind::Integer(value) => RegexFlags::from_bits(u32::try_from(*value).unwrap_or(0)),
        ExprKind::Call(call) => match (call.name(), call.receiver()) {
            (Some("or"), Some(receiver)) if call.args.len() == 1 => {
                resolve(receiver, scope, depth + 1) | resolve(&call.args[0], scope, depth + 1)
            }
            (Some(name), _) if FLAG_COLLECTIONS.contains(&name) => call
                .args
                .iter()
                .fold(RegexFlags::NONE, |flags, arg| flags | resolve(arg, scope, depth + 1)),
            _ => RegexFlags::NONE,
        },
        _ => expr
            .referenced_name()
            .and_then(RegexFlags::from_name)
            .unwrap_or_default(),
    }
}
