//! Constant-value prediction over local declarations
//!
//! Follows parentheses and references to single-assignment declarations
//! until it reaches an expression that is not a resolvable name.

use super::ast::{Expr, ExprKind, Script, Stmt};
use std::collections::{HashMap, HashSet};

/// Declarations of one script that can be followed by prediction
#[derive(Debug, Default)]
pub struct ValueScope<'a> {
    bindings: HashMap<&'a str, &'a Expr>,
}

impl<'a> ValueScope<'a> {
    /// Collect `val` declarations and `var` declarations that are never reassigned
    ///
    /// A name declared more than once is ambiguous and not followed.
    pub fn from_script(script: &'a Script) -> Self {
        let mut declarations: HashMap<&'a str, Vec<&'a Expr>> = HashMap::new();
        let mut reassigned: HashSet<&'a str> = HashSet::new();

        for stmt in &script.statements {
            match stmt {
                Stmt::Declaration { name, init, .. } => {
                    declarations.entry(&name.text).or_default().push(init);
                }
                Stmt::Assignment { name, .. } => {
                    reassigned.insert(&name.text);
                }
                Stmt::Expr(_) => {}
            }
        }

        let bindings = declarations
            .into_iter()
            .filter(|(name, inits)| inits.len() == 1 && !reassigned.contains(name))
            .map(|(name, inits)| (name, inits[0]))
            .collect();

        Self { bindings }
    }

    /// Initializer bound to `name`, if it can be followed
    pub fn binding(&self, name: &str) -> Option<&'a Expr> {
        self.bindings.get(name).copied()
    }

    /// Best-effort runtime value expression of `expr`
    pub fn predict(&self, expr: &'a Expr) -> &'a Expr {
        let mut current = expr;
        let mut visited: HashSet<&str> = HashSet::new();

        loop {
            match &current.kind {
                ExprKind::Paren(inner) => current = inner.as_ref(),
                ExprKind::Name(name) => match self.binding(name) {
                    Some(init) if visited.insert(name.as_str()) => current = init,
                    _ => return current,
                },
                _ => return current,
            }
        }
    }
}
