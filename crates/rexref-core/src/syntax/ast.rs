//! Expression tree of the host language
//!
//! Every node carries its byte range in the original source so that
//! fragments and call tokens can be mapped back to line/column positions.

use crate::fragments::SourceFragment;
use biome_text_size::TextRange;

/// A parsed source file: top-level statements in order
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `val name = init` or `var name = init`
    Declaration {
        name: Ident,
        mutable: bool,
        init: Expr,
    },
    /// `name = value`
    Assignment { name: Ident, value: Expr },
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub text: String,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub range: TextRange,
    depth: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    String(StringLiteral),
    Integer(i64),
    Name(String),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `receiver.name`
    Dot { receiver: Box<Expr>, name: Ident },
    Call(CallExpr),
    Paren(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// String concatenation or numeric addition
    Plus,
    /// Bitwise OR written as the infix function `or`
    Or,
}

/// A call: `name(args)` or `receiver.name(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
}

impl CallExpr {
    /// Name of the called function, if the callee is a plain or qualified name
    pub fn name(&self) -> Option<&str> {
        match &self.callee.kind {
            ExprKind::Name(name) => Some(name),
            ExprKind::Dot { name, .. } => Some(&name.text),
            _ => None,
        }
    }

    /// Receiver of a qualified call (`receiver.name(...)`)
    pub fn receiver(&self) -> Option<&Expr> {
        match &self.callee.kind {
            ExprKind::Dot { receiver, .. } => Some(receiver),
            _ => None,
        }
    }

    /// Range of the callee name token
    pub fn callee_token_range(&self) -> TextRange {
        match &self.callee.kind {
            ExprKind::Dot { name, .. } => name.range,
            _ => self.callee.range,
        }
    }
}

/// A string literal, split into its lexical entries
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    /// Triple-quoted literal without escape processing
    pub raw: bool,
    pub entries: Vec<StringEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringEntry {
    pub kind: EntryKind,
    /// Source spelling of this entry
    pub text: String,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A run of plain characters
    Literal,
    /// An escape sequence and the character it stands for
    Escape(char),
    /// `$name` or `${...}`
    Interpolation,
}

impl StringLiteral {
    /// Fragments of this literal, or None if any entry is interpolated
    pub fn fragments(&self) -> Option<Vec<SourceFragment>> {
        self.entries
            .iter()
            .map(|entry| match entry.kind {
                EntryKind::Interpolation => None,
                EntryKind::Escape('\\') => Some(SourceFragment::backslash(
                    entry.text.clone(),
                    entry.range,
                )),
                EntryKind::Literal | EntryKind::Escape(_) => {
                    Some(SourceFragment::new(entry.text.clone(), entry.range))
                }
            })
            .collect()
    }
}

impl Expr {
    pub fn new(kind: ExprKind, range: TextRange) -> Self {
        let depth = match &kind {
            ExprKind::String(_) | ExprKind::Integer(_) | ExprKind::Name(_) => 0,
            ExprKind::Binary { lhs, rhs, .. } => lhs.depth.max(rhs.depth) + 1,
            ExprKind::Dot { receiver, .. } => receiver.depth + 1,
            ExprKind::Paren(inner) => inner.depth + 1,
            ExprKind::Call(call) => {
                call.args
                    .iter()
                    .map(|arg| arg.depth)
                    .fold(call.callee.depth, usize::max)
                    + 1
            }
        };
        Self { kind, range, depth }
    }

    /// Height of the tree below this node; leaves are 0
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn as_call(&self) -> Option<&CallExpr> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Dotted name path (`java.util.regex.Pattern`) of a name or member chain
    pub fn dotted_path(&self) -> Option<String> {
        match &self.kind {
            ExprKind::Name(name) => Some(name.clone()),
            ExprKind::Dot { receiver, name } => {
                let mut path = receiver.dotted_path()?;
                path.push('.');
                path.push_str(&name.text);
                Some(path)
            }
            _ => None,
        }
    }

    /// Simple name referenced by a name or a member access
    pub fn referenced_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Name(name) => Some(name),
            ExprKind::Dot { name, .. } => Some(&name.text),
            _ => None,
        }
    }
}

impl Script {
    /// All call expressions in source order, outer calls before inner ones
    pub fn calls(&self) -> Vec<&CallExpr> {
        let mut calls = Vec::new();
        for stmt in &self.statements {
            match stmt {
                Stmt::Declaration { init: expr, .. }
                | Stmt::Assignment { value: expr, .. }
                | Stmt::Expr(expr) => collect_calls(expr, &mut calls),
            }
        }
        calls
    }
}

fn collect_calls<'a>(expr: &'a Expr, calls: &mut Vec<&'a CallExpr>) {
    match &expr.kind {
        ExprKind::Call(call) => {
            calls.push(call);
            collect_calls(&call.callee, calls);
            for arg in &call.args {
                collect_calls(arg, calls);
            }
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            collect_calls(lhs, calls);
            collect_calls(rhs, calls);
        }
        ExprKind::Dot { receiver, .. } => collect_calls(receiver, calls),
        ExprKind::Paren(inner) => collect_calls(inner, calls),
        ExprKind::String(_) | ExprKind::Integer(_) | ExprKind::Name(_) => {}
    }
}
