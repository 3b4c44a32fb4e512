//! Host language layer
//!
//! A small Kotlin-like expression language: declarations, string literals
//! with escapes and templates, concatenation, `or` flag combination and
//! (qualified) calls. It supplies the fragment sequences, call sites and
//! constant-value prediction that the regex engine consumes.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod predict;

pub use ast::{
    BinaryOp, CallExpr, EntryKind, Expr, ExprKind, Ident, Script, Stmt, StringEntry,
    StringLiteral,
};
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::parse_script;
pub use predict::ValueScope;
