//! Recursive-descent parser for the host expression language
//!
//! ```text
//! script  := (stmt (NEWLINE | ';')*)*
//! stmt    := ('val' | 'var') IDENT '=' expr | IDENT '=' expr | expr
//! expr    := sum ('or' sum)*
//! sum     := postfix ('+' postfix)*
//! postfix := primary ('.' IDENT | '(' args ')')*
//! primary := STRING | INTEGER | IDENT | '(' expr ')'
//! ```

use super::ast::{BinaryOp, CallExpr, Expr, ExprKind, Ident, Script, Stmt};
use super::lexer::{Token, TokenKind, tokenize};
use crate::error::RexrefError;
use crate::result::Result;
use biome_text_size::TextRange;

/// Deepest expression tree, and deepest expression recursion, accepted
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parse host source into a script
pub fn parse_script(source: &str) -> Result<Script> {
    let tokens = tokenize(source)?;
    Parser {
        source,
        tokens,
        pos: 0,
        depth: 0,
    }
    .script()
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn script(mut self) -> Result<Script> {
        let mut statements = Vec::new();
        loop {
            self.skip_separators();
            if self.at(&TokenKind::Eof) {
                break;
            }
            statements.push(self.statement()?);
            if !self.at(&TokenKind::Eof)
                && !self.at(&TokenKind::Newline)
                && !self.at(&TokenKind::Semicolon)
            {
                return Err(self.unexpected("end of statement"));
            }
        }
        Ok(Script { statements })
    }

    fn statement(&mut self) -> Result<Stmt> {
        if let Some(keyword @ ("val" | "var")) = self.ident_text() {
            let mutable = keyword == "var";
            self.bump();
            let name = self.expect_ident()?;
            self.expect(&TokenKind::Eq, "'='")?;
            let init = self.expr()?;
            return Ok(Stmt::Declaration {
                name,
                mutable,
                init,
            });
        }

        if self.ident_text().is_some() && self.nth_is(1, &TokenKind::Eq) {
            let name = self.expect_ident()?;
            self.bump();
            let value = self.expr()?;
            return Ok(Stmt::Assignment { name, value });
        }

        Ok(Stmt::Expr(self.expr()?))
    }

    fn expr(&mut self) -> Result<Expr> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.too_deep());
        }
        self.depth += 1;
        let expr = self.or_chain();
        self.depth -= 1;
        expr
    }

    fn or_chain(&mut self) -> Result<Expr> {
        let mut lhs = self.sum()?;
        while self.ident_text() == Some("or") {
            self.bump();
            self.skip_newlines();
            let rhs = self.sum()?;
            lhs = self.checked(binary(BinaryOp::Or, lhs, rhs))?;
        }
        Ok(lhs)
    }

    fn sum(&mut self) -> Result<Expr> {
        let mut lhs = self.postfix()?;
        while self.at(&TokenKind::Plus) {
            self.bump();
            self.skip_newlines();
            let rhs = self.postfix()?;
            lhs = self.checked(binary(BinaryOp::Plus, lhs, rhs))?;
        }
        Ok(lhs)
    }

    fn postfix(&mut self) -> Result<Expr> {
        let mut expr = self.primary()?;
        loop {
            if self.dot_follows() {
                self.skip_newlines();
                self.bump();
                let name = self.expect_ident()?;
                let range = expr.range.cover(name.range);
                expr = self.checked(Expr::new(
                    ExprKind::Dot {
                        receiver: Box::new(expr),
                        name,
                    },
                    range,
                ))?;
            } else if self.at(&TokenKind::LParen) {
                self.bump();
                let args = self.arguments()?;
                let close = self.expect(&TokenKind::RParen, "')'")?;
                let range = expr.range.cover(close);
                expr = self.checked(Expr::new(
                    ExprKind::Call(CallExpr {
                        callee: Box::new(expr),
                        args,
                    }),
                    range,
                ))?;
            } else {
                return Ok(expr);
            }
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.at(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            if self.at(&TokenKind::Comma) {
                self.bump();
                if self.at(&TokenKind::RParen) {
                    return Ok(args);
                }
            } else {
                return Ok(args);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        let token = self.current().clone();
        let kind = match token.kind {
            TokenKind::String(literal) => ExprKind::String(literal),
            TokenKind::Integer(value) => ExprKind::Integer(value),
            TokenKind::Ident(name) => ExprKind::Name(name),
            TokenKind::LParen => {
                self.bump();
                let inner = self.expr()?;
                let close = self.expect(&TokenKind::RParen, "')'")?;
                return self.checked(Expr::new(
                    ExprKind::Paren(Box::new(inner)),
                    token.range.cover(close),
                ));
            }
            _ => return Err(self.unexpected("an expression")),
        };
        self.bump();
        Ok(Expr::new(kind, token.range))
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn nth_is(&self, n: usize, kind: &TokenKind) -> bool {
        self.tokens
            .get(self.pos + n)
            .is_some_and(|token| &token.kind == kind)
    }

    fn ident_text(&self) -> Option<&str> {
        match &self.current().kind {
            TokenKind::Ident(text) => Some(text),
            _ => None,
        }
    }

    /// A `.` on this line or at the start of a following line
    fn dot_follows(&self) -> bool {
        self.tokens[self.pos..]
            .iter()
            .find(|token| token.kind != TokenKind::Newline)
            .is_some_and(|token| token.kind == TokenKind::Dot)
    }

    fn bump(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn skip_newlines(&mut self) {
        while self.at(&TokenKind::Newline) {
            self.bump();
        }
    }

    fn skip_separators(&mut self) {
        while self.at(&TokenKind::Newline) || self.at(&TokenKind::Semicolon) {
            self.bump();
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<TextRange> {
        if self.at(kind) {
            let range = self.current().range;
            self.bump();
            Ok(range)
        } else {
            Err(self.unexpected(what))
        }
    }

    fn expect_ident(&mut self) -> Result<Ident> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Ident(text) => {
                self.bump();
                Ok(Ident {
                    text,
                    range: token.range,
                })
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    /// Reject trees deeper than the nesting limit
    fn checked(&self, expr: Expr) -> Result<Expr> {
        if expr.depth() > MAX_NESTING_DEPTH {
            return Err(self.too_deep());
        }
        Ok(expr)
    }

    fn too_deep(&self) -> RexrefError {
        RexrefError::parse_error(
            format!("Expression nesting exceeds {MAX_NESTING_DEPTH} levels"),
            usize::from(self.current().range.start()),
            self.source,
        )
    }

    fn unexpected(&self, expected: &str) -> RexrefError {
        let token = self.current();
        let found = match &token.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Newline => "newline".to_string(),
            _ => format!("'{}'", &self.source[token.range]),
        };
        RexrefError::parse_error(
            format!("Expected {expected}, found {found}"),
            usize::from(token.range.start()),
            self.source,
        )
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    let range = lhs.range.cover(rhs.range);
    Expr::new(
        ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        range,
    )
}
