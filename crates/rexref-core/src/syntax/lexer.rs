//! Lexer for the host expression language
//!
//! String literals are split into entries while lexing: runs of plain
//! characters, escape sequences and templates each keep their own range.
//! Every backslash of a raw (`"""`) string becomes its own escape entry.

use super::ast::{EntryKind, StringEntry, StringLiteral};
use crate::error::RexrefError;
use crate::result::Result;
use biome_text_size::{TextRange, TextSize};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Integer(i64),
    String(StringLiteral),
    LParen,
    RParen,
    Comma,
    Dot,
    Eq,
    Plus,
    Semicolon,
    Newline,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

/// Largest source accepted; every offset must fit a `TextSize`
pub const MAX_SOURCE_LEN: usize = u32::MAX as usize;

/// Tokenize host source. Newlines inside parentheses are dropped.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    ensure_addressable(source.len())?;
    Lexer::new(source).run()
}

fn ensure_addressable(len: usize) -> Result<()> {
    if len > MAX_SOURCE_LEN {
        return Err(RexrefError::parse_error(
            format!("Source of {len} bytes exceeds the {MAX_SOURCE_LEN} byte limit"),
            0,
            "",
        ));
    }
    Ok(())
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    paren_depth: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            paren_depth: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>> {
        while let Some(ch) = self.current() {
            let start = self.pos;
            match ch {
                '\n' => {
                    self.pos += 1;
                    if self.paren_depth == 0 {
                        self.push(TokenKind::Newline, start);
                    }
                }
                c if c.is_whitespace() => self.pos += c.len_utf8(),
                '/' if self.starts_with("//") => self.skip_line_comment(),
                '/' if self.starts_with("/*") => self.skip_block_comment()?,
                '"' if self.starts_with("\"\"\"") => {
                    let literal = self.lex_raw_string()?;
                    self.push(TokenKind::String(literal), start);
                }
                '"' => {
                    let literal = self.lex_string()?;
                    self.push(TokenKind::String(literal), start);
                }
                '(' => {
                    self.pos += 1;
                    self.paren_depth += 1;
                    self.push(TokenKind::LParen, start);
                }
                ')' => {
                    self.pos += 1;
                    self.paren_depth = self.paren_depth.saturating_sub(1);
                    self.push(TokenKind::RParen, start);
                }
                ',' => self.single(TokenKind::Comma),
                '.' => self.single(TokenKind::Dot),
                '=' => self.single(TokenKind::Eq),
                '+' => self.single(TokenKind::Plus),
                ';' => self.single(TokenKind::Semicolon),
                c if c.is_ascii_digit() => {
                    let value = self.lex_integer()?;
                    self.push(TokenKind::Integer(value), start);
                }
                c if is_ident_start(c) => {
                    let end = self.ident_end(start);
                    let text = self.source[start..end].to_string();
                    self.pos = end;
                    self.push(TokenKind::Ident(text), start);
                }
                other => {
                    return Err(self.error(format!("Unexpected character '{other}'"), start));
                }
            }
        }

        let end = self.pos;
        self.push(TokenKind::Eof, end);
        Ok(self.tokens)
    }

    fn current(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek(&self, skip: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(skip)
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.source[self.pos..].starts_with(prefix)
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let range = span(start, self.pos);
        self.tokens.push(Token { kind, range });
    }

    fn single(&mut self, kind: TokenKind) {
        let start = self.pos;
        self.pos += 1;
        self.push(kind, start);
    }

    fn error(&self, message: String, offset: usize) -> RexrefError {
        RexrefError::parse_error(message, offset, self.source)
    }

    fn skip_line_comment(&mut self) {
        match self.source[self.pos..].find('\n') {
            Some(idx) => self.pos += idx,
            None => self.pos = self.source.len(),
        }
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        let start = self.pos;
        match self.source[self.pos + 2..].find("*/") {
            Some(idx) => {
                self.pos += idx + 4;
                Ok(())
            }
            None => Err(self.error("Unterminated block comment".to_string(), start)),
        }
    }

    fn lex_integer(&mut self) -> Result<i64> {
        let start = self.pos;
        let rest = &self.source[start..];
        let (digits_start, radix) = if rest.starts_with("0x") || rest.starts_with("0X") {
            (start + 2, 16)
        } else {
            (start, 10)
        };

        let mut end = digits_start;
        for ch in self.source[digits_start..].chars() {
            if ch.is_digit(radix) || ch == '_' {
                end += 1;
            } else {
                break;
            }
        }
        self.pos = end;

        let digits: String = self.source[digits_start..end]
            .chars()
            .filter(|ch| *ch != '_')
            .collect();
        i64::from_str_radix(&digits, radix)
            .map_err(|e| self.error(format!("Invalid integer literal: {e}"), start))
    }

    fn ident_end(&self, start: usize) -> usize {
        let mut end = start;
        for ch in self.source[start..].chars() {
            if is_ident_continue(ch) {
                end += ch.len_utf8();
            } else {
                break;
            }
        }
        end
    }

    fn lex_string(&mut self) -> Result<StringLiteral> {
        let start = self.pos;
        self.pos += 1;
        let mut entries = Vec::new();
        let mut run_start: Option<usize> = None;

        loop {
            match self.current() {
                None | Some('\n') => {
                    return Err(self.error("Unterminated string literal".to_string(), start));
                }
                Some('"') => {
                    self.flush_run(&mut run_start, &mut entries);
                    self.pos += 1;
                    break;
                }
                Some('\\') => {
                    self.flush_run(&mut run_start, &mut entries);
                    entries.push(self.lex_escape()?);
                }
                Some('$') if self.template_follows() => {
                    self.flush_run(&mut run_start, &mut entries);
                    entries.push(self.lex_template()?);
                }
                Some(ch) => {
                    run_start.get_or_insert(self.pos);
                    self.pos += ch.len_utf8();
                }
            }
        }

        Ok(StringLiteral {
            raw: false,
            entries,
        })
    }

    fn lex_raw_string(&mut self) -> Result<StringLiteral> {
        let start = self.pos;
        self.pos += 3;
        let mut entries = Vec::new();
        let mut run_start: Option<usize> = None;

        loop {
            match self.current() {
                None => {
                    return Err(self.error("Unterminated raw string literal".to_string(), start));
                }
                Some('"') if self.starts_with("\"\"\"") => {
                    self.flush_run(&mut run_start, &mut entries);
                    self.pos += 3;
                    break;
                }
                Some('\\') => {
                    self.flush_run(&mut run_start, &mut entries);
                    let escape_start = self.pos;
                    self.pos += 1;
                    entries.push(StringEntry {
                        kind: EntryKind::Escape('\\'),
                        text: "\\".to_string(),
                        range: span(escape_start, self.pos),
                    });
                }
                Some('$') if self.template_follows() => {
                    self.flush_run(&mut run_start, &mut entries);
                    entries.push(self.lex_template()?);
                }
                Some(ch) => {
                    run_start.get_or_insert(self.pos);
                    self.pos += ch.len_utf8();
                }
            }
        }

        Ok(StringLiteral { raw: true, entries })
    }

    fn flush_run(&self, run_start: &mut Option<usize>, entries: &mut Vec<StringEntry>) {
        if let Some(start) = run_start.take() {
            entries.push(StringEntry {
                kind: EntryKind::Literal,
                text: self.source[start..self.pos].to_string(),
                range: span(start, self.pos),
            });
        }
    }

    fn lex_escape(&mut self) -> Result<StringEntry> {
        let start = self.pos;
        let escaped = self.peek(1);
        let (value, len) = match escaped {
            Some('\\') => ('\\', 2),
            Some('"') => ('"', 2),
            Some('\'') => ('\'', 2),
            Some('$') => ('$', 2),
            Some('n') => ('\n', 2),
            Some('t') => ('\t', 2),
            Some('r') => ('\r', 2),
            Some('b') => ('\u{8}', 2),
            Some('u') => {
                let hex = self.source.get(start + 2..start + 6).unwrap_or("");
                let value = u32::from_str_radix(hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.error(format!("Invalid unicode escape '\\u{hex}'"), start))?;
                (value, 6)
            }
            Some(other) => {
                return Err(self.error(format!("Illegal escape '\\{other}'"), start));
            }
            None => return Err(self.error("Unterminated string literal".to_string(), start)),
        };

        self.pos += len;
        Ok(StringEntry {
            kind: EntryKind::Escape(value),
            text: self.source[start..self.pos].to_string(),
            range: span(start, self.pos),
        })
    }

    fn template_follows(&self) -> bool {
        matches!(self.peek(1), Some(ch) if ch == '{' || is_ident_start(ch))
    }

    fn lex_template(&mut self) -> Result<StringEntry> {
        let start = self.pos;
        if self.peek(1) == Some('{') {
            self.pos += 2;
            let mut depth = 1usize;
            while depth > 0 {
                match self.current() {
                    None => {
                        return Err(self.error("Unterminated template expression".to_string(), start));
                    }
                    Some(ch) => {
                        match ch {
                            '{' => depth += 1,
                            '}' => depth -= 1,
                            _ => {}
                        }
                        self.pos += ch.len_utf8();
                    }
                }
            }
        } else {
            self.pos = self.ident_end(start + 1);
        }

        Ok(StringEntry {
            kind: EntryKind::Interpolation,
            text: self.source[start..self.pos].to_string(),
            range: span(start, self.pos),
        })
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Offsets never exceed `MAX_SOURCE_LEN`, checked in `tokenize`
fn span(start: usize, end: usize) -> TextRange {
    TextRange::new(text_size(start), text_size(end))
}

pub(crate) fn text_size(offset: usize) -> TextSize {
    TextSize::try_from(offset).unwrap_or(TextSize::from(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_oversized_source_is_a_parse_error() {
        assert!(ensure_addressable(MAX_SOURCE_LEN).is_ok());
        let err = ensure_addressable(MAX_SOURCE_LEN + 1).unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("byte limit"));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_offsets_saturate_instead_of_wrapping() {
        assert_eq!(text_size(7), TextSize::from(7));
        assert_eq!(text_size(MAX_SOURCE_LEN + 10), TextSize::from(u32::MAX));
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    fn string_entries(source: &str) -> Vec<(EntryKind, String)> {
        let tokens = tokenize(source).unwrap();
        match &tokens[0].kind {
            TokenKind::String(literal) => literal
                .entries
                .iter()
                .map(|entry| (entry.kind, entry.text.clone()))
                .collect(),
            other => panic!("expected string token, got {other:?}"),
        }
    }

    #[test]
    fn test_punctuation_and_names() {
        assert_eq!(
            kinds("Pattern.compile(p, 0x10)"),
            vec![
                TokenKind::Ident("Pattern".to_string()),
                TokenKind::Dot,
                TokenKind::Ident("compile".to_string()),
                TokenKind::LParen,
                TokenKind::Ident("p".to_string()),
                TokenKind::Comma,
                TokenKind::Integer(16),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_newlines_inside_parens_are_dropped() {
        let tokens = kinds("f(\n1\n)\n");
        assert!(!tokens[..4].contains(&TokenKind::Newline));
        assert_eq!(tokens[4], TokenKind::Newline);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a // tail\n/* block */ b"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::Newline,
                TokenKind::Ident("b".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_entries_split_on_escapes() {
        assert_eq!(
            string_entries(r#""a\\d+\n""#),
            vec![
                (EntryKind::Literal, "a".to_string()),
                (EntryKind::Escape('\\'), "\\\\".to_string()),
                (EntryKind::Literal, "d+".to_string()),
                (EntryKind::Escape('\n'), "\\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_unicode_escape() {
        assert_eq!(
            string_entries(r#""\u005C""#),
            vec![(EntryKind::Escape('\\'), "\\u005C".to_string())]
        );
    }

    #[test]
    fn test_templates() {
        assert_eq!(
            string_entries(r#""a$b${c + 1}$""#),
            vec![
                (EntryKind::Literal, "a".to_string()),
                (EntryKind::Interpolation, "$b".to_string()),
                (EntryKind::Interpolation, "${c + 1}".to_string()),
                (EntryKind::Literal, "$".to_string()),
            ]
        );
    }

    #[test]
    fn test_raw_string_backslashes() {
        assert_eq!(
            string_entries(r#""""\d"x""""#),
            vec![
                (EntryKind::Escape('\\'), "\\".to_string()),
                (EntryKind::Literal, "d\"x".to_string()),
            ]
        );
    }

    #[test]
    fn test_entry_ranges() {
        let tokens = tokenize(r#"x = "ab\\c""#).unwrap();
        let TokenKind::String(literal) = &tokens[2].kind else {
            panic!("expected string");
        };
        let ranges: Vec<(u32, u32)> = literal
            .entries
            .iter()
            .map(|entry| (u32::from(entry.range.start()), u32::from(entry.range.end())))
            .collect();
        assert_eq!(ranges, vec![(5, 7), (7, 9), (9, 10)]);
        assert_eq!(u32::from(tokens[2].range.end()), 11);
    }

    #[test]
    fn test_errors() {
        assert!(tokenize("\"abc").is_err());
        assert!(tokenize("\"a\\qb\"").is_err());
        assert!(tokenize("a # b").is_err());
        assert!(tokenize("\"\"\"abc").is_err());
    }
}
