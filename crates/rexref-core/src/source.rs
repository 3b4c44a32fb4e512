//! Regex source adapter
//!
//! The reconstructed string is in escape space (`\\` for a backslash, `\n`
//! for a newline). The regex parser reads runtime text, so the adapter
//! decodes string escapes into the pattern it hands out and remembers, per
//! pattern byte, the reconstructed offset it came from.

use crate::fragments::{Reconstruction, SourceFragment, reconstruct};
use crate::index::InverseIndex;
use biome_text_size::TextRange;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexSource {
    reconstruction: Reconstruction,
    pattern: String,
    /// Reconstructed offset of each pattern byte, plus one past the end
    offsets: Vec<usize>,
}

impl RegexSource {
    pub fn new(reconstruction: Reconstruction) -> Self {
        let (pattern, offsets) = decode(&reconstruction.text);
        Self {
            reconstruction,
            pattern,
            offsets,
        }
    }

    pub fn from_fragments(fragments: &[SourceFragment]) -> Self {
        Self::new(reconstruct(fragments))
    }

    /// Reconstructed (escape-space) text
    pub fn reconstructed(&self) -> &str {
        &self.reconstruction.text
    }

    /// Runtime pattern text handed to the regex parser
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn index(&self) -> &InverseIndex {
        &self.reconstruction.index
    }

    /// Character of the reconstructed string at a byte offset
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.reconstruction.text.get(offset..)?.chars().next()
    }

    /// Map a pattern byte span to the reconstructed interval it was decoded from
    pub fn to_reconstructed(&self, span: Range<usize>) -> Range<usize> {
        let last = self.offsets.len() - 1;
        self.offsets[span.start.min(last)]..self.offsets[span.end.min(last)]
    }

    /// Merged source ranges of a pattern byte span
    pub fn text_ranges(&self, span: Range<usize>) -> Vec<TextRange> {
        let range = self.to_reconstructed(span);
        self.index().text_ranges_between(range.start, range.end)
    }
}

fn decode(text: &str) -> (String, Vec<usize>) {
    let mut pattern = String::with_capacity(text.len());
    let mut offsets = Vec::with_capacity(text.len() + 1);
    let mut pos = 0;

    while let Some(ch) = text[pos..].chars().next() {
        match unescape(&text[pos..]) {
            Some((value, width)) => {
                pattern.push(value);
                offsets.extend(std::iter::repeat_n(pos, value.len_utf8()));
                pos += width;
            }
            None => {
                pattern.push(ch);
                offsets.extend(pos..pos + ch.len_utf8());
                pos += ch.len_utf8();
            }
        }
    }
    offsets.push(text.len());

    (pattern, offsets)
}

/// Decode a string escape at the start of `text` into (character, width)
fn unescape(text: &str) -> Option<(char, usize)> {
    let mut chars = text.chars();
    if chars.next()? != '\\' {
        return None;
    }
    let value = match chars.next()? {
        c @ ('\\' | '"' | '\'' | '$') => c,
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'b' => '\u{8}',
        'u' => {
            let hex = text.get(2..6)?;
            let code = u32::from_str_radix(hex, 16).ok()?;
            return char::from_u32(code).map(|c| (c, 6));
        }
        _ => return None,
    };
    Some((value, 2))
}
