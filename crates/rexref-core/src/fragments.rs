//! Fragment reconstruction
//!
//! Joins the lexical fragments of one (possibly concatenated) literal into a
//! single string in escape space, where every runtime backslash is spelled
//! `\\` whatever its source spelling was.

use crate::index::{Boundary, InverseIndex};
use biome_text_size::TextRange;

/// Canonical spelling of an escaped backslash in reconstructed text
pub const ESCAPED_BACKSLASH: &str = "\\\\";

/// One indivisible lexical piece of a string literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFragment {
    /// Source spelling
    pub text: String,
    pub source_range: TextRange,
    /// The fragment stands for a single backslash
    pub is_literal_backslash_escape: bool,
}

impl SourceFragment {
    pub fn new(text: impl Into<String>, source_range: TextRange) -> Self {
        Self {
            text: text.into(),
            source_range,
            is_literal_backslash_escape: false,
        }
    }

    /// A fragment spelling one backslash (`\\`, a raw `\`, `\`, ...)
    pub fn backslash(text: impl Into<String>, source_range: TextRange) -> Self {
        Self {
            text: text.into(),
            source_range,
            is_literal_backslash_escape: true,
        }
    }

    /// Text this fragment contributes to the reconstructed string
    pub fn normalized_text(&self) -> &str {
        if self.is_literal_backslash_escape {
            ESCAPED_BACKSLASH
        } else {
            &self.text
        }
    }
}

/// A reconstructed string together with its inverse index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    pub text: String,
    pub index: InverseIndex,
}

/// Concatenate normalized fragment texts, recording one boundary per fragment
///
/// `fragments` must not be empty; callers skip degenerate sources first.
pub fn reconstruct(fragments: &[SourceFragment]) -> Reconstruction {
    debug_assert!(!fragments.is_empty(), "cannot reconstruct an empty fragment sequence");

    let mut text = String::new();
    let mut boundaries = Vec::with_capacity(fragments.len());

    for fragment in fragments {
        let normalized = fragment.normalized_text();
        boundaries.push(Boundary {
            start: text.len(),
            source_range: fragment.source_range,
            verbatim: normalized.len() == usize::from(fragment.source_range.len()),
        });
        text.push_str(normalized);
    }

    let index = InverseIndex::new(boundaries, text.len());
    Reconstruction { text, index }
}
