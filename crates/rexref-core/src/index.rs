//! Inverse index from reconstructed offsets to source ranges
//!
//! Boundaries are kept sorted by their start offset in the reconstructed
//! string. Every offset in `[0, len)` belongs to exactly one boundary: the
//! one with the greatest start not above it.

use biome_text_size::{TextRange, TextSize};

/// Start of one fragment in the reconstructed string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Boundary {
    /// Offset of the fragment in the reconstructed string
    pub start: usize,
    /// Source range of the fragment
    pub source_range: TextRange,
    /// Normalized text has exactly the source spelling
    pub verbatim: bool,
}

impl Boundary {
    /// Source range of the fragment-local interval `[local_start, local_end)`
    ///
    /// Normalized fragments cannot be split; any part maps to all of them.
    fn clip(&self, local_start: usize, local_end: usize) -> TextRange {
        if !self.verbatim {
            return self.source_range;
        }
        let base = usize::from(self.source_range.start());
        TextRange::new(size(base + local_start), size(base + local_end))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InverseIndex {
    boundaries: Vec<Boundary>,
    len: usize,
}

impl InverseIndex {
    /// Build an index over a reconstructed string of `len` bytes
    pub fn new(boundaries: Vec<Boundary>, len: usize) -> Self {
        debug_assert!(
            boundaries.first().is_none_or(|first| first.start == 0),
            "first boundary must start at offset 0"
        );
        debug_assert!(
            boundaries.windows(2).all(|pair| pair[0].start < pair[1].start),
            "boundary offsets must be strictly increasing"
        );
        debug_assert!(
            boundaries.last().is_none_or(|last| last.start < len),
            "last boundary must start inside the reconstructed string"
        );
        Self { boundaries, len }
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// Length of the reconstructed string
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Boundary with the greatest start `<= index`
    pub fn range_at_index(&self, index: usize) -> Option<&Boundary> {
        self.slot_at(index).map(|slot| &self.boundaries[slot])
    }

    /// Boundary with the greatest start `< index`
    pub fn range_before_index(&self, index: usize) -> Option<&Boundary> {
        self.slot_before(index).map(|slot| &self.boundaries[slot])
    }

    /// Merged source ranges covering `[start, end)` of the reconstructed string
    ///
    /// Empty or inverted intervals yield no ranges; `end` is clamped to the
    /// reconstructed length. Each touched fragment contributes its clipped
    /// part, and parts that touch in the source are merged.
    pub fn text_ranges_between(&self, start: usize, end: usize) -> Vec<TextRange> {
        let end = end.min(self.len);
        if start >= end {
            return Vec::new();
        }
        let (Some(mut slot), Some(last)) = (self.slot_at(start), self.slot_before(end)) else {
            return Vec::new();
        };

        let mut ranges = Vec::new();
        let mut cursor = start;
        loop {
            let boundary = &self.boundaries[slot];
            let local_start = cursor - boundary.start;
            if slot == last {
                ranges.push(boundary.clip(local_start, end - boundary.start));
                break;
            }
            ranges.push(boundary.clip(local_start, self.fragment_len(slot)));
            slot += 1;
            cursor = self.boundaries[slot].start;
        }

        merge(ranges)
    }

    fn slot_at(&self, index: usize) -> Option<usize> {
        self.boundaries
            .partition_point(|boundary| boundary.start <= index)
            .checked_sub(1)
    }

    fn slot_before(&self, index: usize) -> Option<usize> {
        self.boundaries
            .partition_point(|boundary| boundary.start < index)
            .checked_sub(1)
    }

    fn fragment_len(&self, slot: usize) -> usize {
        let end = self
            .boundaries
            .get(slot + 1)
            .map_or(self.len, |next| next.start);
        end - self.boundaries[slot].start
    }
}

/// Merge consecutive ranges that touch in the source
fn merge(ranges: Vec<TextRange>) -> Vec<TextRange> {
    let mut merged: Vec<TextRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if last.end() == range.start() => *last = last.cover(range),
            _ => merged.push(range),
        }
    }
    merged
}

fn size(offset: usize) -> TextSize {
    crate::syntax::lexer::text_size(offset)
}
