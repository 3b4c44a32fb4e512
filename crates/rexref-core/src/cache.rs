//! Per-file cache of regex parse results
//!
//! A cache lives for the analysis of one file. Two call sites sharing a
//! pattern (by fragment identity or by text, depending on keying) and the
//! same flags get the same parse result.

use crate::flags::RegexFlags;
use crate::fragments::SourceFragment;
use crate::regex::{RegexDialectParser, RegexParseResult};
use crate::source::RegexSource;
use biome_text_size::TextRange;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;

/// What makes two regexes the same for caching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CacheKeying {
    /// Same fragment source ranges and flags
    Identity,
    /// Same reconstructed text and flags
    #[default]
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Identity(Vec<TextRange>, RegexFlags),
    Text(String, RegexFlags),
}

impl CacheKey {
    pub fn new(keying: CacheKeying, fragments: &[SourceFragment], flags: RegexFlags) -> Self {
        match keying {
            CacheKeying::Identity => Self::Identity(
                fragments.iter().map(|fragment| fragment.source_range).collect(),
                flags,
            ),
            CacheKeying::Text => Self::Text(
                fragments
                    .iter()
                    .map(SourceFragment::normalized_text)
                    .collect(),
                flags,
            ),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    /// Share of lookups served from the cache, as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

pub struct RegexCache {
    keying: CacheKeying,
    entries: HashMap<CacheKey, Rc<RegexParseResult>>,
    stats: CacheStats,
}

impl RegexCache {
    pub fn new(keying: CacheKeying) -> Self {
        Self {
            keying,
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn keying(&self) -> CacheKeying {
        self.keying
    }

    /// Cached parse result for `fragments` and `flags`, parsing on a miss
    pub fn get_or_parse(
        &mut self,
        fragments: &[SourceFragment],
        flags: RegexFlags,
        parser: &dyn RegexDialectParser,
    ) -> Rc<RegexParseResult> {
        let key = CacheKey::new(self.keying, fragments, flags);
        if let Some(result) = self.entries.get(&key) {
            self.stats.hits += 1;
            tracing::trace!(?key, "regex cache hit");
            return Rc::clone(result);
        }

        self.stats.misses += 1;
        let result = Rc::new(parser.parse(RegexSource::from_fragments(fragments), flags));
        tracing::trace!(pattern = result.source().pattern(), "regex parsed");
        self.entries.insert(key, Rc::clone(&result));
        result
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl Default for RegexCache {
    fn default() -> Self {
        Self::new(CacheKeying::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::SyntaxParser;
    use biome_text_size::TextSize;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts parses, delegating to the real parser
    struct CountingParser {
        parses: AtomicUsize,
    }

    impl RegexDialectParser for CountingParser {
        fn parse(&self, source: RegexSource, flags: RegexFlags) -> RegexParseResult {
            self.parses.fetch_add(1, Ordering::Relaxed);
            SyntaxParser::new().parse(source, flags)
        }
    }

    fn fragment(text: &str, start: u32) -> Vec<SourceFragment> {
        let end = start + text.len() as u32;
        vec![SourceFragment::new(
            text,
            TextRange::new(TextSize::from(start), TextSize::from(end)),
        )]
    }

    #[test]
    fn test_same_fragments_parse_once() {
        let parser = CountingParser {
            parses: AtomicUsize::new(0),
        };
        let mut cache = RegexCache::new(CacheKeying::Identity);
        let fragments = fragment("a+b", 10);

        let first = cache.get_or_parse(&fragments, RegexFlags::NONE, &parser);
        let second = cache.get_or_parse(&fragments, RegexFlags::NONE, &parser);

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(parser.parses.load(Ordering::Relaxed), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_flags_are_part_of_the_key() {
        let parser = CountingParser {
            parses: AtomicUsize::new(0),
        };
        let mut cache = RegexCache::default();
        let fragments = fragment("a b", 0);

        cache.get_or_parse(&fragments, RegexFlags::NONE, &parser);
        cache.get_or_parse(&fragments, RegexFlags::COMMENTS, &parser);

        assert_eq!(cache.len(), 2);
        assert_eq!(parser.parses.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_keying_decides_sharing_between_sites() {
        let parser = CountingParser {
            parses: AtomicUsize::new(0),
        };
        let first_site = fragment("x*", 5);
        let second_site = fragment("x*", 40);

        let mut by_text = RegexCache::new(CacheKeying::Text);
        by_text.get_or_parse(&first_site, RegexFlags::NONE, &parser);
        by_text.get_or_parse(&second_site, RegexFlags::NONE, &parser);
        assert_eq!(by_text.len(), 1);

        let mut by_identity = RegexCache::new(CacheKeying::Identity);
        by_identity.get_or_parse(&first_site, RegexFlags::NONE, &parser);
        by_identity.get_or_parse(&second_site, RegexFlags::NONE, &parser);
        assert_eq!(by_identity.len(), 2);

        assert_eq!(parser.parses.load(Ordering::Relaxed), 3);
        assert!((by_text.stats().hit_rate() - 50.0).abs() < f64::EPSILON);
    }
}
