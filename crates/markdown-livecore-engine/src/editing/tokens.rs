//! Per-paragraph token cache.
//!
//! `TokenCache` memoizes the output of a stateless tokenizer keyed by
//! paragraph ordinal. Every entry remembers the text it was computed from and
//! is only served while that text is unchanged, so a missed invalidation costs
//! a recomputation, never a wrong answer.
//!
//! # Invalidation
//!
//! Callers pick the operation matching the edit's shape:
//! - [`TokenCache::invalidate`]: in-place edit of one paragraph
//! - [`TokenCache::invalidate_from`]: paragraphs inserted or removed, which
//!   shifts every later ordinal onto a different paragraph
//! - [`TokenCache::invalidate_all`]: document reload

use std::collections::{BTreeMap, btree_map::Entry};

use super::ParagraphEdit;

/// One memoized tokenizer result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<T> {
    pub ordinal: usize,
    pub source: String,
    pub tokens: T,
}

/// Hit/miss counters for tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    /// Returns the cache hit rate as a percentage (0.0 to 100.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Token cache indexed by paragraph ordinal.
///
/// Entries are kept sparse, so any ordinal can be stored without allocating
/// room for the ones before it.
#[derive(Debug, Clone)]
pub struct TokenCache<T> {
    entries: BTreeMap<usize, CacheEntry<T>>,
    stats: CacheStats,
}

impl<T> TokenCache<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Cached tokens for `ordinal`, only if they were computed from `text`.
    pub fn lookup(&mut self, ordinal: usize, text: &str) -> Option<&T> {
        let hit = self.peek(ordinal, text).is_some();
        if hit {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        self.peek(ordinal, text)
    }

    /// Like [`lookup`](Self::lookup) but without touching the statistics.
    pub fn peek(&self, ordinal: usize, text: &str) -> Option<&T> {
        self.entries
            .get(&ordinal)
            .filter(|e| e.source == text)
            .map(|e| &e.tokens)
    }

    /// Stores tokens computed from `text`, replacing any previous entry.
    pub fn store(&mut self, ordinal: usize, text: &str, tokens: T) {
        self.entries.insert(
            ordinal,
            CacheEntry {
                ordinal,
                source: text.to_owned(),
                tokens,
            },
        );
    }

    /// Returns cached tokens, computing and storing them with `tokenize` on a miss.
    pub fn get_or_insert_with<F>(&mut self, ordinal: usize, text: &str, tokenize: F) -> &T
    where
        F: FnOnce(&str) -> T,
    {
        let fresh = |text: &str| CacheEntry {
            ordinal,
            source: text.to_owned(),
            tokens: tokenize(text),
        };
        let entry = match self.entries.entry(ordinal) {
            Entry::Occupied(slot) if slot.get().source == text => {
                self.stats.hits += 1;
                slot.into_mut()
            }
            Entry::Occupied(mut slot) => {
                self.stats.misses += 1;
                slot.insert(fresh(text));
                slot.into_mut()
            }
            Entry::Vacant(slot) => {
                self.stats.misses += 1;
                slot.insert(fresh(text))
            }
        };
        &entry.tokens
    }

    /// Drops the entry for one paragraph.
    pub fn invalidate(&mut self, ordinal: usize) {
        self.entries.remove(&ordinal);
    }

    /// Drops every entry at or after `ordinal`.
    pub fn invalidate_from(&mut self, ordinal: usize) {
        log::trace!("token cache: invalidate from {ordinal}");
        self.entries.split_off(&ordinal);
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    /// Invalidates whatever `edit` made stale: the edited paragraphs when the
    /// count is unchanged, otherwise everything from the edit point on.
    pub fn invalidate_edit(&mut self, edit: &ParagraphEdit) {
        if edit.is_in_place() {
            for ordinal in edit.inserted_range() {
                self.invalidate(ordinal);
            }
        } else {
            self.invalidate_from(edit.ordinal);
        }
    }
}

impl<T> Default for TokenCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
