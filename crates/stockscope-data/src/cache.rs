//! Price data caching.

use std::collections::HashMap;
use stockscope_core::types::{PriceKey, PriceTable};

/// In-memory cache of fetched price tables, keyed by (ticker, start, end).
///
/// Entries live for the process lifetime. Only successful fetches are
/// stored, so a failing provider is asked again on the next request.
#[derive(Debug, Default)]
pub struct PriceCache {
    cache: HashMap<PriceKey, PriceTable>,
    hits: u64,
    misses: u64,
}

impl PriceCache {
    /// Create a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached table, counting the lookup.
    pub fn get(&mut self, key: &PriceKey) -> Option<&PriceTable> {
        match self.cache.get(key) {
            Some(table) => {
                self.hits += 1;
                Some(table)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a table in the cache.
    pub fn put(&mut self, key: PriceKey, table: PriceTable) {
        self.cache.insert(key, table);
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that missed.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
