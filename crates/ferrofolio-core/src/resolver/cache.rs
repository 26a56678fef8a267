//! Run-scoped resolution cache.

use std::collections::HashMap;

use crate::domain::SecurityReference;

/// ISIN to resolved security, owned by one conversion run.
///
/// Only successful resolutions are stored. An ISIN that resolved to nothing
/// is looked up again on its next occurrence.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    map: HashMap<String, SecurityReference>,
    hits: u64,
    misses: u64,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an ISIN and counts the outcome.
    pub fn get(&mut self, isin: &str) -> Option<SecurityReference> {
        match self.map.get(isin) {
            Some(security) => {
                self.hits += 1;
                Some(security.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, isin: impl Into<String>, security: SecurityReference) {
        self.map.insert(isin.into(), security);
    }

    pub fn contains(&self, isin: &str) -> bool {
        self.map.contains_key(isin)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub const fn hits(&self) -> u64 {
        self.hits
    }

    pub const fn misses(&self) -> u64 {
        self.misses
    }
}
