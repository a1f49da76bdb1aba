// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::pipeline::PipelineOutcome;
use demand_matrix_domain::{Clock, FilterSelection, MonthKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Identifies one memoized pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Content fingerprint of the input dataset.
    pub dataset: u64,
    /// The selection snapshot the pipeline ran against.
    pub selection: FilterSelection,
    /// The calendar month current-month fallbacks resolved against.
    pub month: MonthKey,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    outcome: PipelineOutcome,
    inserted_at: Instant,
    last_used: u64,
}

/// Hit and miss counters for a filter cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that missed or found an expired entry.
    pub misses: u64,
    /// Entries currently held.
    pub entries: usize,
}

/// Memoized pipeline results with TTL and capacity eviction.
///
/// Each pipeline instance owns its own cache. Expiry is measured with the
/// injected clock.
#[derive(Debug)]
pub struct FilterCache {
    entries: HashMap<CacheKey, CacheEntry>,
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
    tick: u64,
    hits: u64,
    misses: u64,
}

impl FilterCache {
    /// Creates an empty cache.
    ///
    /// A capacity of zero is treated as one.
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity: capacity.max(1),
            clock,
            tick: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Looks up a memoized outcome. Expired entries are removed.
    pub fn get(&mut self, key: &CacheKey) -> Option<PipelineOutcome> {
        let now: Instant = self.clock.now();
        let ttl: Duration = self.ttl;

        let expired: bool = self
            .entries
            .get(key)
            .is_some_and(|entry| now.duration_since(entry.inserted_at) >= ttl);
        if expired {
            debug!(dataset = key.dataset, "Filter cache entry expired");
            self.entries.remove(key);
        }

        self.tick += 1;
        let tick: u64 = self.tick;
        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_used = tick;
            self.hits += 1;
            Some(entry.outcome.clone())
        } else {
            self.misses += 1;
            None
        }
    }

    /// Stores an outcome, evicting expired entries first and then the least
    /// recently used entry if the cache is full.
    pub fn insert(&mut self, key: CacheKey, outcome: PipelineOutcome) {
        let now: Instant = self.clock.now();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_expired(now);
        }
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_least_recently_used();
        }

        self.tick += 1;
        self.entries.insert(
            key,
            CacheEntry {
                outcome,
                inserted_at: now,
                last_used: self.tick,
            },
        );
    }

    /// Removes every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of entries held, including expired ones not yet
    /// evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the hit and miss counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }

    fn evict_expired(&mut self, now: Instant) {
        let ttl: Duration = self.ttl;
        let before: usize = self.entries.len();
        self.entries
            .retain(|_, entry| now.duration_since(entry.inserted_at) < ttl);
        let evicted: usize = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, "Evicted expired filter cache entries");
        }
    }

    fn evict_least_recently_used(&mut self) {
        let oldest: Option<CacheKey> = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            debug!(dataset = key.dataset, "Evicted least recently used filter cache entry");
            self.entries.remove(&key);
        }
    }
}
