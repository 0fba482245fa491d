//! Bounded string-keyed caches
//!
//! The compiler memoizes three things per class string: parse results, generated
//! ASTs, and whether a token is a utility prefix. All three use
//! [`BoundedCache`], a capacity-limited map with one of two eviction policies:
//!
//! - [`EvictionPolicy::Fifo`] - the first key inserted is evicted first,
//!   regardless of how recently it was read. This is the default and is adequate
//!   for monotonic class discovery on a live page.
//! - [`EvictionPolicy::Lru`] - reads refresh a key's position.
//!
//! # Implementation Details
//!
//! Both policies share one queue of `(key, stamp)` pairs. Under LRU a read pushes
//! a fresh stamp instead of moving the old queue entry; stale entries are skipped
//! at eviction time and the queue is compacted once it grows past twice the
//! capacity, so every operation stays amortised O(1).

use std::collections::VecDeque;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::{ast::AstNode, config::CompilerConfig, parser::ParseResult};

/// Eviction policy for [`BoundedCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Evict the oldest inserted key
    #[default]
    Fifo,
    /// Evict the least recently read or written key
    Lru,
}

/// Snapshot of a cache's occupancy and effectiveness
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of live entries
    pub size: usize,
    /// Capacity
    pub max_size: usize,
    /// Successful lookups
    pub hits: u64,
    /// Failed lookups
    pub misses: u64,
    /// `hits / (hits + misses)`, 0.0 before the first lookup
    pub hit_rate: f64,
}

#[derive(Debug, Clone)]
struct Slot<V> {
    value: V,
    stamp: u64,
}

/// A capacity-limited map from class strings to values
#[derive(Debug, Clone)]
pub struct BoundedCache<V> {
    map: HashMap<String, Slot<V>>,
    /// Insertion (or, under LRU, access) order; may hold stale stamps
    order: VecDeque<(String, u64)>,
    max_size: usize,
    policy: EvictionPolicy,
    clock: u64,
    hits: u64,
    misses: u64,
}

impl<V> BoundedCache<V> {
    /// Create an empty cache holding at most `max_size` entries
    ///
    /// A `max_size` of zero disables caching: inserts are dropped.
    pub fn new(max_size: usize, policy: EvictionPolicy) -> Self {
        Self {
            map: HashMap::with_capacity(max_size.min(1024)),
            order: VecDeque::with_capacity(max_size.min(1024)),
            max_size,
            policy,
            clock: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a key, recording a hit or a miss
    pub fn get(&mut self, key: &str) -> Option<&V> {
        self.maybe_compact();

        match self.map.get_mut(key) {
            Some(slot) => {
                self.hits += 1;
                if self.policy == EvictionPolicy::Lru {
                    self.clock += 1;
                    slot.stamp = self.clock;
                    self.order.push_back((key.to_string(), self.clock));
                }
                Some(&slot.value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Look up a key without touching statistics or recency
    #[inline]
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.map.get(key).map(|slot| &slot.value)
    }

    /// Check whether a key is present
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Insert a value, evicting as needed
    ///
    /// Re-inserting an existing key replaces its value. Under FIFO the key keeps
    /// its original queue position; under LRU it becomes the most recent.
    pub fn insert(&mut self, key: String, value: V) {
        if self.max_size == 0 {
            return;
        }

        self.maybe_compact();
        if let Some(slot) = self.map.get_mut(&key) {
            slot.value = value;
            if self.policy == EvictionPolicy::Lru {
                self.clock += 1;
                slot.stamp = self.clock;
                self.order.push_back((key, self.clock));
            }
            return;
        }

        while self.map.len() >= self.max_size {
            if !self.evict_one() {
                break;
            }
        }

        self.clock += 1;
        self.order.push_back((key.clone(), self.clock));
        self.map.insert(
            key,
            Slot {
                value,
                stamp: self.clock,
            },
        );
    }

    /// Remove all entries and reset statistics
    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Number of live entries
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Capacity
    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Eviction policy in use
    #[inline]
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let total = self.hits + self.misses;
        let hit_rate = if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        };
        CacheStats {
            size: self.map.len(),
            max_size: self.max_size,
            hits: self.hits,
            misses: self.misses,
            hit_rate,
        }
    }

    /// Pop queue entries until a live one is found and remove it
    fn evict_one(&mut self) -> bool {
        while let Some((key, stamp)) = self.order.pop_front() {
            let live = self.map.get(&key).is_some_and(|slot| slot.stamp == stamp);
            if live {
                self.map.remove(&key);
                return true;
            }
        }
        false
    }

    fn maybe_compact(&mut self) {
        let limit = self.max_size.saturating_mul(2).saturating_add(16);
        if self.policy == EvictionPolicy::Lru && self.order.len() > limit {
            self.compact();
        }
    }

    /// Drop stale queue entries
    fn compact(&mut self) {
        let map = &self.map;
        self.order
            .retain(|(key, stamp)| map.get(key).is_some_and(|slot| slot.stamp == *stamp));
    }
}

/// The three caches owned by a [`Compiler`](super::compiler::Compiler)
#[derive(Debug, Clone)]
pub struct CacheSet {
    /// Raw class string -> parse result
    pub parse: BoundedCache<ParseResult>,
    /// Raw class string -> generated AST
    pub ast: BoundedCache<Vec<AstNode>>,
    /// Token -> "is a utility prefix"
    pub utility: BoundedCache<bool>,
}

impl CacheSet {
    /// Create caches sized from a config
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            parse: BoundedCache::new(config.parse_cache_size, config.eviction),
            ast: BoundedCache::new(config.ast_cache_size, config.eviction),
            utility: BoundedCache::new(config.utility_cache_size, config.eviction),
        }
    }

    /// Clear every cache
    pub fn clear_all(&mut self) {
        self.parse.clear();
        self.ast.clear();
        self.utility.clear();
    }
}

impl Default for CacheSet {
    fn default() -> Self {
        Self::from_config(&CompilerConfig::default())
    }
}
