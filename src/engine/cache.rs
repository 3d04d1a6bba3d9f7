//! FIFO + TTL solution cache.
//!
//! Keys are problem fingerprints. Capacity eviction removes the
//! oldest-inserted entry regardless of access recency (insertion order, not
//! LRU); expiry is checked lazily on lookup.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::model::OptimizationSolution;

struct CacheEntry {
    solution: Arc<OptimizationSolution>,
    expires_at: Instant,
}

/// Bounded cache of solved problems.
pub struct SolutionCache {
    capacity: usize,
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
    order: VecDeque<String>,
}

impl SolutionCache {
    /// Creates a cache with the given capacity and per-entry lifetime.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Looks up a live entry, dropping it if expired.
    pub fn get(&mut self, key: &str) -> Option<Arc<OptimizationSolution>> {
        let entry = self.entries.get(key)?;
        if Instant::now() >= entry.expires_at {
            self.entries.remove(key);
            self.order.retain(|k| k != key);
            return None;
        }
        Some(Arc::clone(&entry.solution))
    }

    /// Inserts a solution, evicting the oldest-inserted entry when full.
    ///
    /// Re-inserting an existing key refreshes its value and lifetime but
    /// keeps its original eviction position.
    pub fn insert(&mut self, key: String, solution: Arc<OptimizationSolution>) {
        if self.capacity == 0 {
            return;
        }
        let entry = CacheEntry {
            solution,
            expires_at: Instant::now() + self.ttl,
        };
        if self.entries.insert(key.clone(), entry).is_none() {
            if self.order.len() >= self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
            self.order.push_back(key);
        }
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classical::Algorithm;
    use crate::model::ExecutionMetrics;
    use std::collections::BTreeMap;

    fn solution(id: &str) -> Arc<OptimizationSolution> {
        Arc::new(OptimizationSolution {
            problem_id: id.into(),
            assignment: BTreeMap::new(),
            objective_values: vec![],
            fitness: 1.0,
            feasible: true,
            violations: vec![],
            confidence: 1.0,
            alternatives: vec![],
            algorithm: Algorithm::Genetic,
            execution: ExecutionMetrics::default(),
            analysis: None,
        })
    }

    #[test]
    fn test_hit_and_miss() {
        let mut cache = SolutionCache::new(4, Duration::from_secs(60));
        cache.insert("a".into(), solution("a"));
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn test_fifo_eviction_by_insertion_order() {
        let mut cache = SolutionCache::new(2, Duration::from_secs(60));
        cache.insert("first".into(), solution("first"));
        cache.insert("second".into(), solution("second"));
        // Touching "first" must not rescue it from eviction.
        assert!(cache.get("first").is_some());
        cache.insert("third".into(), solution("third"));

        assert!(cache.get("first").is_none());
        assert!(cache.get("second").is_some());
        assert!(cache.get("third").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_ttl_expiry() {
        let mut cache = SolutionCache::new(4, Duration::ZERO);
        cache.insert("a".into(), solution("a"));
        assert!(cache.get("a").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_reinsert_keeps_eviction_slot() {
        let mut cache = SolutionCache::new(2, Duration::from_secs(60));
        cache.insert("a".into(), solution("a"));
        cache.insert("b".into(), solution("b"));
        cache.insert("a".into(), solution("a2"));
        cache.insert("c".into(), solution("c"));
        // "a" kept its original (oldest) slot and is evicted first.
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut cache = SolutionCache::new(0, Duration::from_secs(60));
        cache.insert("a".into(), solution("a"));
        assert!(cache.get("a").is_none());
    }
}
