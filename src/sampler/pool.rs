//! A generic indexable set with O(1) random pick and removal
//!
//! Parallel array plus key-to-index map; removal swaps the victim with the
//! last slot. Keys may carry an optional multiplicity, in which case a key
//! is handed out that many times before leaving the pool. Over-drawing is a
//! distinct, recoverable condition, never confused with a legitimately
//! empty batch.

use std::collections::HashMap;
use std::hash::Hash;

use rand::rngs::StdRng;
use rand::Rng;

use crate::{AmpRelsError, Result};

/// An indexed pool supporting O(1) insert, remove, and random draws
#[derive(Clone, Debug, Default)]
pub struct IndexedPool<K: Eq + Hash + Clone> {
    items: Vec<K>,
    index: HashMap<K, usize>,
    counts: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> IndexedPool<K> {
    /// Create an empty pool
    pub fn new() -> Self {
        IndexedPool {
            items: Vec::new(),
            index: HashMap::new(),
            counts: HashMap::new(),
        }
    }

    /// Build a pool from distinct keys
    pub fn from_keys(keys: impl IntoIterator<Item = K>) -> Self {
        let mut pool = Self::new();
        for key in keys {
            pool.insert(key);
        }
        pool
    }

    /// Build a pool where each key may be drawn `count` times
    pub fn from_counts(counted: impl IntoIterator<Item = (K, usize)>) -> Self {
        let mut pool = Self::new();
        for (key, count) in counted {
            if count == 0 {
                continue;
            }
            pool.insert(key.clone());
            if count > 1 {
                pool.counts.insert(key, count);
            }
        }
        pool
    }

    /// Number of distinct keys currently in the pool
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no keys remain
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total draws remaining, multiplicities included
    pub fn remaining(&self) -> usize {
        self.items
            .iter()
            .map(|k| self.counts.get(k).copied().unwrap_or(1))
            .sum()
    }

    /// Whether a key is present
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Add a key; a no-op if already present
    pub fn insert(&mut self, key: K) {
        if self.index.contains_key(&key) {
            return;
        }
        self.index.insert(key.clone(), self.items.len());
        self.items.push(key);
    }

    /// Remove a key by swapping with the last slot; returns whether it was
    /// present
    pub fn remove(&mut self, key: &K) -> bool {
        let position = match self.index.remove(key) {
            Some(p) => p,
            None => return false,
        };
        let last = self.items.pop().expect("index and items stay in sync");
        if position != self.items.len() {
            self.index.insert(last.clone(), position);
            self.items[position] = last;
        }
        self.counts.remove(key);
        true
    }

    /// A uniformly random key, without removing it
    pub fn random_key(&self, rng: &mut StdRng) -> Option<&K> {
        if self.items.is_empty() {
            return None;
        }
        Some(&self.items[rng.gen_range(0..self.items.len())])
    }

    /// Draw one key without replacement
    ///
    /// A key with multiplicity `n` is returned on `n` separate draws before
    /// it leaves the pool. Drawing from an empty pool is an exhaustion
    /// error.
    pub fn pop_random(&mut self, rng: &mut StdRng) -> Result<K> {
        if self.items.is_empty() {
            return Err(AmpRelsError::Exhausted {
                requested: 1,
                remaining: 0,
            });
        }
        let position = rng.gen_range(0..self.items.len());
        let key = self.items[position].clone();
        let decremented = match self.counts.get_mut(&key) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            _ => false,
        };
        if !decremented {
            self.remove(&key);
        }
        Ok(key)
    }

    /// Draw `n` keys without replacement
    ///
    /// Checked up front: asking for more than [`IndexedPool::remaining`]
    /// fails with the exhaustion error and leaves the pool untouched.
    pub fn pop_batch(&mut self, n: usize, rng: &mut StdRng) -> Result<Vec<K>> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(AmpRelsError::Exhausted {
                requested: n,
                remaining,
            });
        }
        (0..n).map(|_| self.pop_random(rng)).collect()
    }

    /// Draw `count` disjoint batches of `size` keys each
    pub fn pop_instances(
        &mut self,
        size: usize,
        count: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<Vec<K>>> {
        let needed = size.checked_mul(count).unwrap_or(usize::MAX);
        let remaining = self.remaining();
        if needed > remaining {
            return Err(AmpRelsError::Exhausted {
                requested: needed,
                remaining,
            });
        }
        (0..count).map(|_| self.pop_batch(size, rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_insert_remove_consistency() {
        let mut pool = IndexedPool::from_keys(["a", "b", "c", "d"]);
        assert_eq!(pool.len(), 4);
        assert!(pool.contains(&"b"));

        assert!(pool.remove(&"b"));
        assert!(!pool.contains(&"b"));
        assert_eq!(pool.len(), 3);
        // removing again is a no-op
        assert!(!pool.remove(&"b"));

        // swap-with-last kept the index valid: every key still removable
        for key in ["a", "c", "d"] {
            assert!(pool.remove(&key));
        }
        assert!(pool.is_empty());
    }

    #[test]
    fn test_duplicate_insert_ignored() {
        let mut pool = IndexedPool::new();
        pool.insert("a");
        pool.insert("a");
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_pop_until_exhausted() {
        let mut pool = IndexedPool::from_keys(["a", "b", "c"]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut drawn = Vec::new();
        for _ in 0..3 {
            drawn.push(pool.pop_random(&mut rng).unwrap());
        }
        drawn.sort_unstable();
        assert_eq!(drawn, vec!["a", "b", "c"]);

        let err = pool.pop_random(&mut rng).unwrap_err();
        assert!(matches!(
            err,
            AmpRelsError::Exhausted {
                requested: 1,
                remaining: 0
            }
        ));
    }

    #[test]
    fn test_multiplicity_draws() {
        let mut pool = IndexedPool::from_counts([("a", 3), ("b", 1)]);
        assert_eq!(pool.remaining(), 4);
        let mut rng = StdRng::seed_from_u64(1);

        let mut drawn = pool.pop_batch(4, &mut rng).unwrap();
        drawn.sort_unstable();
        assert_eq!(drawn, vec!["a", "a", "a", "b"]);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_over_draw_is_checked_up_front() {
        let mut pool = IndexedPool::from_keys([1, 2, 3]);
        let mut rng = StdRng::seed_from_u64(2);
        let err = pool.pop_batch(5, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            AmpRelsError::Exhausted {
                requested: 5,
                remaining: 3
            }
        ));
        // pool untouched
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_pop_instances() {
        let mut pool = IndexedPool::from_keys(0..10);
        let mut rng = StdRng::seed_from_u64(3);
        let batches = pool.pop_instances(2, 4, &mut rng).unwrap();
        assert_eq!(batches.len(), 4);
        assert!(batches.iter().all(|b| b.len() == 2));
        assert_eq!(pool.len(), 2);

        // a zero-size request is a valid empty result, not exhaustion
        let empty = pool.pop_instances(0, 3, &mut rng).unwrap();
        assert_eq!(empty, vec![Vec::<i32>::new(); 3]);
    }
}
