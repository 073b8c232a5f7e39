//! Cache admission and eviction guided by predicted next-access times.
//!
//! Eviction follows Belady's farthest-in-future rule with the predictions
//! standing in for the true future: on a miss at capacity, the resident
//! entry whose predicted next access lies farthest ahead is dropped. An
//! entry with no prediction at all is treated as never requested again and
//! is evicted ahead of every predicted entry.
//!
//! The primitive holds no cache of its own: the caller owns the cache value,
//! passes it in, and receives the post-decision state back.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use corelib::error::DecisionError;

pub type ItemId = u64;

#[derive(Clone, Debug)]
pub struct Caching {
    /// Maximum number of resident items.
    cache_size: usize,

    /// Predicted next-access time per item. Items absent from the map are
    /// assumed to never be requested again.
    predictions: HashMap<ItemId, u64>,
}

impl Caching {
    pub fn new(cache_size: usize, predictions: HashMap<ItemId, u64>) -> Self {
        Self {
            cache_size,
            predictions,
        }
    }

    /// Returns whether the request hit, plus the cache state after admission.
    ///
    /// Guarantees:
    /// - The input cache is never mutated, on any path.
    /// - Retained entries keep their relative order; an admitted item is
    ///   appended at the tail.
    /// - On a miss at capacity exactly one resident entry is evicted and the
    ///   requested item takes its place.
    #[instrument(
        skip(self, cache),
        target = "caching",
        fields(cache_size = self.cache_size, cache_len = cache.len())
    )]
    pub fn decide(
        &self,
        item: ItemId,
        cache: &[ItemId],
    ) -> Result<(bool, Vec<ItemId>), DecisionError> {
        self.check_cache(cache)?;

        if cache.contains(&item) {
            debug!(item, "cache hit");
            return Ok((true, cache.to_vec()));
        }

        if cache.len() < self.cache_size {
            let mut next = Vec::with_capacity(cache.len() + 1);
            next.extend_from_slice(cache);
            next.push(item);

            debug!(item, "cache miss; admitted without eviction");
            return Ok((false, next));
        }

        // Miss at capacity: evict one resident entry, then admit. With a
        // zero-capacity cache there is nothing to evict and nothing fits.
        let Some(victim_pos) = self.pick_victim(cache) else {
            debug!(item, "cache miss; zero-capacity cache admits nothing");
            return Ok((false, Vec::new()));
        };

        let mut next: Vec<ItemId> = cache
            .iter()
            .enumerate()
            .filter(|(pos, _)| *pos != victim_pos)
            .map(|(_, entry)| *entry)
            .collect();
        next.push(item);

        debug!(item, evicted = cache[victim_pos], "cache miss; evicted resident entry");
        Ok((false, next))
    }

    /// Position of the eviction victim among resident entries.
    ///
    /// Entries without a prediction win outright (next access at infinity);
    /// otherwise the largest predicted next-access wins. Ties keep the
    /// earliest inserted entry as victim.
    fn pick_victim(&self, cache: &[ItemId]) -> Option<usize> {
        let mut unpredicted: Option<usize> = None;
        let mut farthest: Option<(usize, u64)> = None;

        for (pos, entry) in cache.iter().enumerate() {
            match self.predictions.get(entry) {
                None => {
                    if unpredicted.is_none() {
                        unpredicted = Some(pos);
                    }
                }
                Some(&next_access) => {
                    let replace = match farthest {
                        None => true,
                        Some((_, best)) => next_access > best,
                    };

                    if replace {
                        farthest = Some((pos, next_access));
                    }
                }
            }
        }

        unpredicted.or(farthest.map(|(pos, _)| pos))
    }

    fn check_cache(&self, cache: &[ItemId]) -> Result<(), DecisionError> {
        if cache.len() > self.cache_size {
            return Err(DecisionError::InvariantViolation(format!(
                "cache holds {} items but cache_size is {}",
                cache.len(),
                self.cache_size
            )));
        }

        let mut seen = HashSet::with_capacity(cache.len());
        for entry in cache {
            if !seen.insert(entry) {
                return Err(DecisionError::InvariantViolation(format!(
                    "cache contains duplicate item {entry}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictions(pairs: &[(ItemId, u64)]) -> HashMap<ItemId, u64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn hit_leaves_cache_unchanged() {
        let caching = Caching::new(2, predictions(&[(1, 10), (2, 5)]));

        let (hit, new_cache) = caching.decide(1, &[1, 2]).unwrap();

        assert!(hit);
        assert_eq!(new_cache, vec![1, 2]);
    }

    #[test]
    fn miss_below_capacity_appends() {
        let caching = Caching::new(3, predictions(&[(1, 10)]));

        let (hit, new_cache) = caching.decide(9, &[1, 2]).unwrap();

        assert!(!hit);
        assert_eq!(new_cache, vec![1, 2, 9]);
    }

    #[test]
    fn full_cache_evicts_farthest_predicted_entry() {
        // 1 is predicted farther out than 2, so 1 goes.
        let caching = Caching::new(2, predictions(&[(1, 10), (2, 5)]));

        let (hit, new_cache) = caching.decide(3, &[1, 2]).unwrap();

        assert!(!hit);
        assert_eq!(new_cache, vec![2, 3]);
    }

    #[test]
    fn full_cache_evicts_resident_not_incoming() {
        // The incoming item has the farthest prediction of all, but eviction
        // only considers resident entries.
        let caching = Caching::new(2, predictions(&[(1, 10), (2, 5), (3, 12)]));

        let (hit, new_cache) = caching.decide(3, &[1, 2]).unwrap();

        assert!(!hit);
        assert_eq!(new_cache, vec![2, 3]);
    }

    #[test]
    fn unpredicted_entries_are_evicted_first() {
        // 1 has no prediction entry, so it is dropped even though 2's
        // predicted next access is sooner.
        let caching = Caching::new(2, predictions(&[(2, 5)]));

        let (hit, new_cache) = caching.decide(3, &[1, 2]).unwrap();

        assert!(!hit);
        assert_eq!(new_cache, vec![2, 3]);
    }

    #[test]
    fn unpredicted_tie_breaks_to_earliest_position() {
        let caching = Caching::new(3, HashMap::new());

        let (_, new_cache) = caching.decide(4, &[7, 8, 9]).unwrap();

        assert_eq!(new_cache, vec![8, 9, 4]);
    }

    #[test]
    fn predicted_tie_breaks_to_earliest_position() {
        let caching = Caching::new(3, predictions(&[(7, 5), (8, 9), (9, 9)]));

        let (_, new_cache) = caching.decide(4, &[7, 8, 9]).unwrap();

        assert_eq!(new_cache, vec![7, 9, 4], "8 and 9 tie; 8 was inserted first");
    }

    #[test]
    fn zero_capacity_cache_admits_nothing() {
        let caching = Caching::new(0, HashMap::new());

        let (hit, new_cache) = caching.decide(1, &[]).unwrap();

        assert!(!hit);
        assert!(new_cache.is_empty());
    }

    #[test]
    fn oversized_cache_is_an_invariant_violation() {
        let caching = Caching::new(1, HashMap::new());

        let err = caching.decide(3, &[1, 2]).unwrap_err();
        assert!(matches!(err, DecisionError::InvariantViolation(_)));
    }

    #[test]
    fn duplicate_entries_are_an_invariant_violation() {
        let caching = Caching::new(4, HashMap::new());

        let err = caching.decide(3, &[1, 2, 1]).unwrap_err();
        assert!(matches!(err, DecisionError::InvariantViolation(_)));
        assert!(err.to_string().contains('1'));
    }

    #[test]
    fn input_cache_is_not_mutated() {
        let caching = Caching::new(2, predictions(&[(1, 10), (2, 5)]));
        let cache = vec![1, 2];

        let _ = caching.decide(3, &cache).unwrap();
        let _ = caching.decide(3, &[1, 1]).unwrap_err();

        assert_eq!(cache, vec![1, 2]);
    }
}
