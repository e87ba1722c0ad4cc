//! A fixed-capacity transposition cache.
//!
//! Open-addressed with exactly one slot per bucket: a stored entry is
//! simply overwritten by the next position that hashes to the same
//! bucket, with no probing and no replacement policy beyond that.
//! Capacity is always a power of two so that bucket selection is a
//! mask rather than a modulo.

use crate::basetypes::Color;
use crate::eval::Score;

#[derive(Debug, Clone, Copy)]
pub struct CacheEntry {
    hash: u64,
    active_color: Color,
    remaining_plies: u32,
    pub score: Score,
}

/// A power-of-two-sized, single-slot-per-bucket transposition table.
///
/// Grounded on the original engine's `SearchCache`: a bucket is
/// identified by `(hash, active_color, remaining_plies)` together, so
/// a shallower or deeper search of the same position never reads back
/// a stale score computed at the wrong depth.
pub struct TranspositionCache {
    slots: Vec<Option<CacheEntry>>,
    mask: u64,
}

const ENTRY_SIZE: usize = std::mem::size_of::<Option<CacheEntry>>();

impl TranspositionCache {
    /// Builds a cache sized to fit within `max_bytes`: the largest
    /// power-of-two slot count whose backing allocation does not
    /// exceed the budget. Returns `None` only if even a single slot
    /// cannot be allocated.
    pub fn new(max_bytes: usize) -> Option<TranspositionCache> {
        let max_slots = (max_bytes / ENTRY_SIZE).max(1);
        let mut capacity = max_slots.next_power_of_two();
        if capacity > max_slots {
            capacity = (capacity / 2).max(1);
        }

        loop {
            let mut slots = Vec::new();
            if slots.try_reserve_exact(capacity).is_ok() {
                slots.resize(capacity, None);
                return Some(TranspositionCache {
                    slots,
                    mask: (capacity - 1) as u64,
                });
            }
            if capacity == 1 {
                return None;
            }
            capacity /= 2;
        }
    }

    #[inline]
    fn bucket(&self, hash: u64) -> usize {
        (hash & self.mask) as usize
    }

    pub fn lookup(&self, hash: u64, active_color: Color, remaining_plies: u32) -> Option<Score> {
        let entry = self.slots[self.bucket(hash)]?;
        if entry.hash == hash
            && entry.active_color == active_color
            && entry.remaining_plies == remaining_plies
        {
            Some(entry.score)
        } else {
            None
        }
    }

    pub fn store(&mut self, hash: u64, active_color: Color, remaining_plies: u32, score: Score) {
        let bucket = self.bucket(hash);
        self.slots[bucket] = Some(CacheEntry {
            hash,
            active_color,
            remaining_plies,
            score,
        });
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_a_power_of_two() {
        let cache = TranspositionCache::new(1000).unwrap();
        assert!(cache.capacity().is_power_of_two());
    }

    #[test]
    fn stores_and_finds_an_exact_key() {
        let mut cache = TranspositionCache::new(1 << 20).unwrap();
        let score = Score::new(1.0, 2.0);
        cache.store(42, Color::White, 3, score);
        let found = cache.lookup(42, Color::White, 3).unwrap();
        assert_eq!(found.material, score.material);
    }

    #[test]
    fn misses_on_depth_mismatch() {
        let mut cache = TranspositionCache::new(1 << 20).unwrap();
        cache.store(42, Color::White, 3, Score::new(1.0, 2.0));
        assert!(cache.lookup(42, Color::White, 4).is_none());
    }

    #[test]
    fn misses_on_color_mismatch() {
        let mut cache = TranspositionCache::new(1 << 20).unwrap();
        cache.store(42, Color::White, 3, Score::new(1.0, 2.0));
        assert!(cache.lookup(42, Color::Black, 3).is_none());
    }

    #[test]
    fn colliding_bucket_overwrites_the_previous_entry() {
        let mut cache = TranspositionCache::new(16 * ENTRY_SIZE).unwrap();
        let capacity = cache.capacity() as u64;
        cache.store(1, Color::White, 0, Score::new(1.0, 0.0));
        cache.store(1 + capacity, Color::White, 0, Score::new(2.0, 0.0));
        assert!(cache.lookup(1, Color::White, 0).is_none());
        assert_eq!(
            cache.lookup(1 + capacity, Color::White, 0).unwrap().material,
            2.0
        );
    }

    /// No cache entry is ever returned whose inputs differ from its
    /// key tuple `(hash, active_color, remaining_plies)`, for randomly
    /// generated keys and perturbations of each, not just the
    /// hand-picked cases above.
    #[test]
    fn never_returns_an_entry_for_a_mismatched_key() {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        for _ in 0..500 {
            let mut cache = TranspositionCache::new(1 << 16).unwrap();
            let hash: u64 = rng.gen();
            let color = if rng.gen_bool(0.5) { Color::White } else { Color::Black };
            let plies: u32 = rng.gen_range(0..32);
            let score = Score::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0));

            cache.store(hash, color, plies, score);

            let found = cache.lookup(hash, color, plies).unwrap();
            assert_eq!(found.material, score.material);
            assert_eq!(found.heuristic, score.heuristic);

            assert!(cache.lookup(hash, color.opponent(), plies).is_none());
            assert!(cache.lookup(hash, color, plies.wrapping_add(1)).is_none());
            assert!(cache.lookup(hash.wrapping_add(1), color, plies).is_none());
        }
    }
}
