use super::CardId;
use rand::Rng;
use std::collections::BTreeMap;

/// Errors from multiset operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// A draw was attempted on an empty pool.
    Empty,
    /// The card has no remaining copies in the pool.
    NotFound,
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolError::Empty => write!(f, "card pool is empty"),
            PoolError::NotFound => write!(f, "card not in pool"),
        }
    }
}

impl std::error::Error for PoolError {}

/// Counted multiset of card ids, the "remaining cards" of a pool.
///
/// Keyed by BTreeMap so that draws under a seeded rng are reproducible.
/// Uniform-across-copies draws materialize a flat array with one entry per
/// remaining copy; the array is cached until the next structural mutation
/// so a batch of draws costs one materialization.
#[derive(Debug, Clone, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct CardPool {
    counts: BTreeMap<CardId, u32>,
    total: u64,
    #[serde(skip)]
    flat: Option<Vec<CardId>>,
}

impl CardPool {
    /// Sets the number of copies of a card. A count of zero (or less,
    /// saturated at zero by the caller) removes the entry entirely.
    pub fn set(&mut self, card: CardId, count: u32) {
        self.flat = None;
        if let Some(prev) = self.counts.remove(&card) {
            self.total -= prev as u64;
        }
        if count > 0 {
            self.counts.insert(card, count);
            self.total += count as u64;
        }
    }
    /// Adds copies of a card on top of any already present.
    pub fn add(&mut self, card: CardId, count: u32) {
        let prev = self.count(card);
        self.set(card, prev + count);
    }
    /// Removes a single copy. The flat cache is patched in place rather
    /// than invalidated so batched uniform draws stay cheap.
    pub fn remove_one(&mut self, card: CardId) -> Result<(), PoolError> {
        match self.counts.get_mut(&card) {
            None => Err(PoolError::NotFound),
            Some(1) => {
                self.counts.remove(&card);
                self.total -= 1;
                self.patch_flat(card);
                Ok(())
            }
            Some(n) => {
                *n -= 1;
                self.total -= 1;
                self.patch_flat(card);
                Ok(())
            }
        }
    }
    /// Draws a card with probability proportional to its remaining count.
    pub fn pick_weighted<R: Rng>(&self, rng: &mut R) -> Result<CardId, PoolError> {
        if self.total == 0 {
            return Err(PoolError::Empty);
        }
        let mut roll = rng.random_range(0..self.total);
        for (card, count) in &self.counts {
            if roll < *count as u64 {
                return Ok(*card);
            }
            roll -= *count as u64;
        }
        unreachable!("roll bounded by total")
    }
    /// Draws uniformly over remaining physical copies via the flat cache.
    pub fn pick_uniform_across_copies<R: Rng>(&mut self, rng: &mut R) -> Result<CardId, PoolError> {
        if self.total == 0 {
            return Err(PoolError::Empty);
        }
        let flat = self.flat.get_or_insert_with(|| {
            self.counts
                .iter()
                .flat_map(|(card, count)| std::iter::repeat_n(*card, *count as usize))
                .collect()
        });
        Ok(flat[rng.random_range(0..flat.len())])
    }
    pub fn count(&self, card: CardId) -> u32 {
        self.counts.get(&card).copied().unwrap_or(0)
    }
    /// Total remaining physical copies.
    pub fn total(&self) -> u64 {
        self.total
    }
    /// Number of distinct cards with at least one copy.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
    pub fn clear(&mut self) {
        self.counts.clear();
        self.total = 0;
        self.flat = None;
    }
    pub fn iter(&self) -> impl Iterator<Item = (CardId, u32)> + '_ {
        self.counts.iter().map(|(c, n)| (*c, *n))
    }
    pub fn cards(&self) -> impl Iterator<Item = CardId> + '_ {
        self.counts.keys().copied()
    }
    fn patch_flat(&mut self, card: CardId) {
        if let Some(flat) = &mut self.flat {
            if let Some(i) = flat.iter().position(|c| *c == card) {
                flat.swap_remove(i);
            }
        }
    }
}

impl FromIterator<(CardId, u32)> for CardPool {
    fn from_iter<I: IntoIterator<Item = (CardId, u32)>>(iter: I) -> Self {
        let mut pool = CardPool::default();
        for (card, count) in iter {
            pool.add(card, count);
        }
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn set_zero_removes_entry() {
        let card = CardId::default();
        let mut pool = CardPool::default();
        pool.set(card, 4);
        assert_eq!(pool.total(), 4);
        assert_eq!(pool.distinct(), 1);
        pool.set(card, 0);
        assert_eq!(pool.total(), 0);
        assert_eq!(pool.distinct(), 0);
    }
    #[test]
    fn remove_one_conserves_count() {
        let card = CardId::default();
        let mut pool = CardPool::default();
        pool.set(card, 3);
        pool.remove_one(card).unwrap();
        assert_eq!(pool.total(), 2);
        pool.remove_one(card).unwrap();
        pool.remove_one(card).unwrap();
        assert_eq!(pool.total(), 0);
        assert_eq!(pool.remove_one(card), Err(PoolError::NotFound));
    }
    #[test]
    fn draws_fail_on_empty() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut pool = CardPool::default();
        assert_eq!(pool.pick_weighted(&mut rng), Err(PoolError::Empty));
        assert_eq!(
            pool.pick_uniform_across_copies(&mut rng),
            Err(PoolError::Empty)
        );
    }
    #[test]
    fn uniform_never_returns_exhausted_card() {
        let mut rng = SmallRng::seed_from_u64(7);
        let a = CardId::default();
        let b = CardId::default();
        let mut pool = CardPool::default();
        pool.set(a, 1);
        pool.set(b, 5);
        // Prime the cache, then exhaust one card and keep drawing.
        pool.pick_uniform_across_copies(&mut rng).unwrap();
        pool.remove_one(a).unwrap();
        for _ in 0..64 {
            assert_eq!(pool.pick_uniform_across_copies(&mut rng).unwrap(), b);
        }
    }
    #[test]
    fn weighted_draw_respects_counts() {
        let mut rng = SmallRng::seed_from_u64(42);
        let a = CardId::default();
        let b = CardId::default();
        let mut pool = CardPool::default();
        pool.set(a, 99);
        pool.set(b, 1);
        let hits = (0..200)
            .filter(|_| pool.pick_weighted(&mut rng).unwrap() == a)
            .count();
        assert!(hits > 150, "expected heavy bias toward a, got {}", hits);
    }
    #[test]
    fn mutation_invalidates_flat_cache() {
        let mut rng = SmallRng::seed_from_u64(3);
        let a = CardId::default();
        let b = CardId::default();
        let mut pool = CardPool::default();
        pool.set(a, 2);
        pool.pick_uniform_across_copies(&mut rng).unwrap();
        pool.set(b, 8);
        let drew_b = (0..64).any(|_| pool.pick_uniform_across_copies(&mut rng).unwrap() == b);
        assert!(drew_b);
    }
}
