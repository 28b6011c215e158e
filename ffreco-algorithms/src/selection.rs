//! Deterministic best-candidate selection.
//!
//! Candidates expose a ranking key whose `Ord` is lexicographic in field
//! declaration order; selection is a single reduction to the smallest key.

use std::cmp::Ordering;

/// `f64` with the IEEE-754 total order, usable as an `Ord` key field.
#[derive(Debug, Clone, Copy)]
pub struct TotalF64(pub f64);

impl PartialEq for TotalF64 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TotalF64 {}

impl PartialOrd for TotalF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TotalF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A candidate that can be ranked; smaller keys are preferred.
pub trait Ranked {
    /// Key type with the preference order.
    type Key: Ord;

    /// Ranking key of the candidate.
    fn rank_key(&self) -> Self::Key;
}

/// Returns the candidate with the smallest key, or `None` for an empty pool.
///
/// Candidates with identical keys resolve to the first one in the pool.
pub fn select_best<T: Ranked>(pool: &[T]) -> Option<&T> {
    pool.iter().min_by_key(|candidate| candidate.rank_key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Reverse;

    struct Item {
        class: u8,
        score: f64,
        size: f64,
    }

    impl Ranked for Item {
        type Key = (u8, TotalF64, Reverse<TotalF64>);

        fn rank_key(&self) -> Self::Key {
            (self.class, TotalF64(self.score), Reverse(TotalF64(self.size)))
        }
    }

    #[test]
    fn test_total_f64_order() {
        assert!(TotalF64(-1.0) < TotalF64(0.5));
        assert_eq!(TotalF64(2.0), TotalF64(2.0));
        assert!(TotalF64(1.0) < TotalF64(f64::NAN));
    }

    #[test]
    fn test_field_priority() {
        let pool = vec![
            Item {
                class: 1,
                score: 0.0,
                size: 100.0,
            },
            Item {
                class: 0,
                score: 5.0,
                size: 1.0,
            },
            Item {
                class: 0,
                score: 5.0,
                size: 2.0,
            },
        ];
        let best = select_best(&pool).unwrap();
        assert_eq!(best.class, 0);
        assert!((best.size - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_pool() {
        let pool: Vec<Item> = Vec::new();
        assert!(select_best(&pool).is_none());
    }
}
