//! Deterministic top-N ranking
//!
//! Every ordered listing in the engine goes through [`rank`]: entries are
//! sorted by score in the requested direction, ties fall back to the
//! ascending key, and the result is truncated. Hash-map iteration order
//! therefore never leaks into output.

use chrono::NaiveDate;
use std::cmp::Ordering;

/// Sort direction for the score component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A totally ordered ranking score
pub trait RankScore {
    fn cmp_score(&self, other: &Self) -> Ordering;
}

impl RankScore for f64 {
    fn cmp_score(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl RankScore for u32 {
    fn cmp_score(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl RankScore for NaiveDate {
    fn cmp_score(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

fn compare<K: Ord, S: RankScore>(a: &(K, S), b: &(K, S), direction: Direction) -> Ordering {
    let by_score = match direction {
        Direction::Ascending => a.1.cmp_score(&b.1),
        Direction::Descending => b.1.cmp_score(&a.1),
    };
    by_score.then_with(|| a.0.cmp(&b.0))
}

/// Sort `entries` by score (ties by ascending key) and keep the first `limit`
pub fn rank<K: Ord, S: RankScore>(
    mut entries: Vec<(K, S)>,
    direction: Direction,
    limit: usize,
) -> Vec<(K, S)> {
    entries.sort_by(|a, b| compare(a, b, direction));
    entries.truncate(limit);
    entries
}

/// [`rank`] and drop the scores
pub fn rank_keys<K: Ord, S: RankScore>(
    entries: Vec<(K, S)>,
    direction: Direction,
    limit: usize,
) -> Vec<K> {
    rank(entries, direction, limit)
        .into_iter()
        .map(|(key, _)| key)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_with_key_tiebreak() {
        let entries = vec![(3u64, 1.0), (1, 2.0), (2, 2.0), (4, 0.5)];
        let ranked = rank(entries, Direction::Descending, 10);
        assert_eq!(ranked, vec![(1, 2.0), (2, 2.0), (3, 1.0), (4, 0.5)]);
    }

    #[test]
    fn test_ascending_truncates() {
        let entries = vec![(10u64, 5u32), (11, 1), (12, 3)];
        assert_eq!(rank_keys(entries, Direction::Ascending, 2), vec![11, 12]);
    }

    #[test]
    fn test_zero_limit() {
        let entries = vec![(1u64, 1.0)];
        assert!(rank(entries, Direction::Descending, 0).is_empty());
    }

    #[test]
    fn test_dates_newest_first() {
        let d = |y| NaiveDate::from_ymd_opt(y, 1, 1).unwrap();
        let entries = vec![(1u64, d(1998)), (2, d(2021)), (3, d(2006))];
        assert_eq!(rank_keys(entries, Direction::Descending, 3), vec![2, 3, 1]);
    }
}
