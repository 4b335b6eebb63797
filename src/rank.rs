use crate::data::Metric;
use crate::group::Group;
use serde::Serialize;
use std::cmp::Ordering;

/// One row of a ranked series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub label: String,
    pub value: f64,
    pub count: usize,
}

/// Sort descending by `stat` and keep the first `n`.
///
/// The sort is stable, so equal values keep their input order (first-seen
/// order when the input comes from `group_reduce`). Fewer than `n` items are
/// returned as they are.
pub fn rank<T, F>(mut items: Vec<T>, stat: F, n: usize) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| stat(b).partial_cmp(&stat(a)).unwrap_or(Ordering::Equal));
    items.truncate(n);
    items
}

/// Rank groups by the mean of `metric` and project them into entries.
pub fn rank_by_mean<K: ToString>(groups: Vec<Group<K>>, metric: Metric, n: usize) -> Vec<RankedEntry> {
    rank(groups, |g| g.mean(metric), n)
        .into_iter()
        .map(|g| RankedEntry {
            label: g.key.to_string(),
            value: g.mean(metric),
            count: g.count(),
        })
        .collect()
}

/// Rank groups by their record count.
pub fn rank_by_count<K: ToString>(groups: Vec<Group<K>>, n: usize) -> Vec<RankedEntry> {
    rank(groups, |g| g.count() as f64, n)
        .into_iter()
        .map(|g| RankedEntry {
            label: g.key.to_string(),
            value: g.count() as f64,
            count: g.count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TrackRecord;
    use crate::group::{group_reduce, keys};

    fn track(genre: &str, popularity: f64) -> TrackRecord {
        TrackRecord {
            track_genre: Some(genre.to_string()),
            popularity: Some(popularity),
            ..TrackRecord::default()
        }
    }

    #[test]
    fn test_rank_descending_and_truncated() {
        let ranked = rank(vec![3.0, 9.0, 1.0, 7.0], |v| *v, 3);
        assert_eq!(ranked, vec![9.0, 7.0, 3.0]);
    }

    #[test]
    fn test_rank_n_larger_than_input() {
        let ranked = rank(vec![1.0, 2.0], |v| *v, 10);
        assert_eq!(ranked, vec![2.0, 1.0]);
        assert!(rank(Vec::<f64>::new(), |v| *v, 5).is_empty());
    }

    #[test]
    fn test_rank_ties_keep_first_seen() {
        let items = vec![("a", 1.0), ("b", 5.0), ("c", 1.0), ("d", 5.0)];
        let ranked = rank(items, |(_, v)| *v, 4);
        let labels: Vec<&str> = ranked.iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let items = vec![("a", 2.0), ("b", 2.0), ("c", 8.0), ("d", 0.5), ("e", 8.0)];
        let once = rank(items, |(_, v)| *v, 3);
        let twice = rank(once.clone(), |(_, v)| *v, 3);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rank_by_mean_and_count() {
        let data = vec![
            track("rock", 40.0),
            track("pop", 90.0),
            track("rock", 60.0),
            track("jazz", 50.0),
        ];
        let by_mean = rank_by_mean(
            group_reduce(&data, keys::genre, &[Metric::Popularity]),
            Metric::Popularity,
            2,
        );
        assert_eq!(by_mean[0].label, "pop");
        assert_eq!(by_mean[1].label, "rock");
        assert_eq!(by_mean[1].value, 50.0);
        assert_eq!(by_mean[1].count, 2);

        let by_count = rank_by_count(group_reduce(&data, keys::genre, &[]), 10);
        assert_eq!(by_count[0].label, "rock");
        assert_eq!(by_count.len(), 3);
    }
}
