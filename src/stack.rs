use crate::chart::StackLayer;
use crate::data::{Metric, TrackRecord};
use crate::group::{group_reduce, Group};
use crate::rank::{rank_by_mean, RankedEntry};
use std::collections::HashMap;

/// Top-k inner groups per outer group, e.g. the three most popular genres of
/// every region.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedRanking {
    /// Outer keys, sorted by name
    pub categories: Vec<String>,
    /// `levels[i][c]` is the (i+1)-th ranked inner group of category `c`;
    /// `None` when that category has fewer than i+1 inner groups
    pub levels: Vec<Vec<Option<RankedEntry>>>,
}

impl StackedRanking {
    /// Project into stack layers: one layer per rank level, with the inner
    /// group names in a parallel label array. Gaps become 0 with an empty label.
    pub fn layers(&self, level_name: impl Fn(usize) -> String) -> Vec<StackLayer> {
        self.levels
            .iter()
            .enumerate()
            .map(|(i, level)| StackLayer {
                name: level_name(i),
                data: level
                    .iter()
                    .map(|e| e.as_ref().map_or(0.0, |e| e.value))
                    .collect(),
                labels: level
                    .iter()
                    .map(|e| e.as_ref().map_or_else(String::new, |e| e.label.clone()))
                    .collect(),
            })
            .collect()
    }
}

/// Rank inner groups by mean `metric` independently within each outer group
/// and keep the top `k` of each.
pub fn top_k_per_group<'a, I, O, N>(
    records: I,
    outer: O,
    inner: N,
    metric: Metric,
    k: usize,
) -> StackedRanking
where
    I: IntoIterator<Item = &'a TrackRecord>,
    O: Fn(&TrackRecord) -> Option<String>,
    N: Fn(&TrackRecord) -> Option<String>,
{
    let pairs = group_reduce(records, |r| Some((outer(r)?, inner(r)?)), &[metric]);

    // split the composite groups by outer key, keeping first-seen inner order
    let mut buckets: Vec<(String, Vec<Group<String>>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for group in pairs {
        let (outer_key, inner_key) = group.key;
        let slot = match index.get(&outer_key) {
            Some(&slot) => slot,
            None => {
                index.insert(outer_key.clone(), buckets.len());
                buckets.push((outer_key, Vec::new()));
                buckets.len() - 1
            }
        };
        buckets[slot].1.push(Group {
            key: inner_key,
            stats: group.stats,
        });
    }
    buckets.sort_by(|a, b| a.0.cmp(&b.0));

    let mut categories = Vec::with_capacity(buckets.len());
    let mut levels: Vec<Vec<Option<RankedEntry>>> = vec![Vec::with_capacity(buckets.len()); k];
    for (outer_key, groups) in buckets {
        let mut ranked = rank_by_mean(groups, metric, k).into_iter();
        for level in levels.iter_mut() {
            level.push(ranked.next());
        }
        categories.push(outer_key);
    }

    StackedRanking { categories, levels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::keys;

    fn track(region: &str, genre: &str, popularity: f64) -> TrackRecord {
        TrackRecord {
            region: Some(region.to_string()),
            track_genre: Some(genre.to_string()),
            popularity: Some(popularity),
            ..TrackRecord::default()
        }
    }

    fn sample() -> Vec<TrackRecord> {
        vec![
            track("Europe", "pop", 70.0),
            track("Europe", "rock", 60.0),
            track("Europe", "jazz", 80.0),
            track("Europe", "metal", 10.0),
            track("Asie", "k-pop", 90.0),
            track("Inconnu", "pop", 99.0),
        ]
    }

    #[test]
    fn test_each_region_ranked_independently() {
        let data = sample();
        let stacked = top_k_per_group(&data, keys::region, keys::genre, Metric::Popularity, 3);

        assert_eq!(stacked.categories, vec!["Asie", "Europe"]);
        assert_eq!(stacked.levels.len(), 3);

        let first: Vec<&str> = stacked.levels[0]
            .iter()
            .map(|e| e.as_ref().unwrap().label.as_str())
            .collect();
        assert_eq!(first, vec!["k-pop", "jazz"]);

        // Asie has a single genre
        assert!(stacked.levels[1][0].is_none());
        assert_eq!(stacked.levels[2][1].as_ref().unwrap().label, "rock");
    }

    #[test]
    fn test_layers_carry_parallel_labels() {
        let data = sample();
        let stacked = top_k_per_group(&data, keys::region, keys::genre, Metric::Popularity, 2);
        let layers = stacked.layers(|i| format!("Top {}", i + 1));

        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].name, "Top 1");
        assert_eq!(layers[0].data, vec![90.0, 80.0]);
        assert_eq!(layers[0].labels, vec!["k-pop", "jazz"]);
        assert_eq!(layers[1].data, vec![0.0, 70.0]);
        assert_eq!(layers[1].labels, vec!["", "pop"]);
    }

    #[test]
    fn test_empty_input() {
        let data: Vec<TrackRecord> = Vec::new();
        let stacked = top_k_per_group(&data, keys::region, keys::genre, Metric::Popularity, 3);
        assert!(stacked.categories.is_empty());
        assert!(stacked.levels.iter().all(Vec::is_empty));
    }
}
