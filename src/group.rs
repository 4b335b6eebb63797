use crate::data::{Metric, TrackRecord};
use std::collections::HashMap;
use std::hash::Hash;

/// Running aggregates of one group: record count plus a sum and a sample
/// count per metric. Means are derived at read time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accumulator {
    count: usize,
    sums: [f64; 5],
    samples: [usize; 5],
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record in, tracking only `metrics`.
    pub fn push(&mut self, record: &TrackRecord, metrics: &[Metric]) {
        self.count += 1;
        for &metric in metrics {
            if let Some(value) = record.metric(metric) {
                self.sums[metric.index()] += value;
                self.samples[metric.index()] += 1;
            }
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn sum(&self, metric: Metric) -> f64 {
        self.sums[metric.index()]
    }

    /// Number of records that contributed a value for `metric`
    pub fn samples(&self, metric: Metric) -> usize {
        self.samples[metric.index()]
    }

    /// sum / samples, or 0 when nothing contributed
    pub fn mean(&self, metric: Metric) -> f64 {
        let n = self.samples(metric);
        if n == 0 {
            0.0
        } else {
            self.sum(metric) / n as f64
        }
    }
}

/// A group key together with its aggregates
#[derive(Debug, Clone, PartialEq)]
pub struct Group<K> {
    pub key: K,
    pub stats: Accumulator,
}

impl<K> Group<K> {
    pub fn count(&self) -> usize {
        self.stats.count()
    }

    pub fn mean(&self, metric: Metric) -> f64 {
        self.stats.mean(metric)
    }
}

/// Group records by `key_fn` and reduce each group over `metrics`.
///
/// Groups come back in the order their key was first seen, which is what
/// ranking relies on for stable tie-breaking. Records for which `key_fn`
/// returns `None` are skipped.
pub fn group_reduce<'a, I, K, F>(records: I, mut key_fn: F, metrics: &[Metric]) -> Vec<Group<K>>
where
    I: IntoIterator<Item = &'a TrackRecord>,
    K: Eq + Hash + Clone,
    F: FnMut(&TrackRecord) -> Option<K>,
{
    let mut groups: Vec<Group<K>> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for record in records {
        let Some(key) = key_fn(record) else {
            continue;
        };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(Group {
                key,
                stats: Accumulator::new(),
            });
            groups.len() - 1
        });
        groups[slot].stats.push(record, metrics);
    }

    groups
}

/// Standard key functions
pub mod keys {
    use crate::data::TrackRecord;

    pub fn genre(record: &TrackRecord) -> Option<String> {
        record.genre().map(str::to_string)
    }

    /// Genre, with records lacking one collected under `fallback`
    pub fn genre_or(fallback: &str) -> impl Fn(&TrackRecord) -> Option<String> + '_ {
        move |record| Some(record.genre().unwrap_or(fallback).to_string())
    }

    pub fn region(record: &TrackRecord) -> Option<String> {
        record.region().map(str::to_string)
    }

    pub fn country(record: &TrackRecord) -> Option<String> {
        Some(record.country().to_string())
    }

    pub fn year(record: &TrackRecord) -> Option<i32> {
        record.year
    }
}
