use crate::chart::Slice;
use crate::data::TrackRecord;
use crate::format::percent;
use crate::parser::split_artists;
use crate::rank::RankedEntry;
use std::collections::{HashMap, HashSet};

/// Number of distinct artist names across `records`. Names are split on the
/// recognised separators and compared exactly. A blank token counts as one
/// name; a record whose `artists` is empty is skipped.
pub fn unique_artist_count<'a, I>(records: I) -> usize
where
    I: IntoIterator<Item = &'a TrackRecord>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    for record in records {
        if let Some(artists) = record.artists.as_deref().filter(|a| !a.is_empty()) {
            seen.extend(split_artists(artists));
        }
    }
    seen.len()
}

/// The most frequent value. On a tie the value that reached the top count
/// first wins.
pub fn most_frequent<I, S>(values: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut best: Option<(String, usize)> = None;

    for value in values {
        let value = value.as_ref();
        let count = counts.entry(value.to_string()).or_insert(0);
        *count += 1;
        if best.as_ref().map_or(true, |(_, top)| *count > *top) {
            best = Some((value.to_string(), *count));
        }
    }

    best.map(|(value, _)| value)
}

/// Mean parsed duration in seconds over the records with a valid duration
pub fn mean_duration<'a, I>(records: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a TrackRecord>,
{
    let (sum, n) = records
        .into_iter()
        .filter_map(TrackRecord::duration_seconds)
        .fold((0u64, 0usize), |(sum, n), s| (sum + u64::from(s), n + 1));
    (n > 0).then(|| sum as f64 / n as f64)
}

/// Each entry's share of the summed values, in percent
pub fn shares(entries: &[RankedEntry]) -> Vec<Slice> {
    let total: f64 = entries.iter().map(|e| e.value).sum();
    entries
        .iter()
        .map(|e| Slice {
            label: e.label.clone(),
            value: e.value,
            share: percent(e.value, total),
        })
        .collect()
}
