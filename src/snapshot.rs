use crate::chart::Chart;
use crate::data::{Metric, TrackRecord};
use crate::filter::YearRange;
use crate::group::{group_reduce, Group};
use crate::rank::{rank_by_mean, RankedEntry};
use std::collections::HashMap;
use tracing::debug;

/// Ranked genre popularity for every year of a range, computed once so that
/// scrubbing through the years is a lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotTable {
    range: YearRange,
    frames: HashMap<i32, Vec<RankedEntry>>,
}

impl SnapshotTable {
    pub fn range(&self) -> YearRange {
        self.range
    }

    /// Ranked entries of `year`; empty outside the range or for a year
    /// without data.
    pub fn get(&self, year: i32) -> &[RankedEntry] {
        self.frames.get(&year).map_or(&[], Vec::as_slice)
    }

    /// Horizontal bar chart of one frame
    pub fn frame_chart(&self, year: i32) -> Chart {
        Chart::ranked_bar(
            format!("Top genres {}", year),
            Metric::Popularity.label(),
            self.get(year),
            true,
        )
    }
}

/// Build the table with a single grouping pass over `records`: group by
/// (year, genre), then rank the genres of each year by mean popularity.
pub fn snapshot_by_year<'a, I>(records: I, range: YearRange, top_n: usize) -> SnapshotTable
where
    I: IntoIterator<Item = &'a TrackRecord>,
{
    let pairs = group_reduce(
        records,
        |r| {
            let year = r.year.filter(|y| range.contains(*y))?;
            Some((year, r.genre()?.to_string()))
        },
        &[Metric::Popularity],
    );

    let mut per_year: HashMap<i32, Vec<Group<String>>> = HashMap::new();
    for group in pairs {
        let (year, genre) = group.key;
        per_year.entry(year).or_default().push(Group {
            key: genre,
            stats: group.stats,
        });
    }

    let frames: HashMap<i32, Vec<RankedEntry>> = range
        .years()
        .map(|year| {
            let groups = per_year.remove(&year).unwrap_or_default();
            (year, rank_by_mean(groups, Metric::Popularity, top_n))
        })
        .collect();
    debug!("Precomputed {} snapshot frames", frames.len());

    SnapshotTable { range, frames }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(year: i32, genre: &str, popularity: f64) -> TrackRecord {
        TrackRecord {
            year: Some(year),
            track_genre: Some(genre.to_string()),
            popularity: Some(popularity),
            ..TrackRecord::default()
        }
    }

    fn sample() -> Vec<TrackRecord> {
        vec![
            track(2000, "pop", 60.0),
            track(2000, "rock", 80.0),
            track(2000, "pop", 80.0),
            track(2000, "jazz", 10.0),
            track(2001, "edm", 50.0),
            track(1999, "pop", 100.0),
        ]
    }

    #[test]
    fn test_frames_ranked_per_year() {
        let data = sample();
        let table = snapshot_by_year(&data, YearRange::new(2000, 2002), 2);

        let frame = table.get(2000);
        assert_eq!(frame.len(), 2);
        assert_eq!(frame[0].label, "rock");
        assert_eq!(frame[1].label, "pop");
        assert_eq!(frame[1].value, 70.0);
        assert_eq!(frame[1].count, 2);

        assert_eq!(table.get(2001)[0].label, "edm");
        assert!(table.get(2002).is_empty());
    }

    #[test]
    fn test_out_of_range_is_empty() {
        let data = sample();
        let table = snapshot_by_year(&data, YearRange::new(2000, 2001), 10);
        assert!(table.get(1999).is_empty());
        assert!(table.get(2050).is_empty());
    }

    #[test]
    fn test_frame_chart() {
        let data = sample();
        let table = snapshot_by_year(&data, YearRange::new(2000, 2001), 10);
        match table.frame_chart(2000) {
            Chart::Bar { title, categories, .. } => {
                assert_eq!(title, "Top genres 2000");
                assert_eq!(categories, vec!["rock", "pop", "jazz"]);
            }
            other => panic!("unexpected chart {:?}", other),
        }
    }
}
