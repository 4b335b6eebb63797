use crate::data::{Metric, TrackRecord};
use crate::filter::YearRange;
use crate::group::{group_reduce, keys, Accumulator};
use serde::Serialize;
use std::collections::HashMap;

/// Aggregates of one year. Means are raw (0-1 for energy/danceability);
/// views apply display scaling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: i32,
    pub count: usize,
    pub popularity: f64,
    pub energy: f64,
    pub danceability: f64,
    pub tempo: f64,
    pub duration_seconds: f64,
}

impl YearPoint {
    fn from_stats(year: i32, stats: Option<&Accumulator>) -> Self {
        let mean = |metric| stats.map_or(0.0, |s| s.mean(metric));
        Self {
            year,
            count: stats.map_or(0, Accumulator::count),
            popularity: mean(Metric::Popularity),
            energy: mean(Metric::Energy),
            danceability: mean(Metric::Danceability),
            tempo: mean(Metric::Tempo),
            duration_seconds: mean(Metric::Duration),
        }
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Popularity => self.popularity,
            Metric::Energy => self.energy,
            Metric::Danceability => self.danceability,
            Metric::Tempo => self.tempo,
            Metric::Duration => self.duration_seconds,
        }
    }
}

/// One point per year of `range`, in order. Years without records report 0
/// for every metric.
pub fn time_series<'a, I>(records: I, range: YearRange) -> Vec<YearPoint>
where
    I: IntoIterator<Item = &'a TrackRecord>,
{
    let groups = group_reduce(
        records,
        |r| keys::year(r).filter(|y| range.contains(*y)),
        &Metric::ALL,
    );
    let by_year: HashMap<i32, Accumulator> =
        groups.into_iter().map(|g| (g.key, g.stats)).collect();

    range
        .years()
        .map(|year| YearPoint::from_stats(year, by_year.get(&year)))
        .collect()
}
