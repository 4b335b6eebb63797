use super::View;
use crate::chart::Chart;
use crate::config::GeoConfig;
use crate::data::Dataset;
use crate::format::{percent, round_to};
use crate::group::{group_reduce, keys};
use crate::rank::{rank_by_count, RankedEntry};
use serde::Serialize;

/// Track counts per country code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geography {
    /// Distinct country codes, the unknown group included
    pub country_count: usize,
    pub top_country: Option<String>,
    /// Share of all tracks held by the top country, in percent
    pub top_share: f64,
    pub ranking: Vec<RankedEntry>,
    pub chart: Chart,
}

pub fn geography(dataset: &Dataset, config: &GeoConfig) -> Geography {
    let groups = group_reduce(dataset, keys::country, &[]);
    let country_count = groups.len();
    let ranking = rank_by_count(groups, country_count);

    let (top_country, top_share) = match ranking.first() {
        Some(top) => (
            Some(top.label.clone()),
            round_to(percent(top.value, dataset.len() as f64), 1),
        ),
        None => (None, 0.0),
    };

    let top: Vec<RankedEntry> = ranking.iter().take(config.top_n).cloned().collect();
    let chart = Chart::ranked_bar("Top countries", "Tracks", &top, true);

    Geography {
        country_count,
        top_country,
        top_share,
        ranking,
        chart,
    }
}

impl View for Geography {
    fn name(&self) -> &'static str {
        "geo"
    }

    fn charts(&self) -> Vec<(&'static str, &Chart)> {
        vec![("countries", &self.chart)]
    }
}
