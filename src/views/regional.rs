use super::View;
use crate::chart::{Chart, Slice};
use crate::config::RegionConfig;
use crate::data::{Dataset, Metric};
use crate::filter::{filter, FilterSpec};
use crate::format::round_to;
use crate::group::{group_reduce, keys};
use crate::rank::rank_by_count;
use crate::stack::top_k_per_group;
use crate::summary::shares;
use serde::Serialize;

/// Genre leaders and track shares per region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Regional {
    pub leaders: Chart,
    pub shares: Chart,
}

pub fn regional(dataset: &Dataset, config: &RegionConfig) -> Regional {
    let clean = filter(dataset, &FilterSpec::new().require_region().require_genre());

    let stacked = top_k_per_group(
        clean.iter().copied(),
        keys::region,
        keys::genre,
        Metric::Popularity,
        config.genres_per_region,
    );
    let mut layers = stacked.layers(|i| format!("Top {}", i + 1));
    for layer in &mut layers {
        for value in &mut layer.data {
            *value = round_to(*value * config.popularity_scale, 1);
        }
    }
    let leaders = Chart::Stacked {
        title: "Leading genres by region".to_string(),
        categories: stacked.categories,
        layers,
    };

    let regions = group_reduce(dataset, keys::region, &[]);
    let total = regions.len();
    let slices: Vec<Slice> = shares(&rank_by_count(regions, total))
        .into_iter()
        .map(|s| Slice {
            share: round_to(s.share, 1),
            ..s
        })
        .collect();
    let shares = Chart::Doughnut {
        title: "Tracks by region".to_string(),
        slices,
    };

    Regional { leaders, shares }
}

impl View for Regional {
    fn name(&self) -> &'static str {
        "regions"
    }

    fn charts(&self) -> Vec<(&'static str, &Chart)> {
        vec![("leaders", &self.leaders), ("shares", &self.shares)]
    }
}
