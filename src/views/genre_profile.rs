use super::View;
use crate::chart::{Chart, HeatmapCell, Series, TreemapCell};
use crate::config::GenreConfig;
use crate::data::{Dataset, Metric};
use crate::filter::{filter, FilterSpec, Selection, YearFilter};
use crate::format::round_to;
use crate::group::{group_reduce, keys, Group};
use crate::rank::rank;
use serde::Serialize;
use tracing::debug;

/// Selector values of the genre view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreQuery {
    pub region: Selection<String>,
    /// `All` means the configured year bounds
    pub year: Selection<i32>,
}

/// One genre of the popularity ranking, with display-scaled means
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreStat {
    /// Upper-cased for display
    pub name: String,
    pub popularity: f64,
    pub danceability: f64,
    pub energy: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreProfile {
    /// Options of the region selector
    pub regions: Vec<String>,
    /// Options of the year selector, newest first
    pub years: Vec<i32>,
    pub matched_tracks: usize,
    pub ranking: Vec<GenreStat>,
    pub radar: Chart,
    pub heatmap: Chart,
    pub treemap: Chart,
}

const RADAR_AXES: [&str; 3] = ["POPULARITY", "DANCEABILITY", "ENERGY"];

pub fn genre_profile(dataset: &Dataset, query: &GenreQuery, config: &GenreConfig) -> GenreProfile {
    let spec = FilterSpec::new()
        .region(query.region.clone())
        .years(YearFilter::bounded(&query.year, config.years))
        .require_genre();
    let matched = filter(dataset, &spec);
    debug!("Genre view matched {} of {} tracks", matched.len(), dataset.len());

    let groups = group_reduce(
        matched.iter().copied(),
        keys::genre,
        &[Metric::Popularity, Metric::Danceability, Metric::Energy],
    );
    let total = groups.len();
    let ranking: Vec<GenreStat> = rank(groups, |g| g.mean(Metric::Popularity), total)
        .iter()
        .map(|g| genre_stat(g, config.popularity_scale))
        .collect();

    let radar = Chart::Radar {
        title: "Genre profile".to_string(),
        axes: RADAR_AXES.iter().map(|a| a.to_string()).collect(),
        series: ranking
            .iter()
            .take(config.radar_top)
            .map(|g| {
                Series::new(
                    g.name.clone(),
                    vec![
                        round_to(g.popularity, 0),
                        round_to(g.danceability, 0),
                        round_to(g.energy, 0),
                    ],
                )
            })
            .collect(),
    };

    let heatmap = Chart::Heatmap {
        title: "Popularity by genre".to_string(),
        name: "Popularity".to_string(),
        cells: ranking
            .iter()
            .take(config.heatmap_top)
            .map(|g| HeatmapCell {
                x: g.name.clone(),
                y: round_to(g.popularity, 0),
            })
            .collect(),
    };

    // first entries of the popularity ranking, weighted by track count
    let treemap = Chart::Treemap {
        title: "Market weight".to_string(),
        cells: ranking
            .iter()
            .take(config.treemap_top)
            .map(|g| TreemapCell {
                x: g.name.clone(),
                y: g.count,
            })
            .collect(),
    };

    GenreProfile {
        regions: dataset.regions(),
        years: dataset.years_within(config.years),
        matched_tracks: matched.len(),
        ranking,
        radar,
        heatmap,
        treemap,
    }
}

fn genre_stat(group: &Group<String>, popularity_scale: f64) -> GenreStat {
    GenreStat {
        name: group.key.to_uppercase(),
        popularity: group.mean(Metric::Popularity) * popularity_scale,
        danceability: group.mean(Metric::Danceability) * 100.0,
        energy: group.mean(Metric::Energy) * 100.0,
        count: group.count(),
    }
}

impl View for GenreProfile {
    fn name(&self) -> &'static str {
        "genres"
    }

    fn charts(&self) -> Vec<(&'static str, &Chart)> {
        vec![
            ("radar", &self.radar),
            ("heatmap", &self.heatmap),
            ("treemap", &self.treemap),
        ]
    }
}
