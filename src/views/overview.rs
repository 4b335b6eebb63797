use super::View;
use crate::chart::{Chart, Curve, Series};
use crate::config::OverviewConfig;
use crate::data::{Dataset, Metric};
use crate::format::{clock, round_to};
use crate::summary::{mean_duration, most_frequent, unique_artist_count};
use crate::timeline::time_series;
use serde::Serialize;

/// Headline figures of the whole dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_tracks: usize,
    pub unique_artists: usize,
    /// Most frequent known region
    pub top_region: Option<String>,
    /// Mean duration as `M:SS`
    pub average_duration: Option<String>,
    pub trend: Chart,
}

pub fn overview(dataset: &Dataset, config: &OverviewConfig) -> Overview {
    let trend_points = time_series(dataset, config.trend_years);

    let trend = Chart::Line {
        title: "Average popularity".to_string(),
        curve: Curve::Smooth,
        filled: true,
        categories: trend_points.iter().map(|p| p.year.to_string()).collect(),
        series: vec![Series::new(
            "Average popularity",
            trend_points
                .iter()
                .map(|p| round_to(p.metric(Metric::Popularity) * config.popularity_scale, 2))
                .collect(),
        )],
        reference: None,
    };

    Overview {
        total_tracks: dataset.len(),
        unique_artists: unique_artist_count(dataset),
        top_region: most_frequent(dataset.iter().filter_map(|r| r.region())),
        average_duration: mean_duration(dataset).map(clock),
        trend,
    }
}

impl View for Overview {
    fn name(&self) -> &'static str {
        "overview"
    }

    fn charts(&self) -> Vec<(&'static str, &Chart)> {
        vec![("trend", &self.trend)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TrackRecord;
    use crate::filter::YearRange;

    fn track(artists: &str, region: &str, year: i32, popularity: f64, duration: &str) -> TrackRecord {
        TrackRecord {
            artists: Some(artists.to_string()),
            region: Some(region.to_string()),
            year: Some(year),
            popularity: Some(popularity),
            duration_fmt: Some(duration.to_string()),
            ..TrackRecord::default()
        }
    }

    #[test]
    fn test_overview_figures() {
        let dataset = Dataset::new(vec![
            track("A, B", "Europe", 2000, 50.0, "3:00"),
            track("B & C", "Inconnu", 2000, 61.0, "4:01"),
            track("D", "Inconnu", 2002, 10.0, "bad"),
            track("A", "Asie", 2002, 20.0, "2:00"),
        ]);
        let config = OverviewConfig {
            trend_years: YearRange::new(2000, 2002),
            ..OverviewConfig::default()
        };
        let view = overview(&dataset, &config);

        assert_eq!(view.total_tracks, 4);
        assert_eq!(view.unique_artists, 4);
        // the sentinel is not a region
        assert_eq!(view.top_region.as_deref(), Some("Europe"));
        assert_eq!(view.average_duration.as_deref(), Some("3:00"));

        match &view.trend {
            Chart::Line { categories, series, filled, .. } => {
                assert!(*filled);
                assert_eq!(categories, &vec!["2000", "2001", "2002"]);
                assert_eq!(series[0].data, vec![55.5, 0.0, 15.0]);
            }
            other => panic!("unexpected chart {:?}", other),
        }
    }

    #[test]
    fn test_empty_dataset() {
        let view = overview(&Dataset::default(), &OverviewConfig::default());
        assert_eq!(view.total_tracks, 0);
        assert_eq!(view.top_region, None);
        assert_eq!(view.average_duration, None);
        assert_eq!(view.charts().len(), 1);
    }
}
