use super::View;
use crate::chart::{Chart, Curve, ReferenceLine, Series};
use crate::config::EvolutionConfig;
use crate::data::Dataset;
use crate::format::{clock, round_to};
use crate::timeline::{time_series, YearPoint};
use serde::Serialize;

/// Yearly trends of the audio features
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evolution {
    pub points: Vec<YearPoint>,
    /// Energy and danceability, in percent
    pub mood: Chart,
    pub tempo: Chart,
    pub duration: Chart,
}

pub fn evolution(dataset: &Dataset, config: &EvolutionConfig) -> Evolution {
    let points = time_series(dataset, config.years);
    let categories: Vec<String> = points.iter().map(|p| p.year.to_string()).collect();

    let mood = Chart::Line {
        title: "Energy vs danceability".to_string(),
        curve: Curve::Smooth,
        filled: true,
        categories: categories.clone(),
        series: vec![
            Series::new("Energy", column(&points, |p| round_to(p.energy * 100.0, 1))),
            Series::new("Danceability", column(&points, |p| round_to(p.danceability * 100.0, 1))),
        ],
        reference: None,
    };

    let tempo = Chart::Line {
        title: "Tempo".to_string(),
        curve: Curve::Stepline,
        filled: false,
        categories: categories.clone(),
        series: vec![Series::new("BPM", column(&points, |p| round_to(p.tempo, 0)))],
        reference: None,
    };

    let duration = Chart::Line {
        title: "Duration".to_string(),
        curve: Curve::Smooth,
        filled: true,
        categories,
        series: vec![Series::new("Seconds", column(&points, |p| round_to(p.duration_seconds, 0)))],
        reference: Some(ReferenceLine {
            value: config.reference_seconds,
            label: format!("Limit {}", clock(config.reference_seconds)),
        }),
    };

    Evolution {
        points,
        mood,
        tempo,
        duration,
    }
}

fn column(points: &[YearPoint], value: impl Fn(&YearPoint) -> f64) -> Vec<f64> {
    points.iter().map(value).collect()
}

impl View for Evolution {
    fn name(&self) -> &'static str {
        "evolution"
    }

    fn charts(&self) -> Vec<(&'static str, &Chart)> {
        vec![
            ("mood", &self.mood),
            ("tempo", &self.tempo),
            ("duration", &self.duration),
        ]
    }
}
