//! Chart-ready shapes produced by the views.
//!
//! These are plain values: a renderer consumes them, nothing mutates them
//! afterwards. Every value serialises to JSON with a `type` tag.

use crate::rank::RankedEntry;
use serde::Serialize;

/// A named row of values, aligned with the chart's categories or axes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub data: Vec<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Line interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    Smooth,
    Straight,
    Stepline,
}

/// Horizontal annotation on a line chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub x: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapCell {
    pub x: String,
    pub y: usize,
}

/// One level of a stacked chart. `labels[i]` names the item stacked at
/// category `i`, which differs from category to category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackLayer {
    pub name: String,
    pub data: Vec<f64>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    /// Percentage of the total, 0 when the total is 0
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Chart {
    Bar {
        title: String,
        horizontal: bool,
        categories: Vec<String>,
        series: Vec<Series>,
    },
    /// Line, area (`filled`) and step-line charts
    Line {
        title: String,
        curve: Curve,
        filled: bool,
        categories: Vec<String>,
        series: Vec<Series>,
        reference: Option<ReferenceLine>,
    },
    /// Values normalised to 0-100 on every axis
    Radar {
        title: String,
        axes: Vec<String>,
        series: Vec<Series>,
    },
    Heatmap {
        title: String,
        name: String,
        cells: Vec<HeatmapCell>,
    },
    Treemap {
        title: String,
        cells: Vec<TreemapCell>,
    },
    Stacked {
        title: String,
        categories: Vec<String>,
        layers: Vec<StackLayer>,
    },
    Doughnut {
        title: String,
        slices: Vec<Slice>,
    },
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Bar { title, .. }
            | Chart::Line { title, .. }
            | Chart::Radar { title, .. }
            | Chart::Heatmap { title, .. }
            | Chart::Treemap { title, .. }
            | Chart::Stacked { title, .. }
            | Chart::Doughnut { title, .. } => title,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Chart::Bar { .. } => "bar",
            Chart::Line { .. } => "line",
            Chart::Radar { .. } => "radar",
            Chart::Heatmap { .. } => "heatmap",
            Chart::Treemap { .. } => "treemap",
            Chart::Stacked { .. } => "stacked",
            Chart::Doughnut { .. } => "doughnut",
        }
    }

    /// Single-series bar chart from a ranked list
    pub fn ranked_bar(
        title: impl Into<String>,
        series_name: impl Into<String>,
        entries: &[RankedEntry],
        horizontal: bool,
    ) -> Self {
        Chart::Bar {
            title: title.into(),
            horizontal,
            categories: entries.iter().map(|e| e.label.clone()).collect(),
            series: vec![Series::new(
                series_name,
                entries.iter().map(|e| e.value).collect(),
            )],
        }
    }

    /// Whether the chart has nothing to draw
    pub fn is_empty(&self) -> bool {
        match self {
            Chart::Bar { categories, .. } | Chart::Line { categories, .. } => categories.is_empty(),
            Chart::Radar { series, .. } => series.is_empty(),
            Chart::Heatmap { cells, .. } => cells.is_empty(),
            Chart::Treemap { cells, .. } => cells.is_empty(),
            Chart::Stacked { categories, .. } => categories.is_empty(),
            Chart::Doughnut { slices, .. } => slices.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_bar() {
        let entries = vec![
            RankedEntry { label: "US".to_string(), value: 5.0, count: 5 },
            RankedEntry { label: "FR".to_string(), value: 2.0, count: 2 },
        ];
        let chart = Chart::ranked_bar("Top countries", "Tracks", &entries, true);
        assert_eq!(chart.kind(), "bar");
        assert_eq!(chart.title(), "Top countries");
        match chart {
            Chart::Bar { categories, series, horizontal, .. } => {
                assert!(horizontal);
                assert_eq!(categories, vec!["US", "FR"]);
                assert_eq!(series[0].data, vec![5.0, 2.0]);
            }
            other => panic!("unexpected chart {:?}", other),
        }
    }

    #[test]
    fn test_serialises_with_type_tag() {
        let chart = Chart::Treemap {
            title: "Market".to_string(),
            cells: vec![TreemapCell { x: "POP".to_string(), y: 3 }],
        };
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["type"], "treemap");
        assert_eq!(json["cells"][0]["x"], "POP");
        assert_eq!(json["cells"][0]["y"], 3);
    }

    #[test]
    fn test_curve_serialisation() {
        assert_eq!(serde_json::to_value(Curve::Stepline).unwrap(), "stepline");
    }
}
