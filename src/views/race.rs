use super::View;
use crate::chart::Chart;
use crate::config::RaceConfig;
use crate::data::Dataset;
use crate::rank::RankedEntry;
use crate::snapshot::{snapshot_by_year, SnapshotTable};
use serde::Serialize;

/// One frame of the genre race
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceFrame {
    pub year: i32,
    pub entries: Vec<RankedEntry>,
    pub chart: Chart,
}

impl RaceFrame {
    pub fn at(table: &SnapshotTable, year: i32) -> Self {
        Self {
            year,
            entries: table.get(year).to_vec(),
            chart: table.frame_chart(year),
        }
    }
}

/// Precompute every frame of the configured range
pub fn race(dataset: &Dataset, config: &RaceConfig) -> SnapshotTable {
    snapshot_by_year(dataset, config.years, config.top_n)
}

impl View for RaceFrame {
    fn name(&self) -> &'static str {
        "race"
    }

    fn charts(&self) -> Vec<(&'static str, &Chart)> {
        vec![("frame", &self.chart)]
    }
}
