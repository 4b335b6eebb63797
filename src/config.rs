use crate::filter::YearRange;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Per-view settings. Every field has a default, so a config file only needs
/// to name what it overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub overview: OverviewConfig,
    #[serde(default)]
    pub genres: GenreConfig,
    #[serde(default)]
    pub geography: GeoConfig,
    #[serde(default)]
    pub evolution: EvolutionConfig,
    #[serde(default)]
    pub regions: RegionConfig,
    #[serde(default)]
    pub race: RaceConfig,
    #[serde(default)]
    pub render: RenderOptions,
}

impl DashboardConfig {
    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewConfig {
    /// Years of the popularity trend
    #[serde(default = "default_trend_years")]
    pub trend_years: YearRange,
    #[serde(default = "default_scale")]
    pub popularity_scale: f64,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            trend_years: default_trend_years(),
            popularity_scale: default_scale(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreConfig {
    /// What the "all" year selector covers
    #[serde(default = "default_years")]
    pub years: YearRange,
    #[serde(default = "default_radar_top")]
    pub radar_top: usize,
    #[serde(default = "default_heatmap_top")]
    pub heatmap_top: usize,
    #[serde(default = "default_treemap_top")]
    pub treemap_top: usize,
    #[serde(default = "default_scale")]
    pub popularity_scale: f64,
}

impl Default for GenreConfig {
    fn default() -> Self {
        Self {
            years: default_years(),
            radar_top: default_radar_top(),
            heatmap_top: default_heatmap_top(),
            treemap_top: default_treemap_top(),
            popularity_scale: default_scale(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    #[serde(default = "default_years")]
    pub years: YearRange,
    /// Reference line drawn on the duration chart, in seconds
    #[serde(default = "default_reference_seconds")]
    pub reference_seconds: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            years: default_years(),
            reference_seconds: default_reference_seconds(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    #[serde(default = "default_genres_per_region")]
    pub genres_per_region: usize,
    #[serde(default = "default_scale")]
    pub popularity_scale: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            genres_per_region: default_genres_per_region(),
            popularity_scale: default_scale(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceConfig {
    #[serde(default = "default_years")]
    pub years: YearRange,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Delay between two frames during playback
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            years: default_years(),
            top_n: default_top_n(),
            interval_ms: default_interval_ms(),
        }
    }
}

/// Size of rendered images
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_years() -> YearRange { YearRange::new(1980, 2022) }
fn default_trend_years() -> YearRange { YearRange::new(2000, 2023) }
fn default_scale() -> f64 { 1.0 }
fn default_radar_top() -> usize { 3 }
fn default_heatmap_top() -> usize { 10 }
fn default_treemap_top() -> usize { 20 }
fn default_top_n() -> usize { 10 }
fn default_reference_seconds() -> f64 { 180.0 }
fn default_genres_per_region() -> usize { 3 }
fn default_interval_ms() -> u64 { 800 }
fn default_width() -> u32 { 1000 }
fn default_height() -> u32 { 600 }

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.genres.years, YearRange::new(1980, 2022));
        assert_eq!(config.overview.trend_years, YearRange::new(2000, 2023));
        assert_eq!(config.genres.radar_top, 3);
        assert_eq!(config.evolution.reference_seconds, 180.0);
        assert_eq!(config.render.width, 1000);
    }

    #[test]
    fn test_partial_file_overrides_only_named_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"genres": {{"heatmap_top": 5}}, "race": {{"years": {{"start": 1990, "end": 2000}}}}}}"#
        )
        .unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.genres.heatmap_top, 5);
        assert_eq!(config.genres.treemap_top, 20);
        assert_eq!(config.race.years, YearRange::new(1990, 2000));
        assert_eq!(config.race.top_n, 10);
        assert_eq!(config.geography, GeoConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashboardConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
