use crate::parser::{duration_seconds, leading_integer};
use anyhow::{anyhow, Context, Result};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Sentinel used by the dataset for an unknown region or country
pub const UNKNOWN: &str = "Inconnu";

/// One track of the dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub artists: Option<String>,
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<i32>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub track_genre: Option<String>,
    #[serde(default)]
    pub duration_fmt: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub popularity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub danceability: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub energy: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub tempo: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub preview: Option<String>,
}

/// Numeric fields that can be aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Popularity,
    Danceability,
    Energy,
    Tempo,
    /// Seconds parsed from `duration_fmt`
    Duration,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Popularity,
        Metric::Danceability,
        Metric::Energy,
        Metric::Tempo,
        Metric::Duration,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Metric::Popularity => 0,
            Metric::Danceability => 1,
            Metric::Energy => 2,
            Metric::Tempo => 3,
            Metric::Duration => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Popularity => "Popularity",
            Metric::Danceability => "Danceability",
            Metric::Energy => "Energy",
            Metric::Tempo => "Tempo",
            Metric::Duration => "Duration",
        }
    }
}

impl TrackRecord {
    /// Region, unless absent, empty or the unknown sentinel
    pub fn region(&self) -> Option<&str> {
        self.region
            .as_deref()
            .filter(|r| !r.is_empty() && *r != UNKNOWN)
    }

    /// Genre, unless absent, empty or the "inconnu" placeholder
    pub fn genre(&self) -> Option<&str> {
        self.track_genre
            .as_deref()
            .filter(|g| !g.is_empty() && !g.eq_ignore_ascii_case(UNKNOWN))
    }

    /// Country code; a missing one is reported as its own `Inconnu` group
    pub fn country(&self) -> &str {
        self.country_code
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN)
    }

    pub fn duration_seconds(&self) -> Option<u32> {
        self.duration_fmt.as_deref().and_then(duration_seconds)
    }

    /// Value contributed to an aggregate. Missing numeric fields count as 0;
    /// a missing or malformed duration contributes nothing.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        let field = match metric {
            Metric::Popularity => self.popularity,
            Metric::Danceability => self.danceability,
            Metric::Energy => self.energy,
            Metric::Tempo => self.tempo,
            Metric::Duration => return self.duration_seconds().map(f64::from),
        };
        Some(field.unwrap_or(0.0))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    let value = match raw {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(NumberOrText::Other(_)) | None => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}

fn lenient_year<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrText::Number(n)) if n.is_finite() => i32::try_from(n.trunc() as i64).ok(),
        Some(NumberOrText::Text(s)) => leading_integer(&s),
        _ => None,
    })
}

/// The whole dataset, materialised in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<TrackRecord>,
}

impl Dataset {
    pub fn new(records: Vec<TrackRecord>) -> Self {
        Self { records }
    }

    /// Create a Dataset from a JSON Array of Objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        let mut records = Vec::with_capacity(array.len());
        for (idx, item) in array.iter().enumerate() {
            if !item.is_object() {
                return Err(anyhow!("Item {} of the array is not an object", idx));
            }
            let record = TrackRecord::deserialize(item)
                .with_context(|| format!("Failed to read record {}", idx))?;
            records.push(record);
        }

        Ok(Self { records })
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).context("Dataset is not valid JSON")?;
        Self::from_json(&value)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value =
            serde_json::from_reader(reader).context("Dataset is not valid JSON")?;
        Self::from_json(&value)
    }

    /// Create a Dataset from a CSV export with the same column names
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let mut records = Vec::new();
        for (idx, result) in rdr.deserialize().enumerate() {
            let record: TrackRecord =
                result.with_context(|| format!("Failed to read CSV row {}", idx + 1))?;
            records.push(record);
        }
        Ok(Self { records })
    }

    /// Load a dataset file; `.csv` files go through the CSV reader, anything
    /// else is read as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open dataset {}", path.display()))?;
        let reader = BufReader::new(file);

        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        let dataset = if is_csv {
            Self::from_csv_reader(reader)
        } else {
            Self::from_json_reader(reader)
        }
        .with_context(|| format!("Failed to load dataset {}", path.display()))?;

        info!("Loaded {} tracks from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    pub fn records(&self) -> &[TrackRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Known regions, sorted, for the region selector
    pub fn regions(&self) -> Vec<String> {
        let regions: BTreeSet<&str> = self.iter().filter_map(TrackRecord::region).collect();
        debug!("{} distinct regions", regions.len());
        regions.into_iter().map(str::to_string).collect()
    }

    /// Distinct years inside `bounds`, most recent first, for the year selector
    pub fn years_within(&self, bounds: crate::filter::YearRange) -> Vec<i32> {
        let years: BTreeSet<i32> = self
            .iter()
            .filter_map(|r| r.year)
            .filter(|y| bounds.contains(*y))
            .collect();
        years.into_iter().rev().collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a TrackRecord;
    type IntoIter = std::slice::Iter<'a, TrackRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
