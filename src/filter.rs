use crate::data::TrackRecord;
use serde::{Deserialize, Serialize};

/// Selector value for one dimension: everything, or an exact match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn as_only(&self) -> Option<&T> {
        match self {
            Selection::All => None,
            Selection::Only(v) => Some(v),
        }
    }
}

/// Inclusive range of years. `start > end` is an empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub const fn single(year: i32) -> Self {
        Self { start: year, end: year }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

/// Year predicate of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearFilter {
    /// No year constraint; records without a year pass too
    #[default]
    Any,
    Exact(i32),
    Range(YearRange),
}

impl YearFilter {
    /// A year selector resolved against the view's bounds: "all" means the
    /// bounded range, not every record.
    pub fn bounded(selection: &Selection<i32>, bounds: YearRange) -> Self {
        match selection {
            Selection::All => YearFilter::Range(bounds),
            Selection::Only(year) => YearFilter::Exact(*year),
        }
    }

    pub fn matches(&self, year: Option<i32>) -> bool {
        match self {
            YearFilter::Any => true,
            YearFilter::Exact(wanted) => year == Some(*wanted),
            YearFilter::Range(range) => year.is_some_and(|y| range.contains(y)),
        }
    }
}

/// The predicate set of the filter stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub region: Selection<String>,
    pub years: YearFilter,
    pub require_genre: bool,
    pub require_region: bool,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(mut self, region: Selection<String>) -> Self {
        self.region = region;
        self
    }

    pub fn years(mut self, years: YearFilter) -> Self {
        self.years = years;
        self
    }

    pub fn require_genre(mut self) -> Self {
        self.require_genre = true;
        self
    }

    pub fn require_region(mut self) -> Self {
        self.require_region = true;
        self
    }

    pub fn matches(&self, record: &TrackRecord) -> bool {
        if let Selection::Only(wanted) = &self.region {
            // the unknown sentinel never satisfies an exact match
            if record.region() != Some(wanted.as_str()) {
                return false;
            }
        }
        if self.require_region && record.region().is_none() {
            return false;
        }
        if self.require_genre && record.genre().is_none() {
            return false;
        }
        self.years.matches(record.year)
    }
}

/// Keep the records accepted by `spec`, in input order.
pub fn filter<'a, I>(records: I, spec: &FilterSpec) -> Vec<&'a TrackRecord>
where
    I: IntoIterator<Item = &'a TrackRecord>,
{
    records.into_iter().filter(|r| spec.matches(r)).collect()
}
