// Library exports for trackdash
//
// Loading and filtering a track dataset, grouping and ranking it, and turning
// the result into chart values the views hand to a rendering surface.

pub mod chart;
pub mod config;
pub mod data;
pub mod filter;
pub mod format;
pub mod graph;
pub mod group;
pub mod parser;
pub mod playback;
pub mod rank;
pub mod render;
pub mod snapshot;
pub mod stack;
pub mod summary;
pub mod timeline;
pub mod views;

pub use config::DashboardConfig;
pub use data::{Dataset, Metric, TrackRecord};
pub use filter::{filter, FilterSpec, Selection, YearFilter, YearRange};
pub use group::{group_reduce, Group};
pub use rank::{rank, RankedEntry};
