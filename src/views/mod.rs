//! Dashboard views. Each one parameterises the aggregation pipeline and
//! returns a serialisable summary together with its charts.

pub mod evolution;
pub mod genre_profile;
pub mod geography;
pub mod overview;
pub mod race;
pub mod regional;

pub use evolution::{evolution, Evolution};
pub use genre_profile::{genre_profile, GenreProfile, GenreQuery};
pub use geography::{geography, Geography};
pub use overview::{overview, Overview};
pub use race::{race, RaceFrame};
pub use regional::{regional, Regional};

use crate::chart::Chart;
use serde::Serialize;

pub trait View: Serialize {
    /// Short name, used to name output files
    fn name(&self) -> &'static str;

    /// The charts of the view, each under a stable slot name
    fn charts(&self) -> Vec<(&'static str, &Chart)>;
}
