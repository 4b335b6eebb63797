// nom parsers for dataset text fields and view selectors

pub mod artists;
pub mod duration;
pub mod lexer;
pub mod selector;

// Public API re-exports
pub use artists::split_artists;
pub use duration::duration_seconds;
pub use lexer::leading_integer;
pub use selector::{parse_region, parse_year, parse_year_range};
