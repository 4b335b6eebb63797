// Parsers for the view selector values (region, year, year range)

use super::lexer::{unsigned, ws};
use crate::filter::{Selection, YearRange};
use anyhow::{anyhow, Result};
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    combinator::{all_consuming, map, map_res, value},
    sequence::separated_pair,
    IResult,
};

fn year(input: &str) -> IResult<&str, i32> {
    map_res(unsigned, i32::try_from)(input)
}

/// Parse a year selector
/// Format: `all` | YYYY
pub fn parse_year_selector(input: &str) -> IResult<&str, Selection<i32>> {
    alt((
        value(Selection::All, tag_no_case("all")),
        map(year, Selection::Only),
    ))(input)
}

/// Parse an inclusive year range
/// Format: YYYY-YYYY | YYYY..YYYY | YYYY
pub fn parse_year_range_spec(input: &str) -> IResult<&str, YearRange> {
    alt((
        map(
            separated_pair(year, alt((tag(".."), tag("-"))), year),
            |(start, end)| YearRange::new(start, end),
        ),
        map(year, YearRange::single),
    ))(input)
}

/// Region selector: `all` (any case) or an exact region name.
pub fn parse_region(text: &str) -> Selection<String> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("all") {
        Selection::All
    } else {
        Selection::Only(trimmed.to_string())
    }
}

pub fn parse_year(text: &str) -> Result<Selection<i32>> {
    all_consuming(ws(parse_year_selector))(text)
        .map(|(_, selection)| selection)
        .map_err(|_| anyhow!("invalid year selector '{}' (expected 'all' or a year)", text))
}

pub fn parse_year_range(text: &str) -> Result<YearRange> {
    all_consuming(ws(parse_year_range_spec))(text)
        .map(|(_, range)| range)
        .map_err(|_| anyhow!("invalid year range '{}' (expected e.g. 1980-2022)", text))
}
