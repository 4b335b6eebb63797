// Shared token parsers for the dataset text fields and selectors

use nom::{
    character::complete::{char, digit1, multispace0},
    combinator::{map_res, opt, recognize},
    sequence::{delimited, pair},
    IResult,
};

/// Wrap a parser so it ignores surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Unsigned decimal number
pub fn unsigned(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| s.parse::<u32>())(input)
}

/// Optionally signed decimal number
pub fn integer(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)
}

/// Integer prefix of a text value, ignoring whatever follows the digits.
/// `"2019"` and `"2019-05-17"` both give 2019; `"n/a"` gives `None`.
pub fn leading_integer(text: &str) -> Option<i32> {
    let (_, value) = ws(integer)(text).ok()?;
    i32::try_from(value).ok()
}
