// Parser for the `M:SS` duration format

use super::lexer::unsigned;
use nom::{
    character::complete::char,
    combinator::all_consuming,
    sequence::separated_pair,
    IResult,
};

/// Parse a clock value into (minutes, seconds)
/// Format: M:SS (minutes may have any number of digits)
pub fn parse_clock(input: &str) -> IResult<&str, (u32, u32)> {
    separated_pair(unsigned, char(':'), unsigned)(input)
}

/// Total seconds of a `duration_fmt` value, or `None` when it is malformed.
pub fn duration_seconds(text: &str) -> Option<u32> {
    let (_, (minutes, seconds)) = all_consuming(parse_clock)(text.trim()).ok()?;
    minutes.checked_mul(60)?.checked_add(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock() {
        let result = parse_clock("3:45");
        assert!(result.is_ok());
        let (rest, (m, s)) = result.unwrap();
        assert_eq!(rest, "");
        assert_eq!((m, s), (3, 45));
    }

    #[test]
    fn test_duration_seconds() {
        assert_eq!(duration_seconds("3:45"), Some(225));
        assert_eq!(duration_seconds("0:05"), Some(5));
        assert_eq!(duration_seconds("12:00"), Some(720));
        assert_eq!(duration_seconds(" 4:20 "), Some(260));
    }

    #[test]
    fn test_duration_seconds_malformed() {
        assert_eq!(duration_seconds("abc"), None);
        assert_eq!(duration_seconds("3:"), None);
        assert_eq!(duration_seconds(":45"), None);
        assert_eq!(duration_seconds("1:02:03"), None);
        assert_eq!(duration_seconds(""), None);
    }
}
