// Scanner for the multi-artist `artists` field

use nom::{branch::alt, bytes::complete::tag, IResult};

/// One of the recognised separators: `,` `;` ` feat. ` ` & `
/// Matching is exact: no case folding, spacing must be as written.
pub fn separator(input: &str) -> IResult<&str, &str> {
    alt((tag(","), tag(";"), tag(" feat. "), tag(" & ")))(input)
}

/// Split an `artists` value into trimmed names. Empty tokens are kept, so
/// `"A,,B"` yields `["A", "", "B"]`.
pub fn split_artists(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut start = 0;
    let mut cursor = 0;

    while cursor < text.len() {
        match separator(&text[cursor..]) {
            Ok((rest, _)) => {
                names.push(text[start..cursor].trim());
                cursor = text.len() - rest.len();
                start = cursor;
            }
            Err(_) => {
                cursor += text[cursor..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    names.push(text[start..].trim());

    names
}
