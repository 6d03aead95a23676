use nom::{
    bytes::complete::{take_till, take_while1},
    character::complete::char,
    combinator::all_consuming,
    sequence::delimited,
    IResult,
};

/// Recognizes a run of ASCII letters, digits and underscores.
pub fn identifier(i: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(i)
}

/// True when the whole candidate matches `^[A-Za-z0-9_]+$`.
pub fn is_identifier(candidate: &str) -> bool {
    all_consuming(identifier)(candidate).is_ok()
}

/// One `[segment]` of a bracketed query-string key. The segment may be empty.
pub fn bracket_segment(i: &str) -> IResult<&str, &str> {
    delimited(char('['), take_till(|c| c == '[' || c == ']'), char(']'))(i)
}
