// Shared lexical helpers

use nom::{
    bytes::complete::take_while1,
    character::complete::{multispace0, space0},
    error::ParseError,
    sequence::delimited,
    IResult,
};

/// Wrap a parser to skip surrounding whitespace (including newlines).
pub fn ws<'a, F, O, E: ParseError<&'a str>>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: FnMut(&'a str) -> IResult<&'a str, O, E>,
{
    delimited(multispace0, inner, multispace0)
}

/// Wrap a parser to skip surrounding spaces and tabs on a single line.
pub fn sp<'a, F, O, E: ParseError<&'a str>>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: FnMut(&'a str) -> IResult<&'a str, O, E>,
{
    delimited(space0, inner, space0)
}

/// A run of non-whitespace characters.
pub fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

/// A projection field name: anything up to a comma or whitespace.
pub fn field_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != ',' && !c.is_whitespace())(input)
}
