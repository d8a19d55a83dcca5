// Projection expression parser
//
// Format: field[,field...] where each field is .name, .fullname, .config,
// .unit, /key or a configuration key.

use super::lexer::{field_name, ws};
use crate::projection::Field;
use nom::{
    character::complete::char,
    combinator::{eof, map_res},
    multi::separated_list1,
    IResult,
};

/// Parse a single field name.
pub fn parse_field(input: &str) -> IResult<&str, Field> {
    map_res(ws(field_name), |name: &str| match name {
        ".name" => Ok(Field::Name),
        ".fullname" => Ok(Field::FullName),
        ".config" => Ok(Field::Config),
        ".unit" => Ok(Field::Unit),
        _ if name.starts_with('/') && name.len() > 1 => Ok(Field::NameKey(name.to_string())),
        _ if name.starts_with('.') || name.starts_with('/') => Err(format!("unknown field {}", name)),
        _ => Ok(Field::ConfigKey(name.to_string())),
    })(input)
}

/// Parse a complete comma-separated projection.
pub fn parse_projection(input: &str) -> IResult<&str, Vec<Field>> {
    let (input, fields) = separated_list1(ws(char(',')), parse_field)(input)?;
    let (input, _) = eof(input)?;
    Ok((input, fields))
}

/// Parse `input` into fields, rendering any failure as a message.
pub fn parse_fields(input: &str) -> Result<Vec<Field>, String> {
    match parse_projection(input) {
        Ok((_, fields)) => Ok(fields),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            if e.input.is_empty() {
                Err("expected field name".to_string())
            } else {
                Err(format!("unexpected {:?}", e.input))
            }
        }
        Err(nom::Err::Incomplete(_)) => Err("incomplete projection".to_string()),
    }
}
