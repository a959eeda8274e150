//! CQL type-string parser
//!
//! Parses type syntax such as `map<text, frozen<list<int>>>`,
//! `tuple<int, text>`, `frozen<address>` and `'org.example.MyType'` into a
//! [`ColumnType`]. Bare names that are not primitive kinds are looked up in
//! the supplied user-defined types.

use crate::error::{Error, Result};
use crate::types::{ColumnType, PrimitiveType, UserDefinedType};
use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while, take_while1},
    character::complete::char,
    combinator::{all_consuming, map},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, separated_pair, terminated},
    IResult,
};

/// Type expression before name resolution
#[derive(Debug, Clone, PartialEq)]
enum RawType {
    Named(String),
    List(Box<RawType>),
    Set(Box<RawType>),
    Map(Box<RawType>, Box<RawType>),
    Tuple(Vec<RawType>),
    Frozen(Box<RawType>),
    Custom(String),
}

/// CQL keyword parser - case insensitive
fn keyword(s: &'static str) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input| tag_no_case(s)(input)
}

fn ws(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_whitespace())(input)
}

fn open(input: &str) -> IResult<&str, char> {
    preceded(ws, char('<'))(input)
}

fn close(input: &str) -> IResult<&str, char> {
    preceded(ws, char('>'))(input)
}

/// Quoted or unquoted identifier
fn identifier(input: &str) -> IResult<&str, String> {
    let (input, name) = alt((
        delimited(char('"'), take_while1(|c: char| c != '"'), char('"')),
        take_while1(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)?;

    Ok((input, name.to_string()))
}

/// Custom type class name in single quotes
fn custom_class(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('\''), take_while1(|c: char| c != '\''), char('\'')),
        str::to_string,
    )(input)
}

fn single_parameter<'a>(
    name: &'static str,
    wrap: fn(Box<RawType>) -> RawType,
) -> impl FnMut(&'a str) -> IResult<&'a str, RawType> {
    map(
        preceded(pair(keyword(name), open), terminated(raw_type, close)),
        move |inner| wrap(Box::new(inner)),
    )
}

fn raw_type(input: &str) -> IResult<&str, RawType> {
    delimited(
        ws,
        alt((
            single_parameter("list", RawType::List),
            single_parameter("set", RawType::Set),
            single_parameter("frozen", RawType::Frozen),
            map(
                preceded(
                    pair(keyword("map"), open),
                    terminated(separated_pair(raw_type, char(','), raw_type), close),
                ),
                |(key, value)| RawType::Map(Box::new(key), Box::new(value)),
            ),
            map(
                preceded(
                    pair(keyword("tuple"), open),
                    terminated(separated_list1(char(','), raw_type), close),
                ),
                RawType::Tuple,
            ),
            map(custom_class, RawType::Custom),
            map(identifier, RawType::Named),
        )),
        ws,
    )(input)
}

fn resolve(raw: RawType, udts: &[UserDefinedType], frozen: bool) -> Result<ColumnType> {
    let column_type = match raw {
        RawType::Named(name) => {
            if let Some(kind) = PrimitiveType::from_cql_name(&name) {
                return Ok(ColumnType::Primitive(kind));
            }
            let udt = udts
                .iter()
                .find(|udt| udt.name == name)
                .ok_or_else(|| Error::unsupported_type(name))?;
            ColumnType::Udt(udt.clone().frozen(frozen || udt.frozen))
        }
        RawType::List(element) => ColumnType::List(Box::new(resolve(*element, udts, false)?)),
        RawType::Set(element) => ColumnType::Set(Box::new(resolve(*element, udts, false)?)),
        RawType::Map(key, value) => ColumnType::Map(
            Box::new(resolve(*key, udts, false)?),
            Box::new(resolve(*value, udts, false)?),
        ),
        RawType::Tuple(elements) => ColumnType::Tuple(
            elements
                .into_iter()
                .map(|element| resolve(element, udts, false))
                .collect::<Result<_>>()?,
        ),
        RawType::Frozen(inner) => resolve(*inner, udts, true)?,
        RawType::Custom(class_name) => ColumnType::Custom(class_name),
    };
    Ok(column_type)
}

/// Parse a CQL type string, resolving user-defined type names against `udts`
pub fn parse_column_type(text: &str, udts: &[UserDefinedType]) -> Result<ColumnType> {
    let (_, raw) = all_consuming(raw_type)(text)
        .map_err(|_| Error::unsupported_type(format!("unparseable type '{}'", text.trim())))?;
    resolve(raw, udts, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> UserDefinedType {
        UserDefinedType::new("address")
            .with_field("street", PrimitiveType::Text)
            .with_field("zip", PrimitiveType::Int)
    }

    #[test]
    fn test_primitive_types() {
        for kind in PrimitiveType::ALL {
            assert_eq!(
                parse_column_type(kind.cql_name(), &[]).unwrap(),
                ColumnType::Primitive(kind)
            );
        }
        assert_eq!(
            parse_column_type("  BIGINT ", &[]).unwrap(),
            ColumnType::Primitive(PrimitiveType::BigInt)
        );
    }

    #[test]
    fn test_nested_collections() {
        let ty = parse_column_type("map<text, frozen<list<int>>>", &[]).unwrap();
        assert_eq!(
            ty,
            ColumnType::map(PrimitiveType::Text, ColumnType::list(PrimitiveType::Int))
        );
        assert_eq!(ty.to_string(), "map<text, list<int>>");
    }

    #[test]
    fn test_tuple() {
        let ty = parse_column_type("tuple<int, text , uuid>", &[]).unwrap();
        assert_eq!(
            ty,
            ColumnType::tuple([PrimitiveType::Int, PrimitiveType::Text, PrimitiveType::Uuid])
        );
    }

    #[test]
    fn test_frozen_udt() {
        let udts = [address()];
        assert_eq!(
            parse_column_type("frozen<address>", &udts).unwrap(),
            ColumnType::Udt(address().frozen(true))
        );
        assert_eq!(
            parse_column_type("address", &udts).unwrap(),
            ColumnType::Udt(address())
        );
        assert_eq!(
            parse_column_type("set<frozen<address>>", &udts)
                .unwrap()
                .to_string(),
            "set<frozen<address>>"
        );
    }

    #[test]
    fn test_custom_type() {
        assert_eq!(
            parse_column_type("'org.example.MyType'", &[]).unwrap(),
            ColumnType::Custom("org.example.MyType".into())
        );
    }

    #[test]
    fn test_unknown_name_unsupported() {
        assert_eq!(
            parse_column_type("list<location>", &[]).unwrap_err(),
            Error::unsupported_type("location")
        );
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            parse_column_type("map<int>", &[]),
            Err(Error::UnsupportedType(_))
        ));
        assert!(parse_column_type("list<int", &[]).is_err());
    }
}
