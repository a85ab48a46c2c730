//! Parsers for the canonical textual forms of schemas and signatures.
//!
//! The textual form of a schema is the one used in function signatures:
//! primitive names (`address`, `uint256`, `bool`, `bytes32`, `bytes`,
//! `string`), tuples written `(t1,t2)` and arrays written `t[]`. Whitespace
//! between tokens is tolerated and `uint` is accepted as an alias of `uint256`.
//!
//! ```rust
//! # use abitype::{parser::parse_schema, types::Schema};
//! let schema = parse_schema("( address , uint )[]").unwrap();
//! assert_eq!(schema, Schema::array(Schema::tuple([Schema::ADDRESS, Schema::UINT256])));
//! assert_eq!(schema.to_string(), "(address,uint256)[]");
//! ```
use std::str::FromStr;

use chumsky::prelude::*;
use thiserror::Error;

use crate::types::{Schema, primary::PrimaryType};

/// A textual schema or signature could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to parse `{input}`: {}", .messages.join("; "))]
pub struct ParseError {
    /// The rejected text.
    pub input: String,
    /// Human-readable diagnostics, in the order they were emitted.
    pub messages: Vec<String>,
}

pub fn primary_type_parser<'src>()
-> impl Parser<'src, &'src str, PrimaryType, extra::Err<Rich<'src, char>>> + Clone {
    text::ident()
        .try_map(|name: &str, span| match name {
            "uint" => Ok(PrimaryType::Uint256),
            _ => PrimaryType::from_str(name)
                .map_err(|_| Rich::custom(span, format!("unknown primitive type `{}`", name))),
        })
        .labelled("primitive type")
}

pub fn schema_parser<'src>()
-> impl Parser<'src, &'src str, Schema, extra::Err<Rich<'src, char>>> + Clone {
    recursive(|schema| {
        let tuple = schema
            .padded()
            .separated_by(just(','))
            .collect::<Vec<_>>()
            .delimited_by(just('('), just(')').padded())
            .map(Schema::tuple)
            .labelled("tuple type");

        let base = choice((primary_type_parser().map(Schema::Primary), tuple));

        // Each `[]` suffix wraps everything to its left.
        let suffix = just('[').then(just(']').padded()).labelled("array suffix");

        base.padded()
            .foldl(suffix.repeated(), |element, _| Schema::array(element))
    })
    .labelled("type")
}

/// Parses a parenthesized, comma-separated list of schemas: `(t1,t2)`.
pub fn schema_list_parser<'src>()
-> impl Parser<'src, &'src str, Vec<Schema>, extra::Err<Rich<'src, char>>> + Clone {
    schema_parser()
        .separated_by(just(','))
        .collect::<Vec<_>>()
        .delimited_by(just('(').padded(), just(')').padded())
        .labelled("type list")
}

pub fn signature_parser<'src>()
-> impl Parser<'src, &'src str, (String, Vec<Schema>), extra::Err<Rich<'src, char>>> + Clone {
    text::ident()
        .map(str::to_string)
        .padded()
        .labelled("function name")
        .then(schema_list_parser())
        .labelled("signature")
}

fn run<'src, T>(
    parser: impl Parser<'src, &'src str, T, extra::Err<Rich<'src, char>>>,
    src: &'src str,
) -> Result<T, ParseError> {
    parser
        .then_ignore(end())
        .parse(src)
        .into_result()
        .map_err(|errors| ParseError {
            input: src.to_string(),
            messages: errors.into_iter().map(|e| e.to_string()).collect(),
        })
}

/// Parse a single schema such as `(address,uint256)[]`.
pub fn parse_schema(src: &str) -> Result<Schema, ParseError> {
    run(schema_parser(), src)
}

/// Parse a schema list such as `(uint256,bool)`. The empty list is `()`.
pub fn parse_schema_list(src: &str) -> Result<Vec<Schema>, ParseError> {
    run(schema_list_parser(), src)
}

/// Parse a signature `name(t1,t2)` into its name and input schemas.
pub fn parse_signature(src: &str) -> Result<(String, Vec<Schema>), ParseError> {
    run(signature_parser(), src)
}
