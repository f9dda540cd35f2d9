use std::iter::Peekable;

use crate::{
    ast::{LiteralValue, Pattern},
    error::ParseError,
    interpreter::{
        lexer::{Position, Token},
        parser::{
            core::ParseResult,
            utils::{eat, end_of_input, expect, parse_comma_separated, parse_identifier, unexpected},
        },
    },
};

/// Parses a `case` pattern.
///
/// Grammar:
/// ```text
///     pattern := "_"
///              | "-"? integer ( ".." "-"? integer )?
///              | string | boolean
///              | "(" pattern ( "," pattern )* ","? ")"
///              | identifier "::" identifier ( "(" pattern,* ")" )?
///              | identifier "(" pattern,* ")"
///              | identifier
/// ```
///
/// # Errors
/// `UnexpectedToken` for anything that cannot start a pattern, and
/// `Invalid` for a range whose start exceeds its end.
pub fn parse_pattern<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Pattern>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    match tokens.peek() {
        Some((Token::Integer(_) | Token::Minus, _)) => parse_integer_pattern(tokens),
        Some((Token::Str(s), _)) => {
            tokens.next();
            Ok(Pattern::Literal(LiteralValue::Str(s.clone())))
        },
        Some((Token::Bool(b), _)) => {
            tokens.next();
            Ok(Pattern::Literal(LiteralValue::Bool(*b)))
        },
        Some((Token::LParen, _)) => {
            tokens.next();
            if eat(tokens, &Token::RParen) {
                return Ok(Pattern::Tuple(Vec::new()));
            }
            let first = parse_pattern(tokens)?;
            if eat(tokens, &Token::RParen) {
                return Ok(first);
            }
            expect(tokens, &Token::Comma)?;
            let mut elements = vec![first];
            elements.extend(parse_comma_separated(tokens, parse_pattern, &Token::RParen)?);
            Ok(Pattern::Tuple(elements))
        },
        Some((Token::Identifier(_), _)) => parse_named_pattern(tokens),
        Some((tok, position)) => Err(unexpected("pattern", tok, *position)),
        None => Err(end_of_input("pattern")),
    }
}

/// Parses an integer literal pattern or an inclusive range `a..b`.
fn parse_integer_pattern<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Pattern>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let line = tokens.peek().map_or(0, |(_, position)| position.line);
    let start = parse_signed_integer(tokens)?;
    if !eat(tokens, &Token::DotDot) {
        return Ok(Pattern::Literal(LiteralValue::Integer(start)));
    }
    let end = parse_signed_integer(tokens)?;
    if start > end {
        return Err(ParseError::Invalid { message: format!("Empty range pattern {start}..{end}."),
                                         line });
    }
    Ok(Pattern::Range { start, end })
}

fn parse_signed_integer<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<i64>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let negative = eat(tokens, &Token::Minus);
    match tokens.next() {
        Some((Token::Integer(n), _)) => Ok(if negative { n.wrapping_neg() } else { *n }),
        Some((tok, position)) => Err(unexpected("integer", tok, *position)),
        None => Err(end_of_input("integer")),
    }
}

/// Parses patterns that start with a name: wildcards, bindings, variant
/// patterns and positional struct patterns.
fn parse_named_pattern<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Pattern>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let name = parse_identifier(tokens)?;

    if eat(tokens, &Token::ColonColon) {
        let variant = parse_identifier(tokens)?;
        let fields = if eat(tokens, &Token::LParen) {
            parse_comma_separated(tokens, parse_pattern, &Token::RParen)?
        } else {
            Vec::new()
        };
        return Ok(Pattern::Destructure { owner: name,
                                         variant: Some(variant),
                                         fields });
    }

    if let Some((Token::LParen, _)) = tokens.peek() {
        expect(tokens, &Token::LParen)?;
        let fields = parse_comma_separated(tokens, parse_pattern, &Token::RParen)?;
        return Ok(Pattern::Destructure { owner: name,
                                         variant: None,
                                         fields });
    }

    if name == "_" {
        return Ok(Pattern::Wildcard);
    }
    Ok(Pattern::Binding(name))
}
