use std::iter::Peekable;

use crate::{
    ast::TypeName,
    error::ParseError,
    interpreter::{
        lexer::{Position, Token},
        parser::core::ParseResult,
    },
};

/// Builds the error reported when the stream ends while `expected` was
/// required. The line is filled in by [`parse_tokens`](super::core::parse_tokens).
pub(in crate::interpreter::parser) fn end_of_input(expected: &str) -> ParseError {
    ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                       line:     0, }
}

/// Builds the error reported when `found` appears where `expected` was
/// required.
pub(in crate::interpreter::parser) fn unexpected(expected: &str,
                                                 found: &Token,
                                                 position: Position)
                                                 -> ParseError {
    ParseError::UnexpectedToken { expected: expected.to_string(),
                                  found: found.to_string(),
                                  position }
}

/// Consumes the next token, which must equal `expected`.
///
/// # Returns
/// The position of the consumed token.
///
/// # Errors
/// - `UnexpectedToken` if a different token follows.
/// - `UnexpectedEndOfInput` if the stream is exhausted.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token)
                                                    -> ParseResult<Position>
    where I: Iterator<Item = &'a (Token, Position)>
{
    match tokens.next() {
        Some((tok, position)) if tok == expected => Ok(*position),
        Some((tok, position)) => Err(unexpected(&expected.to_string(), tok, *position)),
        None => Err(end_of_input(&expected.to_string())),
    }
}

/// Consumes the next token if it equals `token`.
///
/// # Returns
/// `true` if a token was consumed.
pub(in crate::interpreter::parser) fn eat<'a, I>(tokens: &mut Peekable<I>, token: &Token) -> bool
    where I: Iterator<Item = &'a (Token, Position)>
{
    if let Some((tok, _)) = tokens.peek()
       && tok == token
    {
        tokens.next();
        return true;
    }
    false
}

/// Returns `true` if the next token equals `token`, without consuming it.
pub(in crate::interpreter::parser) fn peek_is<'a, I>(tokens: &mut Peekable<I>,
                                                     token: &Token)
                                                     -> bool
    where I: Iterator<Item = &'a (Token, Position)>
{
    tokens.peek().is_some_and(|(tok, _)| tok == token)
}

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by tuple and list literals, argument and parameter
/// lists and patterns. It repeatedly calls `parse_item` to parse one element,
/// expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list, and a
/// trailing comma before the closing token is accepted.
///
/// Grammar (simplified): `list := (item ("," item)* ","?)? closing`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g., `]` or `)`).
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let mut items = Vec::new();
    if eat(tokens, closing) {
        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some((Token::Comma, _)) => {
                if eat(tokens, closing) {
                    break;
                }
            },
            Some((tok, _)) if tok == closing => break,
            Some((tok, position)) => {
                return Err(unexpected(&format!("',' or {closing}"), tok, *position));
            },
            None => return Err(end_of_input(&closing.to_string())),
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name.
///
/// The next token must be `Token::Identifier`.
///
/// # Errors
/// Returns a `ParseError` if:
/// - the next token is not an identifier,
/// - the input ends unexpectedly.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, Position)>
{
    match tokens.next() {
        Some((Token::Identifier(s), _)) => Ok(s.clone()),
        Some((tok, position)) => Err(unexpected("identifier", tok, *position)),
        None => Err(end_of_input("identifier")),
    }
}

/// Parses a type annotation.
///
/// Grammar: `type := identifier ("<" type ("," type)* ">")?`
pub(in crate::interpreter::parser) fn parse_type<'a, I>(tokens: &mut Peekable<I>)
                                                        -> ParseResult<TypeName>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let name = parse_identifier(tokens)?;
    let arguments = if eat(tokens, &Token::Less) {
        parse_comma_separated(tokens, parse_type, &Token::Greater)?
    } else {
        Vec::new()
    };
    Ok(TypeName { name, arguments })
}

/// Parses an optional generic parameter list `<T, U>`.
///
/// Returns an empty vector when no `<` follows.
pub(in crate::interpreter::parser) fn parse_generics<'a, I>(tokens: &mut Peekable<I>)
                                                            -> ParseResult<Vec<String>>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    if eat(tokens, &Token::Less) {
        parse_comma_separated(tokens, parse_identifier, &Token::Greater)
    } else {
        Ok(Vec::new())
    }
}

/// Rejects a name list that mentions the same name twice.
///
/// # Errors
/// `Invalid`, naming the repeated entry and `what` was being declared.
pub(in crate::interpreter::parser) fn ensure_unique(names: &[String],
                                                    what: &str,
                                                    line: usize)
                                                    -> ParseResult<()> {
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(ParseError::Invalid { message: format!("Duplicate {what} '{name}'."),
                                             line });
        }
    }
    Ok(())
}
