use std::iter::Peekable;

use crate::{
    ast::{Expr, Program},
    error::ParseError,
    interpreter::{
        lexer::{Position, Token},
        parser::{
            binary::parse_logical_or,
            block::parse_block,
            utils::{expect, parse_identifier, unexpected},
        },
    },
    util::stack::ensure_sufficient_stack,
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete token stream into a [`Program`].
///
/// Errors reporting an early end of input are given the line of the last
/// token, so they point at where the source stopped.
///
/// # Errors
/// Any `ParseError` raised while parsing, or `UnexpectedToken` when tokens
/// remain after the program's closing brace.
pub fn parse_tokens(tokens: &[(Token, Position)]) -> ParseResult<Program> {
    let mut iter = tokens.iter().peekable();
    let last_line = tokens.last().map_or(1, |(_, position)| position.line);

    let program = parse_program(&mut iter).map_err(|e| match e {
                                              ParseError::UnexpectedEndOfInput { expected, .. } => {
                                                  ParseError::UnexpectedEndOfInput { expected,
                                                                                     line: last_line }
                                              },
                                              other => other,
                                          })?;

    if let Some((tok, position)) = iter.next() {
        return Err(unexpected("end of input", tok, *position));
    }
    Ok(program)
}

/// Parses the program header and its body.
///
/// Grammar: `program := "init" identifier block`
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Program>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let start = expect(tokens, &Token::Init)?;
    let name = parse_identifier(tokens)?;
    let body = parse_block(tokens)?;
    Ok(Program { name,
                 body,
                 line: start.line })
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, logical OR, and recursively
/// descends through the precedence hierarchy.
///
/// Grammar: `expression := logical_or`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, Position)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    ensure_sufficient_stack(|| parse_logical_or(tokens))
}
