use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{BindClause, DoBlock, Statement},
    interpreter::{
        lexer::{Position, Token},
        parser::{
            core::{ParseResult, parse_expression},
            statement::parse_statement,
            utils::{eat, end_of_input, expect, parse_identifier, unexpected},
        },
    },
};

/// Parses a block of statements delimited by braces.
///
/// A block consists of zero or more statements, each optionally followed by
/// a `;`. Parsing continues until a closing `}` token is encountered.
///
/// Grammar: `block := "{" (statement ";"?)* "}"`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the opening brace.
///
/// # Returns
/// The statements of the block, in source order.
///
/// # Errors
/// `UnexpectedEndOfInput` if the closing brace is missing, or any error from
/// the statements themselves.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    expect(tokens, &Token::LBrace)?;
    let mut statements = Vec::new();

    loop {
        while eat(tokens, &Token::Semicolon) {}

        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some(_) => statements.push(parse_statement(tokens)?),
            None => return Err(end_of_input("'}'")),
        }
    }

    Ok(statements)
}

/// Parses the braced body shared by `do { .. }` and `for { .. }` blocks.
///
/// Grammar:
/// ```text
///     do_body := "{" (identifier "<-" expression ";"?)* (("yield" | "return") expression ";"?)? "}"
/// ```
///
/// # Errors
/// `UnexpectedToken` for anything other than a bind clause or a final
/// `yield`/`return` inside the braces.
pub fn parse_do_body<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Rc<DoBlock>>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    expect(tokens, &Token::LBrace)?;
    let mut clauses = Vec::new();
    let mut result = None;

    loop {
        while eat(tokens, &Token::Semicolon) {}

        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some((Token::Yield | Token::Return, _)) if result.is_none() => {
                tokens.next();
                result = Some(parse_expression(tokens)?);
            },
            Some((Token::Identifier(_), position)) if result.is_none() => {
                let line = position.line;
                let name = parse_identifier(tokens)?;
                expect(tokens, &Token::LeftArrow)?;
                let value = parse_expression(tokens)?;
                clauses.push(BindClause { name, value, line });
            },
            Some((tok, position)) => {
                let expected = if result.is_none() {
                    "bind clause, 'yield' or '}'"
                } else {
                    "'}'"
                };
                return Err(unexpected(expected, tok, *position));
            },
            None => return Err(end_of_input("'}'")),
        }
    }

    Ok(Rc::new(DoBlock { clauses, result }))
}
