use std::iter::Peekable;

use crate::{
    ast::{Case, DestructureTarget, Expr, ForIterable, Place, PlaceSegment, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Position, Token},
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression},
            declaration::{
                parse_enum, parse_function_definition, parse_impl, parse_struct, parse_trait,
            },
            pattern::parse_pattern,
            utils::{
                eat, end_of_input, ensure_unique, expect, parse_comma_separated, parse_identifier,
                parse_type, peek_is, unexpected,
            },
        },
    },
};

/// Parses a single statement.
///
/// The leading token decides the statement kind; anything that does not
/// start with a statement keyword is parsed as an expression, which becomes
/// an assignment when `=` follows it.
///
/// The statement's source line is taken from its first token.
///
/// # Parameters
/// - `tokens`: Token iterator containing `(Token, Position)` pairs.
///
/// # Returns
/// A parsed [`Statement`] node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let Some((token, position)) = tokens.peek() else {
        return Err(end_of_input("statement"));
    };
    let line = position.line;

    match token {
        Token::Let => parse_let(tokens, line),
        Token::Print => {
            tokens.next();
            expect(tokens, &Token::LParen)?;
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::RParen)?;
            Ok(Statement::Print { expr, line })
        },
        Token::If => parse_if(tokens, line),
        Token::For => parse_for(tokens, line),
        Token::While => {
            tokens.next();
            let condition = parse_expression(tokens)?;
            let body = parse_block(tokens)?;
            Ok(Statement::While { condition,
                                  body,
                                  line })
        },
        Token::LBrace => {
            let statements = parse_block(tokens)?;
            Ok(Statement::Block { statements,
                                  line })
        },
        Token::Fn => Ok(Statement::Function(parse_function_definition(tokens)?)),
        Token::Struct => Ok(Statement::Struct(parse_struct(tokens)?)),
        Token::Enum => Ok(Statement::Enum(parse_enum(tokens)?)),
        Token::Trait => Ok(Statement::Trait(parse_trait(tokens)?)),
        Token::Impl => Ok(Statement::Impl(parse_impl(tokens)?)),
        Token::Return => {
            tokens.next();
            let value = match tokens.peek() {
                None | Some((Token::RBrace | Token::Semicolon, _)) => None,
                Some(_) => Some(parse_expression(tokens)?),
            };
            Ok(Statement::Return { value, line })
        },
        Token::Break => {
            tokens.next();
            Ok(Statement::Break { line })
        },
        Token::Continue => {
            tokens.next();
            Ok(Statement::Continue { line })
        },
        Token::Switch => parse_switch(tokens, line),
        Token::Proof => {
            tokens.next();
            let condition = parse_expression(tokens)?;
            let body = parse_block(tokens)?;
            Ok(Statement::Proof { condition,
                                  body,
                                  line })
        },
        _ => parse_expression_statement(tokens, line),
    }
}

/// Parses the four `let` forms:
///
/// ```text
///     let name (":" type)? = expression
///     let (a, b, ..) = expression
///     let Struct { f, g, .. } = expression
///     let Enum::Variant(a, b, ..) = expression
/// ```
///
/// # Errors
/// `Invalid` when a destructuring form names the same variable twice, plus
/// the usual token errors.
fn parse_let<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    expect(tokens, &Token::Let)?;

    if eat(tokens, &Token::LParen) {
        let names = parse_comma_separated(tokens, parse_identifier, &Token::RParen)?;
        ensure_unique(&names, "binding", line)?;
        return finish_destructure(tokens, DestructureTarget::Tuple(names), line);
    }

    let name = parse_identifier(tokens)?;

    if eat(tokens, &Token::LBrace) {
        let fields = parse_comma_separated(tokens, parse_identifier, &Token::RBrace)?;
        ensure_unique(&fields, "field", line)?;
        return finish_destructure(tokens,
                                  DestructureTarget::Struct { type_name: name,
                                                              fields },
                                  line);
    }

    if eat(tokens, &Token::ColonColon) {
        let variant = parse_identifier(tokens)?;
        let bindings = if eat(tokens, &Token::LParen) {
            parse_comma_separated(tokens, parse_identifier, &Token::RParen)?
        } else {
            Vec::new()
        };
        ensure_unique(&bindings, "binding", line)?;
        return finish_destructure(tokens,
                                  DestructureTarget::Variant { enum_name: name,
                                                               variant,
                                                               bindings },
                                  line);
    }

    let annotation = if eat(tokens, &Token::Colon) {
        Some(parse_type(tokens)?)
    } else {
        None
    };
    expect(tokens, &Token::Equals)?;
    let value = parse_expression(tokens)?;
    Ok(Statement::Let { name,
                        annotation,
                        value,
                        line })
}

fn finish_destructure<'a, I>(tokens: &mut Peekable<I>,
                             target: DestructureTarget,
                             line: usize)
                             -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    expect(tokens, &Token::Equals)?;
    let value = parse_expression(tokens)?;
    Ok(Statement::Destructure { target,
                                value,
                                line })
}

/// Parses an `if` statement with optional `else` and chained `else if`.
///
/// Syntax:
/// ```text
///     if <condition> { .. }
///     else if <condition> { .. }
///     else { .. }
/// ```
/// Nested `else if` constructs are parsed recursively and stored as a
/// single `If` statement inside the else branch.
///
/// # Errors
/// - `UnexpectedToken` if a branch does not start with `{`, or `else` is
///   followed by something other than `if` or `{`.
/// - Propagates any errors from sub-expression parsing.
fn parse_if<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    expect(tokens, &Token::If)?;
    let condition = parse_expression(tokens)?;
    let then_branch = parse_block(tokens)?;

    let else_branch = if eat(tokens, &Token::Else) {
        match tokens.peek() {
            Some((Token::If, position)) => Some(vec![parse_if(tokens, position.line)?]),
            Some((Token::LBrace, _)) => Some(parse_block(tokens)?),
            Some((tok, position)) => return Err(unexpected("'if' or '{'", tok, *position)),
            None => return Err(end_of_input("'if' or '{'")),
        }
    } else {
        None
    };

    Ok(Statement::If { condition,
                       then_branch,
                       else_branch,
                       line })
}

/// Parses a `for` loop.
///
/// `for {` opens a monadic block instead, which is handled as an expression
/// statement.
///
/// Grammar:
/// ```text
///     for_loop := "for" identifier "in" expression ( ".." expression )? block
/// ```
fn parse_for<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let mut lookahead = tokens.clone();
    lookahead.next();
    if matches!(lookahead.peek(), Some((Token::LBrace, _))) {
        return parse_expression_statement(tokens, line);
    }

    expect(tokens, &Token::For)?;
    let var = parse_identifier(tokens)?;
    expect(tokens, &Token::In)?;
    let first = parse_expression(tokens)?;
    let iterable = if eat(tokens, &Token::DotDot) {
        ForIterable::Range { start: first,
                             end:   parse_expression(tokens)?, }
    } else {
        ForIterable::Collection(first)
    };
    let body = parse_block(tokens)?;
    Ok(Statement::For { var,
                        iterable,
                        body,
                        line })
}

/// Parses `switch subject { case pattern { .. } .. default { .. } }`.
///
/// The `default` arm is optional and must come last.
fn parse_switch<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    expect(tokens, &Token::Switch)?;
    let subject = parse_expression(tokens)?;
    expect(tokens, &Token::LBrace)?;

    let mut cases = Vec::new();
    let mut default = None;

    loop {
        match tokens.next() {
            Some((Token::Case, position)) if default.is_none() => {
                let pattern = parse_pattern(tokens)?;
                let body = parse_block(tokens)?;
                cases.push(Case { pattern,
                                  body,
                                  line: position.line });
            },
            Some((Token::Default, _)) if default.is_none() => {
                default = Some(parse_block(tokens)?);
            },
            Some((Token::RBrace, _)) => break,
            Some((tok, position)) => {
                let expected = if default.is_none() {
                    "'case', 'default' or '}'"
                } else {
                    "'}'"
                };
                return Err(unexpected(expected, tok, *position));
            },
            None => return Err(end_of_input("'}'")),
        }
    }

    Ok(Statement::Switch { subject,
                           cases,
                           default,
                           line })
}

/// Parses an expression statement, turning it into an assignment when the
/// expression is followed by `=`.
fn parse_expression_statement<'a, I>(tokens: &mut Peekable<I>,
                                     line: usize)
                                     -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let expr = parse_expression(tokens)?;

    if peek_is(tokens, &Token::Equals) {
        tokens.next();
        let target = expr_to_place(expr, line)?;
        let value = parse_expression(tokens)?;
        return Ok(Statement::Assign { target,
                                      value,
                                      line });
    }

    Ok(Statement::Expression { expr, line })
}

/// Converts a parsed expression into an assignment target.
///
/// Only variables and chains of field accesses and indexing rooted at a
/// variable can be assigned to.
///
/// # Errors
/// `Invalid` for any other expression, e.g. `f() = 1`.
fn expr_to_place(expr: Expr, line: usize) -> ParseResult<Place> {
    match expr {
        Expr::Variable { name, .. } => Ok(Place { root: name,
                                                  path: Vec::new(), }),
        Expr::FieldAccess { object, field, .. } => {
            let mut place = expr_to_place(*object, line)?;
            place.path.push(PlaceSegment::Field(field));
            Ok(place)
        },
        Expr::Index { target, index, .. } => {
            let mut place = expr_to_place(*target, line)?;
            place.path.push(PlaceSegment::Index(*index));
            Ok(place)
        },
        _ => Err(ParseError::Invalid { message: "Invalid assignment target.".to_string(),
                                       line }),
    }
}
