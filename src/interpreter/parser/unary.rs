use std::iter::Peekable;

use crate::{
    ast::{Expr, LiteralValue, UnaryOperator},
    interpreter::{
        lexer::{Position, Token},
        parser::{
            block::parse_do_body,
            core::{ParseResult, parse_expression},
            utils::{
                eat, end_of_input, expect, parse_comma_separated, parse_identifier, peek_is,
                unexpected,
            },
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`   (numeric negation)
/// - `not` (logical not)
///
/// Unary operators are right-associative, so an input like `not -x` is parsed
/// as `not (-x)`.
///
/// If no unary operator is present, the function delegates to
/// [`parse_primary`] and then applies any postfix operators via
/// [`parse_postfix`].
///
/// Grammar:
/// ```text
///     unary := ("-" | "not") unary
///            | primary postfix*
/// ```
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// An [`Expr::Unary`] or a primary expression possibly followed by postfixes.
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    ensure_sufficient_stack(|| {
        let op = match tokens.peek() {
            Some((Token::Minus, _)) => UnaryOperator::Negate,
            Some((Token::Not, _)) => UnaryOperator::Not,
            _ => {
                let primary = parse_primary(tokens)?;
                return parse_postfix(tokens, primary);
            },
        };
        let line = tokens.next().map_or(0, |(_, position)| position.line);
        let expr = parse_unary(tokens)?;
        Ok(Expr::Unary { op,
                         expr: Box::new(expr),
                         line })
    })
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include:
/// - integer, string and boolean literals
/// - identifiers, function calls and struct literals
/// - paths `Enum::Variant` and path calls `Type::name(args)`
/// - parenthesized expressions and tuples
/// - list literals
/// - `do` and `for` blocks
///
/// This function does not handle unary operators or postfix operators.
///
/// Grammar (simplified):
/// ```text
///     primary := literal
///              | identifier ( "(" args ")" | "::" identifier ( "(" args ")" )? | struct_body )?
///              | "(" expression ")"
///              | "(" ( expression ( "," expression )* ","? )? ")"
///              | "[" elements "]"
///              | ("do" | "for") do_body
/// ```
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of a primary expression.
///
/// # Returns
/// The parsed primary [`Expr`] or a `ParseError` on failure.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let Some((token, position)) = tokens.next() else {
        return Err(end_of_input("expression"));
    };
    let line = position.line;

    match token {
        Token::Integer(n) => Ok(Expr::Literal { value: LiteralValue::Integer(*n),
                                                line }),
        Token::Str(s) => Ok(Expr::Literal { value: LiteralValue::Str(s.clone()),
                                            line }),
        Token::Bool(b) => Ok(Expr::Literal { value: LiteralValue::Bool(*b),
                                             line }),
        Token::Identifier(name) => parse_identifier_expression(tokens, name.clone(), line),
        Token::LParen => parse_grouping_or_tuple(tokens, line),
        Token::LBracket => {
            let elements = parse_comma_separated(tokens, parse_expression, &Token::RBracket)?;
            Ok(Expr::List { elements, line })
        },
        Token::Do | Token::For => {
            let block = parse_do_body(tokens)?;
            Ok(Expr::Do { block, line })
        },
        tok => Err(unexpected("expression", tok, *position)),
    }
}

/// Parses what may follow an identifier in primary position: a call, a
/// path, a struct literal or nothing at all.
///
/// A `{` after an identifier only opens a struct literal when it is followed
/// by `identifier ":"`, so `if ready { .. }` keeps its meaning.
fn parse_identifier_expression<'a, I>(tokens: &mut Peekable<I>,
                                      name: String,
                                      line: usize)
                                      -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    if eat(tokens, &Token::LParen) {
        let arguments = parse_comma_separated(tokens, parse_expression, &Token::RParen)?;
        return Ok(Expr::Call { callee: name,
                               arguments,
                               line });
    }

    if eat(tokens, &Token::ColonColon) {
        let member = parse_identifier(tokens)?;
        if eat(tokens, &Token::LParen) {
            let arguments = parse_comma_separated(tokens, parse_expression, &Token::RParen)?;
            return Ok(Expr::PathCall { owner: name,
                                       name: member,
                                       arguments,
                                       line });
        }
        return Ok(Expr::Path { owner: name,
                               name: member,
                               line });
    }

    if starts_struct_literal(tokens) {
        expect(tokens, &Token::LBrace)?;
        let fields = parse_comma_separated(tokens, parse_field_initializer, &Token::RBrace)?;
        return Ok(Expr::StructLiteral { type_name: name,
                                        fields,
                                        line });
    }

    Ok(Expr::Variable { name, line })
}

/// Looks ahead for `{ identifier :` without consuming anything.
fn starts_struct_literal<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let mut lookahead = tokens.clone();
    matches!(lookahead.next(), Some((Token::LBrace, _)))
    && matches!(lookahead.next(), Some((Token::Identifier(_), _)))
    && matches!(lookahead.next(), Some((Token::Colon, _)))
}

/// Parses `field: expression` inside a struct literal.
fn parse_field_initializer<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<(String, Expr)>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let field = parse_identifier(tokens)?;
    expect(tokens, &Token::Colon)?;
    let value = parse_expression(tokens)?;
    Ok((field, value))
}

/// Parses the rest of a parenthesized expression after `(`.
///
/// `()` is the empty tuple, `(e)` is plain grouping and any comma turns the
/// contents into a tuple, so `(e,)` is a one-element tuple.
fn parse_grouping_or_tuple<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    if eat(tokens, &Token::RParen) {
        return Ok(Expr::Tuple { elements: Vec::new(),
                                line });
    }

    let first = parse_expression(tokens)?;
    if eat(tokens, &Token::RParen) {
        return Ok(first);
    }

    expect(tokens, &Token::Comma)?;
    let mut elements = vec![first];
    elements.extend(parse_comma_separated(tokens, parse_expression, &Token::RParen)?);
    Ok(Expr::Tuple { elements, line })
}

/// Parses postfix operators applied to an expression.
///
/// Handles, in any order and repeated:
/// - field access `expr.name` and tuple positions `expr.0`
/// - method calls `expr.name(args)`
/// - indexing `expr[index]`
/// - calls of the value produced so far `expr(args)`
///
/// Grammar:
/// ```text
///     postfix := primary
///              | postfix "." (identifier | integer)
///              | postfix "." identifier "(" args ")"
///              | postfix "[" expression "]"
///              | postfix "(" args ")"
/// ```
/// # Errors
/// Returns a `ParseError` if a `.` is not followed by a name or position, or
/// an `[` is not properly closed with `]`.
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut node: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    loop {
        if let Some((Token::LBracket, position)) = tokens.peek() {
            tokens.next();
            let index = parse_expression(tokens)?;
            expect(tokens, &Token::RBracket)?;
            node = Expr::Index { target: Box::new(node),
                                 index:  Box::new(index),
                                 line:   position.line, };
            continue;
        }

        if let Some((Token::LParen, position)) = tokens.peek() {
            tokens.next();
            let arguments = parse_comma_separated(tokens, parse_expression, &Token::RParen)?;
            node = Expr::Apply { callee: Box::new(node),
                                 arguments,
                                 line: position.line };
            continue;
        }

        if let Some((Token::Dot, position)) = tokens.peek() {
            tokens.next();
            let line = position.line;
            match tokens.next() {
                Some((Token::Identifier(name), _)) if peek_is(tokens, &Token::LParen) => {
                    tokens.next();
                    let arguments =
                        parse_comma_separated(tokens, parse_expression, &Token::RParen)?;
                    node = Expr::MethodCall { receiver: Box::new(node),
                                              method: name.clone(),
                                              arguments,
                                              line };
                },
                Some((Token::Identifier(name), _)) => {
                    node = Expr::FieldAccess { object: Box::new(node),
                                               field: name.clone(),
                                               line };
                },
                Some((Token::Integer(n), _)) => {
                    node = Expr::FieldAccess { object: Box::new(node),
                                               field: n.to_string(),
                                               line };
                },
                Some((tok, position)) => {
                    return Err(unexpected("field name or method", tok, *position));
                },
                None => return Err(end_of_input("field name or method")),
            }
            continue;
        }

        break;
    }
    Ok(node)
}
