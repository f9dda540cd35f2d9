use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{EnumDef, FieldDef, FunctionDef, ImplDef, StructDef, TraitDef, VariantDef},
    error::ParseError,
    interpreter::{
        lexer::{Position, Token},
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression},
            utils::{
                eat, end_of_input, ensure_unique, expect, parse_comma_separated, parse_generics,
                parse_identifier, parse_type, peek_is, unexpected,
            },
        },
    },
};

/// Parses a function definition.
///
/// ```text
///     function := "fn" ( identifier "." )? identifier generics? "(" params ")" block
///     params   := ( identifier ( ":" type )? ),*
/// ```
///
/// The `Type.name` form declares a method on `Type`; whether it is an
/// instance method depends on its first parameter being `self`.
///
/// # Errors
/// `Invalid` for repeated parameter names, plus the usual token errors.
pub fn parse_function_definition<'a, I>(tokens: &mut Peekable<I>)
                                        -> ParseResult<Rc<FunctionDef>>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let line = expect(tokens, &Token::Fn)?.line;
    let first = parse_identifier(tokens)?;
    let (owner, name) = if eat(tokens, &Token::Dot) {
        (Some(first), parse_identifier(tokens)?)
    } else {
        (None, first)
    };
    let (generics, params) = parse_signature(tokens, line)?;
    let body = parse_block(tokens)?;

    Ok(Rc::new(FunctionDef { name,
                             owner,
                             generics,
                             params,
                             body,
                             line }))
}

/// Parses `generics? "(" params ")"`, returning generic and parameter names.
fn parse_signature<'a, I>(tokens: &mut Peekable<I>,
                          line: usize)
                          -> ParseResult<(Vec<String>, Vec<String>)>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let generics = parse_generics(tokens)?;
    expect(tokens, &Token::LParen)?;
    let params = parse_comma_separated(tokens, parse_parameter, &Token::RParen)?;
    ensure_unique(&params, "parameter", line)?;
    Ok((generics, params))
}

/// Parses a parameter name; its optional annotation is accepted and dropped.
fn parse_parameter<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let name = parse_identifier(tokens)?;
    if eat(tokens, &Token::Colon) {
        parse_type(tokens)?;
    }
    Ok(name)
}

/// Parses a struct declaration.
///
/// ```text
///     struct := "struct" identifier generics? "{" field,* "}"
///     field  := identifier ( ":" type )? ( "=" expression )?
/// ```
///
/// # Errors
/// `Invalid` if a field is declared twice.
pub fn parse_struct<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Rc<StructDef>>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let line = expect(tokens, &Token::Struct)?.line;
    let name = parse_identifier(tokens)?;
    let generics = parse_generics(tokens)?;
    expect(tokens, &Token::LBrace)?;
    let fields = parse_comma_separated(tokens, parse_field, &Token::RBrace)?;

    let names = fields.iter().map(|f| f.name.clone()).collect::<Vec<_>>();
    ensure_unique(&names, "field", line)?;

    Ok(Rc::new(StructDef { name,
                           generics,
                           fields,
                           line }))
}

fn parse_field<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<FieldDef>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let name = parse_identifier(tokens)?;
    let annotation = if eat(tokens, &Token::Colon) {
        Some(parse_type(tokens)?)
    } else {
        None
    };
    let default = if eat(tokens, &Token::Equals) {
        Some(parse_expression(tokens)?)
    } else {
        None
    };
    Ok(FieldDef { name,
                  annotation,
                  default })
}

/// Parses an enum declaration.
///
/// ```text
///     enum    := "enum" identifier generics? "{" variant,* "}"
///     variant := identifier ( "(" identifier,* ")" )?
/// ```
///
/// # Errors
/// `Invalid` if a variant is declared twice or names a field twice.
pub fn parse_enum<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Rc<EnumDef>>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let line = expect(tokens, &Token::Enum)?.line;
    let name = parse_identifier(tokens)?;
    let generics = parse_generics(tokens)?;
    expect(tokens, &Token::LBrace)?;
    let variants = parse_comma_separated(tokens, parse_variant, &Token::RBrace)?;

    let names = variants.iter().map(|v| v.name.clone()).collect::<Vec<_>>();
    ensure_unique(&names, "variant", line)?;
    for variant in &variants {
        ensure_unique(&variant.fields, "variant field", line)?;
    }

    Ok(Rc::new(EnumDef { name,
                         generics,
                         variants,
                         line }))
}

fn parse_variant<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<VariantDef>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let name = parse_identifier(tokens)?;
    let fields = if eat(tokens, &Token::LParen) {
        parse_comma_separated(tokens, parse_parameter, &Token::RParen)?
    } else {
        Vec::new()
    };
    Ok(VariantDef { name, fields })
}

/// Parses a trait declaration.
///
/// ```text
///     trait  := "trait" identifier generics? ( "extends" identifier )? "{" method* "}"
///     method := "fn" identifier generics? "(" params ")" ( block | ";"? )
/// ```
///
/// Methods without a body are required; methods with a body provide a
/// default that implementors inherit.
///
/// # Errors
/// `Invalid` if the same method name is declared twice.
pub fn parse_trait<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Rc<TraitDef>>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let line = expect(tokens, &Token::Trait)?.line;
    let name = parse_identifier(tokens)?;
    let generics = parse_generics(tokens)?;
    let parent = if eat(tokens, &Token::Extends) {
        Some(parse_identifier(tokens)?)
    } else {
        None
    };
    expect(tokens, &Token::LBrace)?;

    let mut required = Vec::new();
    let mut provided = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some((Token::Fn, position)) => {
                let method_line = position.line;
                tokens.next();
                let method = parse_identifier(tokens)?;
                let (method_generics, params) = parse_signature(tokens, method_line)?;
                if peek_is(tokens, &Token::LBrace) {
                    let body = parse_block(tokens)?;
                    provided.push(Rc::new(FunctionDef { name: method,
                                                        owner: Some(name.clone()),
                                                        generics: method_generics,
                                                        params,
                                                        body,
                                                        line: method_line }));
                } else {
                    eat(tokens, &Token::Semicolon);
                    required.push(method);
                }
            },
            Some((tok, position)) => return Err(unexpected("'fn' or '}'", tok, *position)),
            None => return Err(end_of_input("'}'")),
        }
    }

    let mut names = required.clone();
    names.extend(provided.iter().map(|m| m.name.clone()));
    ensure_unique(&names, "trait method", line)?;

    Ok(Rc::new(TraitDef { name,
                          generics,
                          parent,
                          required,
                          provided,
                          line }))
}

/// Parses an impl block.
///
/// ```text
///     impl := "impl" generics? identifier type_args? ( "for" identifier )? "{" function* "}"
/// ```
///
/// Without `for`, the block is inherent and the identifier names the
/// implementing type; type arguments on an inherent impl are accepted and
/// ignored. Methods are parsed like functions and owned by the type.
pub fn parse_impl<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Rc<ImplDef>>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let line = expect(tokens, &Token::Impl)?.line;
    let generics = parse_generics(tokens)?;
    let first = parse_identifier(tokens)?;
    let args = if eat(tokens, &Token::Less) {
        parse_comma_separated(tokens, parse_type, &Token::Greater)?
    } else {
        Vec::new()
    };

    let (trait_name, trait_args, type_name) = if eat(tokens, &Token::For) {
        (Some(first), args, parse_identifier(tokens)?)
    } else {
        (None, Vec::new(), first)
    };
    // Type arguments on the implementing type are not tracked.
    if eat(tokens, &Token::Less) {
        parse_comma_separated(tokens, parse_type, &Token::Greater)?;
    }

    expect(tokens, &Token::LBrace)?;
    let mut methods: Vec<Rc<FunctionDef>> = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some((Token::Fn, _)) => {
                let mut method = parse_function_definition(tokens)?;
                if method.owner.is_some() {
                    return Err(ParseError::Invalid { message: format!("Method '{}' in an impl block cannot name its owner.",
                                                                      method.name),
                                                     line:    method.line, });
                }
                Rc::make_mut(&mut method).owner = Some(type_name.clone());
                methods.push(method);
            },
            Some((tok, position)) => return Err(unexpected("'fn' or '}'", tok, *position)),
            None => return Err(end_of_input("'}'")),
        }
    }

    Ok(Rc::new(ImplDef { generics,
                         trait_name,
                         trait_args,
                         type_name,
                         methods,
                         line }))
}
