//! # rinse
//!
//! rinse is a tree-walking interpreter for the Rinse language written in
//! Rust. It lexes, parses and evaluates programs built from variables,
//! functions, structs, enums, traits, pattern matching, proof blocks and
//! monadic `do` blocks.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    ast::Program,
    error::{Error, ParseError},
    interpreter::{evaluator::core::Context, lexer::tokenize, parser::core::parse_tokens},
};

/// Defines the structure of parsed code.
///
/// This module declares the `Program`, `Statement`, `Expr` and `Pattern`
/// types that represent the syntactic structure of source code as a tree. The
/// AST is built once by the parser and only read by the evaluator.
///
/// # Responsibilities
/// - Defines one dedicated variant per language construct.
/// - Attaches source lines to AST nodes for error reporting.
pub mod ast;
/// Provides unified error types for lexing, parsing and evaluation.
///
/// This module defines all errors that can be raised while translating or
/// running a program. Every error carries the source location it was raised
/// at.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Maps runtime errors onto the language's error taxonomy.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation and the runtime value
/// representation.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
pub mod interpreter;
/// General utilities for safe numeric conversion.
///
/// # Responsibilities
/// - Convert between `i64` and `usize` without silent data loss.
pub mod util;

/// Lexes and parses a complete program.
///
/// # Errors
/// Returns a [`ParseError`] on the first lexical or syntax error.
///
/// # Examples
/// ```
/// use rinse::parse_program;
///
/// let program = parse_program("init main { let x = 1 }").unwrap();
/// assert_eq!(program.name, "main");
/// assert_eq!(program.body.len(), 1);
///
/// assert!(parse_program("init main { let = 1 }").is_err());
/// ```
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(source)?;
    parse_tokens(&tokens)
}

/// Runs a program and returns every line it printed.
///
/// The program is parsed completely before evaluation begins, so a syntax
/// error anywhere produces no output at all. A fresh [`Context`] with the
/// default configuration is used for every call.
///
/// # Errors
/// Returns an error if lexing, parsing or evaluation fails.
///
/// # Examples
/// ```
/// use rinse::get_output;
///
/// let output = get_output("init main { print(2 + 3 * 4) }").unwrap();
/// assert_eq!(output, vec!["14".to_string()]);
///
/// // Unknown variable.
/// assert!(get_output("init main { print(y) }").is_err());
/// ```
pub fn get_output(source: &str) -> Result<Vec<String>, Error> {
    let program = parse_program(source)?;

    let mut context = Context::new();
    context.run(&program)?;

    Ok(context.into_output())
}
