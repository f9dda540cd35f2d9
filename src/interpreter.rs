/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, executes statements, evaluates
/// expressions, manages variable scopes and declarations, and collects the
/// printed output. It is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Registers functions, types, traits and impls as they are reached.
/// - Reports runtime errors such as division by zero or failed proofs.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// identifiers, operators, delimiters, and keywords. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with type and source
///   location.
/// - Handles integer and string literals, identifiers, and operators.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of the program. This enables
/// later phases to execute it.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements,
///   declarations, patterns).
/// - Validates correct grammar and syntax, reporting errors with location info.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values a program computes with: integers,
/// booleans, strings, tuples, lists, struct instances, enum variants and
/// functions.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Provides type names, conversions with error checking, equality and the
///   printed form of every value.
pub mod value;
