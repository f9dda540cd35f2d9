/// Core parsing entry points.
///
/// Contains the program parser, the expression entry point and the shared
/// result type.
pub mod core;

/// Unary, primary and postfix expressions.
///
/// Handles negation and `not`, literals, names, calls, paths, struct
/// literals, tuples, lists, `do` blocks, field access, method calls and
/// indexing.
pub mod unary;

/// Binary operator parsing.
///
/// Implements the precedence climb from `or` down to multiplicative
/// operators.
pub mod binary;

/// Block parsing.
///
/// Parses braced statement sequences and the bodies of monadic blocks.
pub mod block;

/// Declarations.
///
/// Functions, structs, enums, traits and impl blocks.
pub mod declaration;

/// `switch` case patterns.
pub mod pattern;

/// Utility functions for the parser.
///
/// Provides token expectations, comma-separated lists, identifiers, type
/// annotations and generic parameter lists.
pub mod utils;

/// Statement parsing.
///
/// Implements `let` in all its forms, `print`, control flow, `switch`,
/// `proof`, assignments and expression statements.
pub mod statement;
