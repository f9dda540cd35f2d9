/// Binary operator evaluation logic.
///
/// Handles the execution of all binary operations in expressions: integer
/// arithmetic, string and list concatenation, comparisons and short-circuit
/// logic.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements integer negation and logical `not`.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the runtime context, its configuration, statement execution and
/// expression evaluation.
pub mod core;

/// Lexical scopes and call frames.
pub mod environment;

/// Functions, types, traits, impls and the method table of a run.
pub mod registry;

/// Evaluation of `for` and `while` loops.
///
/// Manages iteration variables, per-iteration scopes and the consumption of
/// `break` and `continue`.
pub mod for_loop;

/// Utility functions for evaluation.
///
/// Provides scope and frame helpers, assignment, destructuring, field and
/// index access, shared by the rest of the evaluator.
pub mod utils;

/// Function evaluation.
///
/// Handles calls of user functions and methods, variant constructors,
/// associated functions and builtin methods.
pub mod function;

/// Pattern matching and `switch`.
pub mod pattern;

/// Registration of declarations and construction of struct instances.
pub mod declaration;

/// Monadic `do` blocks and their continuations.
pub mod monad;
