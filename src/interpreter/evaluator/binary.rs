/// Operator dispatch.
///
/// Evaluates operands and routes each operator to its handler.
pub mod core;

/// Integer arithmetic and concatenation.
pub mod arithmetic;

/// Equality and ordering.
pub mod comparison;

/// Short-circuiting `and` / `or`.
pub mod logic;
