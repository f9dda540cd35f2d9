/// Calls of functions, methods, variant constructors and associated
/// functions.
pub mod core;

/// Methods every list, string and tuple understands.
pub mod builtin;
