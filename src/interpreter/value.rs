/// Runtime values.
///
/// Defines the `Value` enum with its struct, variant and function payloads,
/// type names for dispatch, conversions, structural equality and the
/// printed representation.
pub mod core;
