/// Integer conversion helpers.
///
/// This module provides checked conversions between the language's `i64`
/// integers and the `usize` indices and lengths of the host containers, so
/// that a negative or oversized index is reported instead of wrapping.
pub mod num;
/// Stack growth for the recursive parser and evaluator.
///
/// Nested expressions and interpreted calls recurse on the host stack; the
/// helper here grows it on demand so that only `Config::max_call_depth`
/// bounds a run.
pub mod stack;
