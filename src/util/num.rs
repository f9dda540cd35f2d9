use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Checks an integer index against a container length and converts it to a
/// `usize`.
///
/// ## Errors
/// Returns `IndexOutOfBounds` if the index is negative or not smaller than
/// `len`.
///
/// ## Parameters
/// - `index`: The index as evaluated by the program.
/// - `len`: Length of the indexed container.
/// - `line`: Source code line number for error reporting.
///
/// ## Example
/// ```
/// use rinse::{error::RuntimeError, util::num::checked_index};
///
/// assert_eq!(checked_index(2, 3, 1).unwrap(), 2);
///
/// let err = checked_index(3, 3, 7).unwrap_err();
/// assert!(matches!(err, RuntimeError::IndexOutOfBounds { index: 3, len: 3, line: 7 }));
///
/// assert!(checked_index(-1, 3, 7).is_err());
/// ```
pub fn checked_index(index: i64, len: usize, line: usize) -> EvalResult<usize> {
    match usize::try_from(index) {
        Ok(i) if i < len => Ok(i),
        _ => Err(RuntimeError::IndexOutOfBounds { index, len, line }),
    }
}

/// Converts a container length to the language's integer type.
///
/// ## Errors
/// Returns a `TypeError` if the length does not fit into `i64`, which can
/// only happen on platforms with pointers wider than 64 bits.
///
/// ## Example
/// ```
/// use rinse::util::num::usize_to_i64_checked;
///
/// assert_eq!(usize_to_i64_checked(42, 0).unwrap(), 42);
/// ```
pub fn usize_to_i64_checked(value: usize, line: usize) -> EvalResult<i64> {
    i64::try_from(value).map_err(|_| {
                            RuntimeError::TypeError { details: format!("length {value} does not fit into an integer"),
                                                      line }
                        })
}
