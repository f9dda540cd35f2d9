/// Lexing and parsing errors.
///
/// Defines all error types that can occur while turning source text into an
/// AST: unrecognized characters, oversized literals and unexpected tokens.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation: unbound
/// names, type mismatches, failed proofs, trait conformance failures and
/// arithmetic faults.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::{ErrorKind, RuntimeError};

/// Any error produced while translating or running a program.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The program could not be lexed or parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The program failed while running.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Returns the taxonomy category of this error.
    ///
    /// # Example
    /// ```
    /// use rinse::{error::ErrorKind, get_output};
    ///
    /// let err = get_output("init main { print(1 / 0) }").unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::Arithmetic);
    ///
    /// let err = get_output("init main { let x = $ }").unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::Lexical);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(e) => e.kind(),
            Self::Runtime(e) => e.kind(),
        }
    }
}
