use crate::{error::ErrorKind, interpreter::lexer::Position};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// The lexer found a character that starts no token.
    #[error("Error at {position}: Unrecognized character '{character}'.")]
    UnrecognizedCharacter {
        /// The offending character.
        character: char,
        /// Where the character was found.
        position:  Position,
    },
    /// An integer literal does not fit into a 64-bit signed integer.
    #[error("Error at {position}: Integer literal {literal} is too large.")]
    IntegerTooLarge {
        /// The literal as written.
        literal:  String,
        /// Where the literal starts.
        position: Position,
    },
    /// Found a token other than the one the grammar requires.
    #[error("Error at {position}: Expected {expected}, found {found}.")]
    UnexpectedToken {
        /// Description of what the grammar expected.
        expected: String,
        /// The token encountered.
        found:    String,
        /// Where the token was found.
        position: Position,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error on line {line}: Unexpected end of input, expected {expected}.")]
    UnexpectedEndOfInput {
        /// Description of what the grammar expected.
        expected: String,
        /// Line of the last token read.
        line:     usize,
    },
    /// A construct is well-formed token by token but invalid as a whole.
    #[error("Error on line {line}: {message}")]
    Invalid {
        /// Details about the problem.
        message: String,
        /// The source line where the construct starts.
        line:    usize,
    },
}

impl ParseError {
    /// Returns the taxonomy category: lexical errors come from the lexer,
    /// everything else is a syntax error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnrecognizedCharacter { .. } | Self::IntegerTooLarge { .. } => {
                ErrorKind::Lexical
            },
            Self::UnexpectedToken { .. }
            | Self::UnexpectedEndOfInput { .. }
            | Self::Invalid { .. } => ErrorKind::Syntax,
        }
    }
}
