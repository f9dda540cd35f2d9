/// The language-level category of an error.
///
/// Every concrete error maps onto exactly one category, which is what a
/// program's embedding reports to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognized character or unrepresentable literal.
    Lexical,
    /// Unexpected token or malformed construct.
    Syntax,
    /// Unbound variable, function, method or type.
    Name,
    /// Operation applied to an incompatible value shape.
    Type,
    /// Division or remainder by zero.
    Arithmetic,
    /// A `proof` condition was false.
    Assertion,
    /// An impl does not satisfy its trait, or a registration is ambiguous.
    TraitConformance,
    /// The call depth limit was exceeded.
    Resource,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Represents all errors that can occur during evaluation.
pub enum RuntimeError {
    /// Tried to use an undefined variable.
    #[error("Error on line {line}: Unknown variable '{name}'.")]
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called an unknown function.
    #[error("Error on line {line}: Unknown function '{name}'.")]
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// No method with this name and arity exists for the receiver's type.
    #[error("Error on line {line}: Type '{type_name}' has no method '{method}' taking {arity} argument(s).")]
    UnknownMethod {
        /// Runtime type name of the receiver.
        type_name: String,
        /// The method name.
        method:    String,
        /// Number of arguments supplied, not counting `self`.
        arity:     usize,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// Referenced a struct, enum, variant or trait that was never declared.
    #[error("Error on line {line}: Unknown type '{name}'.")]
    UnknownType {
        /// The name of the type.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A second, different declaration reused an existing name.
    #[error("Error on line {line}: '{name}' is already defined.")]
    DuplicateDefinition {
        /// The reused name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value had an unexpected or incompatible shape.
    #[error("Error on line {line}: Type error: {details}.")]
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Tried to access an element outside the container.
    #[error("Error on line {line}: Index {index} out of bounds for length {len}.")]
    IndexOutOfBounds {
        /// The requested index.
        index: i64,
        /// The length of the container.
        len:   usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// The wrong number of arguments was supplied to a function or variant.
    #[error("Error on line {line}: '{name}' expects {expected} argument(s), found {found}.")]
    ArgumentCountMismatch {
        /// The function, method or variant being called.
        name:     String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A destructuring `let` or pattern named a different number of elements
    /// than the value carries.
    #[error("Error on line {line}: Cannot destructure {found} element(s) into {expected} name(s).")]
    DestructureMismatch {
        /// Number of names on the left-hand side.
        expected: usize,
        /// Number of elements in the value.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Attempted division by zero.
    #[error("Error on line {line}: Division by zero.")]
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `proof` condition evaluated to false.
    #[error("Error on line {line}: Proof failed.")]
    AssertionFailed {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An impl omits methods its trait (or an ancestor) requires.
    #[error("Error on line {line}: Impl of trait '{trait_name}' for '{type_name}' is missing {}.", .missing.join(", "))]
    TraitConformance {
        /// The trait being implemented.
        trait_name: String,
        /// The implementing type.
        type_name:  String,
        /// Required method names that were not supplied, sorted.
        missing:    Vec<String>,
        /// The source line where the error occurred.
        line:       usize,
    },
    /// Two different bodies were registered for the same dispatch key.
    #[error("Error on line {line}: Method '{type_name}.{method}' with {arity} argument(s) is already defined.")]
    AmbiguousMethod {
        /// The type owning the method.
        type_name: String,
        /// The method name.
        method:    String,
        /// Arity of the method, not counting `self`.
        arity:     usize,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// Nested calls went deeper than the configured limit.
    #[error("Error on line {line}: Call depth limit of {limit} exceeded.")]
    ResourceExhausted {
        /// The configured limit.
        limit: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An expected value was missing (e.g. using the result of a function
    /// that returned nothing).
    #[error("Error on line {line}: Value missing.")]
    MissingValue {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `break` or `continue` escaped a function body or the program.
    #[error("Error on line {line}: '{keyword}' outside of a loop.")]
    StrayControlFlow {
        /// `break` or `continue`.
        keyword: &'static str,
        /// The source line where the error occurred.
        line:    usize,
    },
}

impl RuntimeError {
    /// Returns the taxonomy category of this error.
    ///
    /// # Example
    /// ```
    /// use rinse::error::{ErrorKind, RuntimeError};
    ///
    /// let err = RuntimeError::AssertionFailed { line: 3 };
    /// assert_eq!(err.kind(), ErrorKind::Assertion);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownVariable { .. }
            | Self::UnknownFunction { .. }
            | Self::UnknownMethod { .. }
            | Self::UnknownType { .. }
            | Self::DuplicateDefinition { .. } => ErrorKind::Name,
            Self::TypeError { .. }
            | Self::IndexOutOfBounds { .. }
            | Self::ArgumentCountMismatch { .. }
            | Self::DestructureMismatch { .. }
            | Self::MissingValue { .. }
            | Self::StrayControlFlow { .. } => ErrorKind::Type,
            Self::DivisionByZero { .. } => ErrorKind::Arithmetic,
            Self::AssertionFailed { .. } => ErrorKind::Assertion,
            Self::TraitConformance { .. } | Self::AmbiguousMethod { .. } => {
                ErrorKind::TraitConformance
            },
            Self::ResourceExhausted { .. } => ErrorKind::Resource,
        }
    }

    /// Returns the source line the error was raised on.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownVariable { line, .. }
            | Self::UnknownFunction { line, .. }
            | Self::UnknownMethod { line, .. }
            | Self::UnknownType { line, .. }
            | Self::DuplicateDefinition { line, .. }
            | Self::TypeError { line, .. }
            | Self::IndexOutOfBounds { line, .. }
            | Self::ArgumentCountMismatch { line, .. }
            | Self::DestructureMismatch { line, .. }
            | Self::DivisionByZero { line }
            | Self::AssertionFailed { line }
            | Self::TraitConformance { line, .. }
            | Self::AmbiguousMethod { line, .. }
            | Self::ResourceExhausted { line, .. }
            | Self::MissingValue { line }
            | Self::StrayControlFlow { line, .. } => *line,
        }
    }
}
