//! Runtime failures. Any of these aborts the program run.

use std::fmt;

use crate::music::SequenceError;

/// What went wrong while evaluating or executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    UnboundIdentifier,
    UnallocatedLocation,
    NotAssignable,
    /// An operator or closure was used where a value is expected.
    NotAValue,
    WrongArity,
    TypeMismatch,
    Arithmetic,
    EmptySequence,
    UnknownCallee,
    RecursionLimit,
    /// The print sink failed to emit a value.
    Output,
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UnboundIdentifier => "unbound identifier",
            Self::UnallocatedLocation => "unallocated location",
            Self::NotAssignable => "not assignable",
            Self::NotAValue => "not a value",
            Self::WrongArity => "wrong arity",
            Self::TypeMismatch => "type mismatch",
            Self::Arithmetic => "arithmetic error",
            Self::EmptySequence => "empty sequence",
            Self::UnknownCallee => "unknown callee",
            Self::RecursionLimit => "recursion limit",
            Self::Output => "output error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub message: String,
}

pub type EvalResult<T> = Result<T, RuntimeError>;

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unbound(name: &str) -> Self {
        Self::new(
            RuntimeErrorKind::UnboundIdentifier,
            format!("'{name}' is not defined"),
        )
    }

    pub fn unallocated(address: usize) -> Self {
        Self::new(
            RuntimeErrorKind::UnallocatedLocation,
            format!("location {address} is not allocated"),
        )
    }

    pub fn not_assignable(name: &str) -> Self {
        Self::new(
            RuntimeErrorKind::NotAssignable,
            format!("'{name}' is not a variable"),
        )
    }

    pub fn not_a_value(name: &str, what: &str) -> Self {
        Self::new(
            RuntimeErrorKind::NotAValue,
            format!("'{name}' is {what}, not a value"),
        )
    }

    pub fn wrong_arity(callee: &str, expected: usize, got: usize) -> Self {
        Self::new(
            RuntimeErrorKind::WrongArity,
            format!("'{callee}' expects {expected} argument(s), got {got}"),
        )
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::TypeMismatch, message)
    }

    pub fn arithmetic(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::Arithmetic, message)
    }

    pub fn unknown_callee(name: &str, why: &str) -> Self {
        Self::new(
            RuntimeErrorKind::UnknownCallee,
            format!("'{name}' {why}"),
        )
    }

    pub fn recursion_limit(limit: usize) -> Self {
        Self::new(
            RuntimeErrorKind::RecursionLimit,
            format!("call depth exceeded {limit}"),
        )
    }
}

impl From<SequenceError> for RuntimeError {
    fn from(e: SequenceError) -> Self {
        let kind = match e {
            SequenceError::Empty | SequenceError::NoNotes => RuntimeErrorKind::EmptySequence,
            SequenceError::PitchOverflow(_) | SequenceError::TooLong => {
                RuntimeErrorKind::Arithmetic
            }
        };
        Self::new(kind, e.to_string())
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(e: std::io::Error) -> Self {
        Self::new(RuntimeErrorKind::Output, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_leads_with_kind() {
        let err = RuntimeError::unbound("x");
        assert_eq!(err.to_string(), "unbound identifier: 'x' is not defined");
    }

    #[test]
    fn sequence_errors_map_to_empty_sequence() {
        let err: RuntimeError = SequenceError::Empty.into();
        assert_eq!(err.kind, RuntimeErrorKind::EmptySequence);
    }

    #[test]
    fn sequence_range_errors_are_arithmetic() {
        let err: RuntimeError = SequenceError::PitchOverflow(3).into();
        assert_eq!(err.kind, RuntimeErrorKind::Arithmetic);
        let err: RuntimeError = SequenceError::TooLong.into();
        assert_eq!(err.kind, RuntimeErrorKind::Arithmetic);
    }
}
