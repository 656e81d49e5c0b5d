//! Top-level error for running a program from source.

use crate::dsl::CompileError;
use crate::eval::RuntimeError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::RuntimeErrorKind;

    #[test]
    fn runtime_errors_keep_their_kind() {
        let err: Error = RuntimeError::arithmetic("division by zero").into();
        match &err {
            Error::Runtime(e) => assert_eq!(e.kind, RuntimeErrorKind::Arithmetic),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(err.to_string(), "runtime error: arithmetic error: division by zero");
    }

    #[test]
    fn compile_errors_carry_position() {
        let err: Error = CompileError::parse("expected command", 2, 5).into();
        assert!(err.to_string().starts_with("compile error: [2:5]"));
    }
}
