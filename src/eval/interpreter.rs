//! Interpreter state shared by expression evaluation and command execution.

use super::error::{EvalResult, RuntimeError};
use super::sink::PrintSink;

/// Default bound on nested closure applications.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Walks a program, threading environment and store through it.
///
/// Environment and store are passed explicitly to every step; the
/// interpreter itself only owns the print sink and the call-depth counter.
pub struct Interpreter<'a> {
    pub(super) sink: &'a mut dyn PrintSink,
    depth: usize,
    max_call_depth: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(sink: &'a mut dyn PrintSink) -> Self {
        Self {
            sink,
            depth: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    /// Current nesting of closure applications.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(super) fn enter_call(&mut self, callee: &str) -> EvalResult<()> {
        if self.depth >= self.max_call_depth {
            tracing::debug!(callee, depth = self.depth, "call depth limit reached");
            return Err(RuntimeError::recursion_limit(self.max_call_depth));
        }
        self.depth += 1;
        tracing::trace!(callee, depth = self.depth, "enter call");
        Ok(())
    }

    pub(super) fn exit_call(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::error::RuntimeErrorKind;
    use crate::eval::sink::CaptureSink;

    #[test]
    fn depth_is_bounded() {
        let mut sink = CaptureSink::new();
        let mut interp = Interpreter::new(&mut sink).with_max_call_depth(2);
        interp.enter_call("f").unwrap();
        interp.enter_call("f").unwrap();
        let err = interp.enter_call("f").unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::RecursionLimit);
        interp.exit_call();
        assert_eq!(interp.depth(), 1);
    }
}
