//! Stack safety for deep recursion in the parser and evaluator.
//!
//! Recursive descent over nested expressions and closure applications grows
//! the host stack on demand, so the configured call-depth limit rather than
//! the thread's stack size is what bounds a program.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
