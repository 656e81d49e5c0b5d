//! Evaluation: environments, the store, operators, expressions and commands.

pub mod env;
pub mod error;
mod exec;
mod expr;
pub mod interpreter;
pub mod operators;
pub mod sink;
pub mod store;
pub mod value;

pub use env::Environment;
pub use error::{EvalResult, RuntimeError, RuntimeErrorKind};
pub use interpreter::{Interpreter, DEFAULT_MAX_CALL_DEPTH};
pub use operators::{Operator, OPERATORS};
pub use sink::{CaptureSink, ConsoleSink, PrintSink};
pub use store::{Location, Store, Watermark};
pub use value::{Closure, ClosureKind, Denotable, Value, ValueType};

use crate::dsl::Program;

/// Run `program` from the initial environment and an empty store.
///
/// Returns the final environment and store; printed values go to `sink`.
pub fn execute_program(
    program: &Program,
    sink: &mut dyn PrintSink,
    max_call_depth: usize,
) -> EvalResult<(Environment, Store)> {
    let mut store = Store::new();
    let env = Interpreter::new(sink)
        .with_max_call_depth(max_call_depth)
        .exec_commands(&program.commands, &Environment::initial(), &mut store)?;
    tracing::debug!(cells = store.next_free(), "program finished");
    Ok((env, store))
}
