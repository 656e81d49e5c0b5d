//! Cadenza: an interpreter for an algebraic music composition language.
//!
//! Source text is parsed by [`dsl`], executed by [`eval`] over the musical
//! values of [`music`], and whatever the program prints goes to a
//! [`PrintSink`], typically one that feeds the [`render`] back ends.

pub mod config;
pub mod dsl;
pub mod error;
pub mod eval;
pub mod music;
pub mod render;
mod stack;

pub use config::Config;
pub use error::Error;
pub use eval::{CaptureSink, ConsoleSink, Environment, PrintSink, Store, Value};

/// Parse and run `source` in a fresh environment and store.
pub fn run(source: &str, sink: &mut dyn PrintSink, config: &Config) -> Result<(Environment, Store), Error> {
    let program = dsl::parse(source)?;
    tracing::debug!(commands = program.commands.len(), "parsed program");
    let result = eval::execute_program(&program, sink, config.limits.max_call_depth)?;
    Ok(result)
}

/// Run `source` with default configuration and return what it printed.
pub fn run_captured(source: &str) -> Result<Vec<Value>, Error> {
    let mut sink = CaptureSink::new();
    run(source, &mut sink, &Config::default())?;
    Ok(sink.into_values())
}
