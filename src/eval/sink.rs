//! Where `print` sends its values.
//!
//! - [`ConsoleSink`]: scalars to a writer, music to the configured renderers
//! - [`CaptureSink`]: records values for tests and embedding

use std::io::{self, Write};

use super::value::Value;
use crate::render::Renderer;

/// Receives every value a program prints, in order.
pub trait PrintSink {
    fn print(&mut self, value: &Value) -> io::Result<()>;
}

/// Sink that keeps every printed value.
#[derive(Debug, Default)]
pub struct CaptureSink {
    values: Vec<Value>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Printed values rendered one per line.
    pub fn output(&self) -> String {
        let mut out = String::new();
        for value in &self.values {
            out.push_str(&value.to_string());
            out.push('\n');
        }
        out
    }
}

impl PrintSink for CaptureSink {
    fn print(&mut self, value: &Value) -> io::Result<()> {
        self.values.push(value.clone());
        Ok(())
    }
}

/// Sink that writes integers and booleans as literals and passes music to
/// each renderer in turn.
pub struct ConsoleSink<W: Write> {
    out: W,
    renderers: Vec<Box<dyn Renderer>>,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            renderers: Vec::new(),
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderers.push(renderer);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PrintSink for ConsoleSink<W> {
    fn print(&mut self, value: &Value) -> io::Result<()> {
        match value {
            Value::Int(_) | Value::Bool(_) => writeln!(self.out, "{value}"),
            Value::Music(music) => {
                let triples = music.note_triples();
                for renderer in &mut self.renderers {
                    renderer.render(&triples)?;
                }
                self.out.flush()
            }
        }
    }
}
