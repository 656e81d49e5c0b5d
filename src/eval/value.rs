//! The three value domains.
//!
//! - [`Value`]: what an expression evaluates to, and what a store cell holds.
//! - [`Denotable`]: what a name can be bound to in an environment.
//! - [`Closure`]: a function or procedure declaration with its defining
//!   environment.

use std::fmt;
use std::rc::Rc;

use super::env::Environment;
use super::operators::Operator;
use super::store::Location;
use crate::dsl::ast::{FunctionDecl, Name, ProcedureDecl};
use crate::music::Music;

/// Expressible (and storable) value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Music(Music),
}

impl Value {
    pub fn type_of(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Bool(_) => ValueType::Bool,
            Value::Music(_) => ValueType::Music,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Music(m) => write!(f, "{m}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Music> for Value {
    fn from(m: Music) -> Self {
        Value::Music(m)
    }
}

/// Runtime type tag used by operator signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Bool,
    Music,
    /// Accepts any value (equality).
    Any,
}

impl ValueType {
    pub fn accepts(self, value: &Value) -> bool {
        self == ValueType::Any || self == value.type_of()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Int => "int",
            ValueType::Bool => "bool",
            ValueType::Music => "music",
            ValueType::Any => "any",
        };
        f.write_str(name)
    }
}

/// Anything a name can denote.
#[derive(Debug, Clone)]
pub enum Denotable {
    /// Immutable binding: parameters, `let` names.
    Value(Value),
    Operator(&'static Operator),
    /// Mutable variable; its content lives in the store.
    Location(Location),
    Closure(Rc<Closure>),
}

impl Denotable {
    /// Short description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Denotable::Value(_) => "a value",
            Denotable::Operator(_) => "an operator",
            Denotable::Location(_) => "a variable",
            Denotable::Closure(c) => match c.kind {
                ClosureKind::Function(_) => "a function",
                ClosureKind::Procedure(_) => "a procedure",
            },
        }
    }
}

#[derive(Debug, Clone)]
pub enum ClosureKind {
    Function(Rc<FunctionDecl>),
    Procedure(Rc<ProcedureDecl>),
}

/// A declaration packaged with the environment it was declared in.
///
/// The captured environment does not contain the closure itself; the
/// closure is bound under its own name each time it is applied, which gives
/// self-recursion without a reference cycle.
#[derive(Debug, Clone)]
pub struct Closure {
    pub kind: ClosureKind,
    pub env: Environment,
}

impl Closure {
    pub fn name(&self) -> &Name {
        match &self.kind {
            ClosureKind::Function(f) => &f.name,
            ClosureKind::Procedure(p) => &p.name,
        }
    }

    pub fn params(&self) -> &[Name] {
        match &self.kind {
            ClosureKind::Function(f) => &f.params,
            ClosureKind::Procedure(p) => &p.params,
        }
    }
}
