//! Persistent name → denotable-value environment.
//!
//! Extension never mutates: [`Environment::bind`] returns a new environment
//! that shares structure with the old one, so any number of snapshots (a
//! closure's captured scope, the scope outside a loop body) coexist cheaply.

use std::fmt;

use super::error::{EvalResult, RuntimeError};
use super::operators::OPERATORS;
use super::value::Denotable;
use crate::dsl::ast::Name;

#[derive(Clone, Default)]
pub struct Environment {
    bindings: im::HashMap<Name, Denotable>,
}

impl Environment {
    /// An environment with no bindings at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The environment every program starts in: the operator registry,
    /// bound under the operator names like any other identifier.
    pub fn initial() -> Self {
        OPERATORS.iter().fold(Self::empty(), |env, op| {
            env.bind(op.name.into(), Denotable::Operator(op))
        })
    }

    /// A new environment where `name` denotes `value`; every other name
    /// resolves as in `self`.
    #[must_use]
    pub fn bind(&self, name: Name, value: Denotable) -> Self {
        Self {
            bindings: self.bindings.update(name, value),
        }
    }

    pub fn lookup(&self, name: &str) -> EvalResult<&Denotable> {
        self.bindings
            .get(name)
            .ok_or_else(|| RuntimeError::unbound(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.bindings.keys().map(|k| &**k).collect();
        names.sort_unstable();
        f.debug_struct("Environment").field("names", &names).finish()
    }
}
