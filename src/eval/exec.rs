//! Command execution.
//!
//! Sequences and loops run iteratively: a long `while` costs no host stack.
//! Branch and loop bodies are scoped blocks. Their bindings are dropped on
//! exit and the store's `next_free` is restored, while updates to cells that
//! existed before the block persist.

use std::rc::Rc;

use super::env::Environment;
use super::error::{EvalResult, RuntimeError};
use super::interpreter::Interpreter;
use super::store::Store;
use super::value::{Closure, ClosureKind, Denotable, Value};
use crate::dsl::ast::{Command, Expr};
use crate::stack::ensure_sufficient_stack;

impl Interpreter<'_> {
    /// Run `commands` in order, returning the environment after the last.
    pub fn exec_commands(
        &mut self,
        commands: &[Command],
        env: &Environment,
        store: &mut Store,
    ) -> EvalResult<Environment> {
        let mut env = env.clone();
        for command in commands {
            env = self.exec(command, &env, store)?;
        }
        Ok(env)
    }

    pub fn exec(&mut self, command: &Command, env: &Environment, store: &mut Store) -> EvalResult<Environment> {
        match command {
            Command::VarDecl { name, expr } => {
                let value = self.eval_expr(expr, env, store)?;
                let loc = store.allocate(value);
                tracing::debug!(name = %name, address = loc.address(), "var");
                Ok(env.bind(name.clone(), Denotable::Location(loc)))
            }
            Command::Assign { name, expr } => {
                let loc = match env.lookup(name)? {
                    Denotable::Location(loc) => *loc,
                    _ => return Err(RuntimeError::not_assignable(name)),
                };
                let value = self.eval_expr(expr, env, store)?;
                tracing::debug!(name = %name, address = loc.address(), "assign");
                store.update(loc, value)?;
                Ok(env.clone())
            }
            Command::Print(expr) => {
                let value = self.eval_expr(expr, env, store)?;
                tracing::debug!(kind = %value.type_of(), "print");
                self.sink.print(&value)?;
                Ok(env.clone())
            }
            Command::IfElse {
                cond,
                then_branch,
                else_branch,
            } => {
                let branch = if self.condition(cond, "if", env, store)? {
                    then_branch
                } else {
                    else_branch
                };
                self.exec_block(branch, env, store)?;
                Ok(env.clone())
            }
            Command::While { cond, body } => {
                let mut iterations = 0usize;
                while self.condition(cond, "while", env, store)? {
                    self.exec_block(body, env, store)?;
                    iterations += 1;
                }
                tracing::debug!(iterations, "while done");
                Ok(env.clone())
            }
            Command::FunctionDecl(decl) => {
                tracing::debug!(name = %decl.name, "function");
                Ok(declare(env, ClosureKind::Function(Rc::clone(decl))))
            }
            Command::ProcedureDecl(decl) => {
                tracing::debug!(name = %decl.name, "procedure");
                Ok(declare(env, ClosureKind::Procedure(Rc::clone(decl))))
            }
            Command::Sequence(commands) => self.exec_commands(commands, env, store),
        }
    }

    /// Run a scoped block: bindings made inside are discarded and every
    /// location allocated inside is released.
    fn exec_block(&mut self, commands: &[Command], env: &Environment, store: &mut Store) -> EvalResult<()> {
        let mark = store.watermark();
        let result = ensure_sufficient_stack(|| self.exec_commands(commands, env, store));
        tracing::debug!(from = store.next_free(), to = ?mark, "rollback");
        store.rollback(mark);
        result.map(|_| ())
    }

    fn condition(&mut self, cond: &Expr, construct: &str, env: &Environment, store: &mut Store) -> EvalResult<bool> {
        match self.eval_expr(cond, env, store)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::type_mismatch(format!(
                "'{construct}' condition must be bool, got {}",
                other.type_of()
            ))),
        }
    }
}

/// Bind a closure over the current environment under its declared name.
fn declare(env: &Environment, kind: ClosureKind) -> Environment {
    let closure = Closure {
        kind,
        env: env.clone(),
    };
    let name = closure.name().clone();
    env.bind(name, Denotable::Closure(Rc::new(closure)))
}
