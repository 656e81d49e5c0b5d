//! Expression evaluation.
//!
//! Evaluation never changes the environment. The store is only touched when
//! a procedure application runs commands; a function body sees a private
//! copy that is dropped when the call returns.

use std::rc::Rc;

use super::env::Environment;
use super::error::{EvalResult, RuntimeError};
use super::interpreter::Interpreter;
use super::store::Store;
use super::value::{Closure, ClosureKind, Denotable, Value};
use crate::dsl::ast::{Expr, Name};
use crate::music::{Music, NoteValue};
use crate::stack::ensure_sufficient_stack;

impl Interpreter<'_> {
    pub fn eval_expr(&mut self, expr: &Expr, env: &Environment, store: &mut Store) -> EvalResult<Value> {
        match expr {
            Expr::Number(n) => Ok(Value::Int(*n)),
            Expr::Boolean(b) => Ok(Value::Bool(*b)),
            Expr::Note(lit) => Ok(Value::Music(Music::single(NoteValue::note(
                lit.midi(),
                lit.duration,
            )))),
            Expr::Rest(duration) => Ok(Value::Music(Music::single(NoteValue::rest(*duration)))),
            Expr::Variable(name) => lookup_value(name, env, store),
            Expr::OperatorApply { op, args } => {
                let values = self.eval_args(args, env, store)?;
                match env.lookup(op) {
                    Ok(Denotable::Operator(operator)) => operator.apply(&values),
                    Ok(other) => Err(RuntimeError::unknown_callee(
                        op,
                        &format!("is {}, not an operator", other.describe()),
                    )),
                    Err(_) => Err(RuntimeError::unknown_callee(op, "is not a registered operator")),
                }
            }
            Expr::Let { name, bound, body } => {
                let value = self.eval_expr(bound, env, store)?;
                let inner = env.bind(name.clone(), Denotable::Value(value));
                ensure_sufficient_stack(|| self.eval_expr(body, &inner, store))
            }
            Expr::FunctionApply { name, args } | Expr::ProcedureApply { name, args } => {
                self.apply_closure(name, args, env, store)
            }
        }
    }

    fn eval_args(&mut self, args: &[Expr], env: &Environment, store: &mut Store) -> EvalResult<Vec<Value>> {
        args.iter()
            .map(|arg| ensure_sufficient_stack(|| self.eval_expr(arg, env, store)))
            .collect()
    }

    /// Apply the closure bound to `name`. Functions and procedures share call
    /// syntax; the kind of closure found decides how the body runs.
    fn apply_closure(
        &mut self,
        name: &Name,
        args: &[Expr],
        env: &Environment,
        store: &mut Store,
    ) -> EvalResult<Value> {
        let closure = match env.lookup(name) {
            Ok(Denotable::Closure(c)) => Rc::clone(c),
            Ok(other) => {
                return Err(RuntimeError::unknown_callee(
                    name,
                    &format!("is {}, not a function or procedure", other.describe()),
                ))
            }
            Err(_) => return Err(RuntimeError::unknown_callee(name, "is not defined")),
        };

        let params = closure.params();
        if args.len() != params.len() {
            return Err(RuntimeError::wrong_arity(name, params.len(), args.len()));
        }
        let values = self.eval_args(args, env, store)?;
        let call_env = call_environment(&closure, values);

        self.enter_call(name)?;
        let result = ensure_sufficient_stack(|| match &closure.kind {
            ClosureKind::Function(decl) => {
                let mut scratch = store.clone();
                self.eval_expr(&decl.body, &call_env, &mut scratch)
            }
            ClosureKind::Procedure(decl) => {
                let mark = store.watermark();
                let result = self
                    .exec_commands(&decl.body, &call_env, store)
                    .and_then(|body_env| self.eval_expr(&decl.result, &body_env, store));
                store.rollback(mark);
                result
            }
        });
        self.exit_call();
        result
    }
}

/// The closure's captured scope, plus the closure under its own name, plus
/// the parameters. Parameters are bound last so they shadow the name.
fn call_environment(closure: &Rc<Closure>, values: Vec<Value>) -> Environment {
    let env = closure
        .env
        .bind(closure.name().clone(), Denotable::Closure(Rc::clone(closure)));
    closure
        .params()
        .iter()
        .zip(values)
        .fold(env, |env, (param, value)| {
            env.bind(param.clone(), Denotable::Value(value))
        })
}

fn lookup_value(name: &str, env: &Environment, store: &Store) -> EvalResult<Value> {
    match env.lookup(name)? {
        Denotable::Value(value) => Ok(value.clone()),
        Denotable::Location(loc) => store.access(*loc).cloned(),
        other => Err(RuntimeError::not_a_value(name, other.describe())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::ast::{Command, FunctionDecl};
    use crate::eval::error::RuntimeErrorKind;
    use crate::eval::sink::CaptureSink;
    use crate::eval::store::Location;
    use crate::music::Beat;

    fn eval(expr: &Expr, env: &Environment) -> EvalResult<Value> {
        let mut sink = CaptureSink::new();
        let mut store = Store::new();
        Interpreter::new(&mut sink).eval_expr(expr, env, &mut store)
    }

    fn int(n: i64) -> Expr {
        Expr::Number(n)
    }

    #[test]
    fn literals() {
        let env = Environment::initial();
        assert_eq!(eval(&int(4), &env).unwrap(), Value::Int(4));
        assert_eq!(eval(&Expr::Boolean(true), &env).unwrap(), Value::Bool(true));
        let rest = eval(&Expr::Rest(Beat::from_beats(2)), &env).unwrap();
        assert_eq!(
            rest,
            Value::Music(Music::single(NoteValue::rest(Beat::from_beats(2))))
        );
    }

    #[test]
    fn operator_application() {
        let env = Environment::initial();
        let e = Expr::op("+", vec![int(1), Expr::op("*", vec![int(2), int(3)])]);
        assert_eq!(eval(&e, &env).unwrap(), Value::Int(7));
    }

    #[test]
    fn unregistered_operator_is_unknown_callee() {
        let env = Environment::empty();
        let err = eval(&Expr::op("+", vec![int(1), int(2)]), &env).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::UnknownCallee);
    }

    #[test]
    fn let_binding_is_scoped_to_body() {
        let env = Environment::initial();
        let e = Expr::Let {
            name: "x".into(),
            bound: Box::new(int(2)),
            body: Box::new(Expr::op("+", vec![Expr::var("x"), int(1)])),
        };
        assert_eq!(eval(&e, &env).unwrap(), Value::Int(3));
        assert!(!env.contains("x"));
    }

    #[test]
    fn variables_dereference_locations() {
        let mut sink = CaptureSink::new();
        let mut store = Store::new();
        let loc = store.allocate(Value::Int(9));
        let env = Environment::initial().bind("v".into(), Denotable::Location(loc));
        let value = Interpreter::new(&mut sink)
            .eval_expr(&Expr::var("v"), &env, &mut store)
            .unwrap();
        assert_eq!(value, Value::Int(9));
    }

    #[test]
    fn dangling_location_is_unallocated() {
        let env = Environment::initial().bind("v".into(), Denotable::Location(Location(5)));
        let err = eval(&Expr::var("v"), &env).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::UnallocatedLocation);
    }

    #[test]
    fn operator_in_value_position() {
        let err = eval(&Expr::var("head"), &Environment::initial()).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::NotAValue);
    }

    #[test]
    fn function_sees_captured_scope_not_callers() {
        let decl = Rc::new(FunctionDecl {
            name: "f".into(),
            params: vec!["a".into()],
            body: Expr::op("+", vec![Expr::var("a"), Expr::var("k")]),
        });
        let defining = Environment::initial().bind("k".into(), Denotable::Value(Value::Int(10)));
        let closure = Rc::new(Closure {
            kind: ClosureKind::Function(decl),
            env: defining,
        });
        let caller = Environment::initial()
            .bind("k".into(), Denotable::Value(Value::Int(1000)))
            .bind("f".into(), Denotable::Closure(closure));
        let call = Expr::FunctionApply {
            name: "f".into(),
            args: vec![int(1)],
        };
        assert_eq!(eval(&call, &caller).unwrap(), Value::Int(11));
    }

    #[test]
    fn calling_a_variable_is_unknown_callee() {
        let env = Environment::initial().bind("x".into(), Denotable::Value(Value::Int(1)));
        let call = Expr::FunctionApply {
            name: "x".into(),
            args: vec![],
        };
        assert_eq!(eval(&call, &env).unwrap_err().kind, RuntimeErrorKind::UnknownCallee);
    }

    #[test]
    fn procedure_body_commands_run() {
        let mut sink = CaptureSink::new();
        let mut store = Store::new();
        let env = {
            let mut interp = Interpreter::new(&mut sink);
            let decl = Command::ProcedureDecl(Rc::new(crate::dsl::ast::ProcedureDecl {
                name: "p".into(),
                params: vec![],
                body: vec![Command::Print(int(5))],
                result: int(6),
            }));
            interp
                .exec_commands(&[decl], &Environment::initial(), &mut store)
                .unwrap()
        };
        let call = Expr::FunctionApply {
            name: "p".into(),
            args: vec![],
        };
        let value = Interpreter::new(&mut sink)
            .eval_expr(&call, &env, &mut store)
            .unwrap();
        assert_eq!(value, Value::Int(6));
        assert_eq!(sink.values(), &[Value::Int(5)]);
    }
}
