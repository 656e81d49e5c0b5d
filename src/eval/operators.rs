//! The operator registry: a fixed table of typed primitive operators.
//!
//! Each operator declares the runtime type of every operand. Dispatch checks
//! the operand count, then each operand's tag, and only then runs the
//! implementation, so implementations can assume well-typed input.

use std::fmt;

use super::error::{EvalResult, RuntimeError};
use super::value::{Value, ValueType};
use crate::music::Music;

type OpFn = fn(&[Value]) -> EvalResult<Value>;

pub struct Operator {
    pub name: &'static str,
    pub params: &'static [ValueType],
    pub result: ValueType,
    imp: OpFn,
}

impl Operator {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Check operand count and types, then invoke.
    pub fn apply(&self, args: &[Value]) -> EvalResult<Value> {
        if args.len() != self.arity() {
            return Err(RuntimeError::wrong_arity(self.name, self.arity(), args.len()));
        }
        for (i, (expected, actual)) in self.params.iter().zip(args).enumerate() {
            if !expected.accepts(actual) {
                return Err(RuntimeError::type_mismatch(format!(
                    "operator '{}' expects {} as argument {}, got {}",
                    self.name,
                    expected,
                    i + 1,
                    actual.type_of()
                )));
            }
        }
        tracing::trace!(op = self.name, "apply operator");
        let value = (self.imp)(args)?;
        debug_assert!(
            self.result.accepts(&value),
            "operator '{}' returned {}",
            self.name,
            value.type_of()
        );
        Ok(value)
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Operator({})", self.name)
    }
}

const INT_INT: &[ValueType] = &[ValueType::Int, ValueType::Int];
const BOOL_BOOL: &[ValueType] = &[ValueType::Bool, ValueType::Bool];
const ANY_ANY: &[ValueType] = &[ValueType::Any, ValueType::Any];
const MUSIC_MUSIC: &[ValueType] = &[ValueType::Music, ValueType::Music];
const MUSIC: &[ValueType] = &[ValueType::Music];

const fn op(name: &'static str, params: &'static [ValueType], result: ValueType, imp: OpFn) -> Operator {
    Operator {
        name,
        params,
        result,
        imp,
    }
}

pub static OPERATORS: [Operator; 22] = [
    // arithmetic
    op("+", INT_INT, ValueType::Int, add),
    op("-", INT_INT, ValueType::Int, sub),
    op("*", INT_INT, ValueType::Int, mul),
    op("/", INT_INT, ValueType::Int, div),
    op("%", INT_INT, ValueType::Int, rem),
    // comparison
    op("==", ANY_ANY, ValueType::Bool, eq),
    op("!=", ANY_ANY, ValueType::Bool, ne),
    op("<", INT_INT, ValueType::Bool, lt),
    op(">", INT_INT, ValueType::Bool, gt),
    op("<=", INT_INT, ValueType::Bool, le),
    op(">=", INT_INT, ValueType::Bool, ge),
    // logic
    op("and", BOOL_BOOL, ValueType::Bool, and),
    op("or", BOOL_BOOL, ValueType::Bool, or),
    op("not", &[ValueType::Bool], ValueType::Bool, not),
    // music
    op("++", MUSIC_MUSIC, ValueType::Music, concat),
    op("|", MUSIC_MUSIC, ValueType::Music, harmony),
    op("!", &[ValueType::Int, ValueType::Music], ValueType::Music, transpose),
    op("pitch", MUSIC, ValueType::Int, pitch),
    op("initialize", MUSIC, ValueType::Music, initialize),
    op("head", MUSIC, ValueType::Music, head),
    op("tail", MUSIC, ValueType::Music, tail),
    op("is_empty", MUSIC, ValueType::Bool, is_empty),
];

// Implementations run after type checking, so the extractors below only
// fail on a registry entry whose signature disagrees with its function.

fn int(v: &Value) -> EvalResult<i64> {
    match v {
        Value::Int(n) => Ok(*n),
        other => Err(RuntimeError::type_mismatch(format!(
            "expected int, got {}",
            other.type_of()
        ))),
    }
}

fn boolean(v: &Value) -> EvalResult<bool> {
    match v {
        Value::Bool(b) => Ok(*b),
        other => Err(RuntimeError::type_mismatch(format!(
            "expected bool, got {}",
            other.type_of()
        ))),
    }
}

fn music(v: &Value) -> EvalResult<&Music> {
    match v {
        Value::Music(m) => Ok(m),
        other => Err(RuntimeError::type_mismatch(format!(
            "expected music, got {}",
            other.type_of()
        ))),
    }
}

fn overflow(op: &str) -> RuntimeError {
    RuntimeError::arithmetic(format!("integer overflow in '{op}'"))
}

fn add(args: &[Value]) -> EvalResult<Value> {
    let (a, b) = (int(&args[0])?, int(&args[1])?);
    a.checked_add(b).map(Value::Int).ok_or_else(|| overflow("+"))
}

fn sub(args: &[Value]) -> EvalResult<Value> {
    let (a, b) = (int(&args[0])?, int(&args[1])?);
    a.checked_sub(b).map(Value::Int).ok_or_else(|| overflow("-"))
}

fn mul(args: &[Value]) -> EvalResult<Value> {
    let (a, b) = (int(&args[0])?, int(&args[1])?);
    a.checked_mul(b).map(Value::Int).ok_or_else(|| overflow("*"))
}

/// Floor division: rounds toward negative infinity.
fn div(args: &[Value]) -> EvalResult<Value> {
    let (a, b) = (int(&args[0])?, int(&args[1])?);
    if b == 0 {
        return Err(RuntimeError::arithmetic("division by zero"));
    }
    let q = a.checked_div(b).ok_or_else(|| overflow("/"))?;
    let floored = if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    };
    Ok(Value::Int(floored))
}

/// Remainder with the sign of the divisor.
fn rem(args: &[Value]) -> EvalResult<Value> {
    let (a, b) = (int(&args[0])?, int(&args[1])?);
    if b == 0 {
        return Err(RuntimeError::arithmetic("modulo by zero"));
    }
    let r = a.checked_rem(b).ok_or_else(|| overflow("%"))?;
    let adjusted = if r != 0 && ((r < 0) != (b < 0)) {
        r + b
    } else {
        r
    };
    Ok(Value::Int(adjusted))
}

fn eq(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Bool(args[0] == args[1]))
}

fn ne(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Bool(args[0] != args[1]))
}

fn lt(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Bool(int(&args[0])? < int(&args[1])?))
}

fn gt(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Bool(int(&args[0])? > int(&args[1])?))
}

fn le(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Bool(int(&args[0])? <= int(&args[1])?))
}

fn ge(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Bool(int(&args[0])? >= int(&args[1])?))
}

fn and(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Bool(boolean(&args[0])? && boolean(&args[1])?))
}

fn or(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Bool(boolean(&args[0])? || boolean(&args[1])?))
}

fn not(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Bool(!boolean(&args[0])?))
}

fn concat(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Music(music(&args[0])?.concat(music(&args[1])?)?))
}

fn harmony(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Music(music(&args[0])?.harmony(music(&args[1])?)))
}

fn transpose(args: &[Value]) -> EvalResult<Value> {
    let semitones = int(&args[0])?;
    let semitones = i32::try_from(semitones)
        .map_err(|_| RuntimeError::arithmetic(format!("transposition out of range: {semitones}")))?;
    Ok(Value::Music(music(&args[1])?.transpose(semitones)?))
}

fn pitch(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Int(music(&args[0])?.first_pitch()? as i64))
}

fn initialize(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Music(music(&args[0])?.initialize()))
}

fn head(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Music(music(&args[0])?.head()?))
}

fn tail(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Music(music(&args[0])?.tail()?))
}

fn is_empty(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Bool(music(&args[0])?.is_empty()))
}
