//! Abstract syntax tree for the composition language.
//!
//! Expressions compute values; commands thread environment and store.

use std::rc::Rc;

use crate::music::{midi_pitch, Accidental, Beat, PitchClass};

/// An identifier as written in source.
pub type Name = Rc<str>;

/// A complete program: its top-level commands in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(i64),
    Boolean(bool),
    Note(NoteLiteral),
    Rest(Beat),
    Variable(Name),
    /// A registered operator applied to its operands, e.g. `++` or `head`.
    OperatorApply {
        op: Name,
        args: Vec<Expr>,
    },
    /// `let name = bound in body`
    Let {
        name: Name,
        bound: Box<Expr>,
        body: Box<Expr>,
    },
    FunctionApply {
        name: Name,
        args: Vec<Expr>,
    },
    ProcedureApply {
        name: Name,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn op(op: &str, args: Vec<Expr>) -> Self {
        Expr::OperatorApply {
            op: op.into(),
            args,
        }
    }

    pub fn var(name: &str) -> Self {
        Expr::Variable(name.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteLiteral {
    pub pitch: PitchClass,
    pub accidental: Accidental,
    pub octave: i32,
    pub duration: Beat,
}

impl NoteLiteral {
    pub fn midi(&self) -> i32 {
        midi_pitch(self.pitch, self.accidental, self.octave)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    VarDecl { name: Name, expr: Expr },
    Assign { name: Name, expr: Expr },
    Print(Expr),
    IfElse {
        cond: Expr,
        then_branch: Vec<Command>,
        else_branch: Vec<Command>,
    },
    While { cond: Expr, body: Vec<Command> },
    FunctionDecl(Rc<FunctionDecl>),
    ProcedureDecl(Rc<ProcedureDecl>),
    Sequence(Vec<Command>),
}

/// `function name(params) = body`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Name,
    pub params: Vec<Name>,
    pub body: Expr,
}

/// `procedure name(params) = { body return result }`
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureDecl {
    pub name: Name,
    pub params: Vec<Name>,
    pub body: Vec<Command>,
    pub result: Expr,
}
