//! Token types for the composition language lexer.

use crate::music::{Accidental, Beat, PitchClass};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    Var,
    Print,
    If,
    Then,
    Else,
    While,
    Do,
    Function,
    Procedure,
    Return,
    Let,
    In,
    True,
    False,

    // Literals
    Ident(String),
    Integer(i64),
    Note(NoteToken),
    Rest(Beat),

    // Operators; word operators (`and`, `head`, ...) are carried by name
    BinOp(&'static str),
    UnOp(&'static str),

    // Delimiters
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Semicolon,
    Assign, // <-
    Eq,     // =

    Eof,
}

/// A spelled note literal such as `Eb4/0.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteToken {
    pub pitch: PitchClass,
    pub accidental: Accidental,
    pub octave: i32,
    pub duration: Beat,
}
