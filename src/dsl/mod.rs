//! Front end: source text → tokens → program AST.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod note;
pub mod parser;
pub mod token;

pub use ast::*;
pub use error::CompileError;

use lexer::Lexer;
use parser::Parser;

/// Parse source text into a [`Program`].
pub fn parse(source: &str) -> Result<Program, CompileError> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize()?;
    let mut parser = Parser::new(tokens);
    parser.parse()
}
