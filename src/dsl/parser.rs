//! Parser for the composition language.
//!
//! Recursive descent over the token stream. All binary operators share a
//! single precedence level and associate to the left, so `1 + 2 * 3` reads
//! as `(1 + 2) * 3`; parenthesize to group otherwise.

use std::rc::Rc;

use super::ast::*;
use super::error::CompileError;
use super::token::{Token, TokenKind};
use crate::stack::ensure_sufficient_stack;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(&mut self) -> Result<Program, CompileError> {
        let commands = self.parse_command_seq()?;
        if !self.is_at_end() {
            let t = self.peek();
            return Err(CompileError::parse(
                format!("expected ';' or end of input, got {:?}", t.kind),
                t.line,
                t.col,
            ));
        }
        Ok(Program { commands })
    }

    /// One or more commands separated by `;`, with an optional trailing `;`.
    fn parse_command_seq(&mut self) -> Result<Vec<Command>, CompileError> {
        let mut commands = vec![self.parse_command()?];
        while self.check(&TokenKind::Semicolon) {
            self.advance();
            if self.at_seq_end() {
                break;
            }
            commands.push(self.parse_command()?);
        }
        Ok(commands)
    }

    fn at_seq_end(&self) -> bool {
        self.is_at_end() || self.check(&TokenKind::RBrace) || self.check(&TokenKind::Return)
    }

    fn parse_command(&mut self) -> Result<Command, CompileError> {
        let t = self.peek().clone();
        match &t.kind {
            TokenKind::Var => {
                self.advance();
                let name = self.expect_ident()?;
                self.expect(TokenKind::Eq)?;
                let expr = self.parse_expr()?;
                Ok(Command::VarDecl { name, expr })
            }
            TokenKind::Ident(_) => {
                let name = self.expect_ident()?;
                self.expect(TokenKind::Assign)?;
                let expr = self.parse_expr()?;
                Ok(Command::Assign { name, expr })
            }
            TokenKind::Print => {
                self.advance();
                Ok(Command::Print(self.parse_expr()?))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::While => {
                self.advance();
                let cond = self.parse_expr()?;
                self.expect(TokenKind::Do)?;
                let body = self.parse_block()?;
                Ok(Command::While { cond, body })
            }
            TokenKind::Function => self.parse_function(),
            TokenKind::Procedure => self.parse_procedure(),
            _ => Err(CompileError::parse(
                format!("expected command, got {:?}", t.kind),
                t.line,
                t.col,
            )),
        }
    }

    fn parse_if(&mut self) -> Result<Command, CompileError> {
        self.expect(TokenKind::If)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Then)?;
        let then_branch = self.parse_block()?;
        self.expect(TokenKind::Else)?;
        let else_branch = self.parse_block()?;
        Ok(Command::IfElse {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_block(&mut self) -> Result<Vec<Command>, CompileError> {
        self.expect(TokenKind::LBrace)?;
        let commands = ensure_sufficient_stack(|| self.parse_command_seq())?;
        self.expect(TokenKind::RBrace)?;
        Ok(commands)
    }

    fn parse_function(&mut self) -> Result<Command, CompileError> {
        self.expect(TokenKind::Function)?;
        let name = self.expect_ident()?;
        let params = self.parse_params()?;
        self.expect(TokenKind::Eq)?;
        let body = self.parse_expr()?;
        Ok(Command::FunctionDecl(Rc::new(FunctionDecl { name, params, body })))
    }

    /// `procedure name(params) = { commands return expr }`; the command
    /// list may be empty.
    fn parse_procedure(&mut self) -> Result<Command, CompileError> {
        self.expect(TokenKind::Procedure)?;
        let name = self.expect_ident()?;
        let params = self.parse_params()?;
        self.expect(TokenKind::Eq)?;
        self.expect(TokenKind::LBrace)?;
        let body = if self.check(&TokenKind::Return) {
            Vec::new()
        } else {
            ensure_sufficient_stack(|| self.parse_command_seq())?
        };
        self.expect(TokenKind::Return)?;
        let result = self.parse_expr()?;
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Command::ProcedureDecl(Rc::new(ProcedureDecl {
            name,
            params,
            body,
            result,
        })))
    }

    fn parse_params(&mut self) -> Result<Vec<Name>, CompileError> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            params.push(self.expect_ident()?);
            while self.check(&TokenKind::Comma) {
                self.advance();
                params.push(self.expect_ident()?);
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_expr(&mut self) -> Result<Expr, CompileError> {
        ensure_sufficient_stack(|| {
            if self.check(&TokenKind::Let) {
                return self.parse_let();
            }

            let mut left = self.parse_mono()?;
            while let TokenKind::BinOp(op) = self.peek().kind {
                self.advance();
                let right = self.parse_mono()?;
                left = Expr::op(op, vec![left, right]);
            }
            Ok(left)
        })
    }

    fn parse_let(&mut self) -> Result<Expr, CompileError> {
        self.expect(TokenKind::Let)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Eq)?;
        let bound = self.parse_expr()?;
        self.expect(TokenKind::In)?;
        let body = self.parse_expr()?;
        Ok(Expr::Let {
            name,
            bound: Box::new(bound),
            body: Box::new(body),
        })
    }

    fn parse_mono(&mut self) -> Result<Expr, CompileError> {
        let t = self.peek().clone();
        match t.kind {
            TokenKind::Integer(v) => {
                self.advance();
                Ok(Expr::Number(v))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Boolean(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Boolean(false))
            }
            TokenKind::Note(n) => {
                self.advance();
                Ok(Expr::Note(NoteLiteral {
                    pitch: n.pitch,
                    accidental: n.accidental,
                    octave: n.octave,
                    duration: n.duration,
                }))
            }
            TokenKind::Rest(duration) => {
                self.advance();
                Ok(Expr::Rest(duration))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::UnOp(op) => {
                self.advance();
                let operand = ensure_sufficient_stack(|| self.parse_mono())?;
                Ok(Expr::op(op, vec![operand]))
            }
            TokenKind::Ident(_) => {
                let name = self.expect_ident()?;
                if self.check(&TokenKind::LParen) {
                    let args = self.parse_args()?;
                    Ok(Expr::FunctionApply { name, args })
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            _ => Err(CompileError::parse(
                format!("expected expression, got {:?}", t.kind),
                t.line,
                t.col,
            )),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, CompileError> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            args.push(self.parse_expr()?);
            while self.check(&TokenKind::Comma) {
                self.advance();
                args.push(self.parse_expr()?);
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    // --- Utility methods ---

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> &Token {
        let t = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len() || self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: &TokenKind) -> bool {
        !self.is_at_end() && std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token, CompileError> {
        if std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(&kind) {
            Ok(self.advance())
        } else {
            let t = self.peek();
            Err(CompileError::parse(
                format!("expected {kind:?}, got {:?}", t.kind),
                t.line,
                t.col,
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<Name, CompileError> {
        let t = self.peek();
        match &t.kind {
            TokenKind::Ident(s) => {
                let name: Name = s.as_str().into();
                self.advance();
                Ok(name)
            }
            _ => Err(CompileError::parse(
                format!("expected identifier, got {:?}", t.kind),
                t.line,
                t.col,
            )),
        }
    }
}
