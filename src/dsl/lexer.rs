//! Lexer for the composition language.
//!
//! Converts source text into a stream of [`Token`]s.

use super::error::CompileError;
use super::note::parse_note_name;
use super::token::{NoteToken, Token, TokenKind};
use crate::music::Beat;

/// Longest duration a single note or rest literal may have, in beats.
pub const MAX_DURATION_BEATS: u32 = 1024;

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_trivia();

            if self.is_at_end() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    line: self.line,
                    col: self.col,
                });
                break;
            }

            let ch = self.peek();
            let token = match ch {
                '{' => self.single_char(TokenKind::LBrace),
                '}' => self.single_char(TokenKind::RBrace),
                '(' => self.single_char(TokenKind::LParen),
                ')' => self.single_char(TokenKind::RParen),
                ',' => self.single_char(TokenKind::Comma),
                ';' => self.single_char(TokenKind::Semicolon),
                '-' => self.single_char(TokenKind::BinOp("-")),
                '*' => self.single_char(TokenKind::BinOp("*")),
                '/' => self.single_char(TokenKind::BinOp("/")),
                '%' => self.single_char(TokenKind::BinOp("%")),
                '|' => self.single_char(TokenKind::BinOp("|")),
                '+' => self.one_or_two('+', TokenKind::BinOp("++"), TokenKind::BinOp("+")),
                '=' => self.one_or_two('=', TokenKind::BinOp("=="), TokenKind::Eq),
                '!' => self.one_or_two('=', TokenKind::BinOp("!="), TokenKind::BinOp("!")),
                '>' => self.one_or_two('=', TokenKind::BinOp(">="), TokenKind::BinOp(">")),
                '<' => self.lex_less(),
                '0'..='9' => self.lex_integer()?,
                'a'..='z' => self.lex_ident_or_keyword(),
                'A'..='Z' => self.lex_note_or_rest()?,
                _ => {
                    return Err(CompileError::lex(
                        format!("unexpected character: '{ch}'"),
                        self.line,
                        self.col,
                    ));
                }
            };

            tokens.push(token);
        }

        Ok(tokens)
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        ch
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Skip whitespace (newlines included) and `//` line comments.
    fn skip_trivia(&mut self) {
        while !self.is_at_end() {
            let ch = self.peek();
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '/' && self.peek_next() == Some('/') {
                while !self.is_at_end() && self.peek() != '\n' {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn single_char(&mut self, kind: TokenKind) -> Token {
        let line = self.line;
        let col = self.col;
        self.advance();
        Token { kind, line, col }
    }

    /// Lex `c` optionally followed by `second`, preferring the two-char form.
    fn one_or_two(&mut self, second: char, double: TokenKind, single: TokenKind) -> Token {
        let line = self.line;
        let col = self.col;
        self.advance();
        let kind = if !self.is_at_end() && self.peek() == second {
            self.advance();
            double
        } else {
            single
        };
        Token { kind, line, col }
    }

    fn lex_less(&mut self) -> Token {
        let line = self.line;
        let col = self.col;
        self.advance(); // consume '<'
        let kind = match self.chars.get(self.pos) {
            Some('-') => {
                self.advance();
                TokenKind::Assign
            }
            Some('=') => {
                self.advance();
                TokenKind::BinOp("<=")
            }
            _ => TokenKind::BinOp("<"),
        };
        Token { kind, line, col }
    }

    fn lex_integer(&mut self) -> Result<Token, CompileError> {
        let line = self.line;
        let col = self.col;
        let mut s = String::new();

        while !self.is_at_end() && self.peek().is_ascii_digit() {
            s.push(self.advance());
        }

        let val: i64 = s
            .parse()
            .map_err(|_| CompileError::lex(format!("integer out of range: {s}"), line, col))?;
        Ok(Token {
            kind: TokenKind::Integer(val),
            line,
            col,
        })
    }

    fn lex_ident_or_keyword(&mut self) -> Token {
        let line = self.line;
        let col = self.col;
        let s = self.take_word();

        let kind = match s.as_str() {
            "var" => TokenKind::Var,
            "print" => TokenKind::Print,
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "function" => TokenKind::Function,
            "procedure" => TokenKind::Procedure,
            "return" => TokenKind::Return,
            "let" => TokenKind::Let,
            "in" => TokenKind::In,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "and" => TokenKind::BinOp("and"),
            "or" => TokenKind::BinOp("or"),
            "not" => TokenKind::UnOp("not"),
            "head" => TokenKind::UnOp("head"),
            "tail" => TokenKind::UnOp("tail"),
            "is_empty" => TokenKind::UnOp("is_empty"),
            "pitch" => TokenKind::UnOp("pitch"),
            "initialize" => TokenKind::UnOp("initialize"),
            _ => TokenKind::Ident(s),
        };

        Token { kind, line, col }
    }

    /// Lex `R[/dur]` or `<Pitch><Accidental><Octave>[/dur]`.
    fn lex_note_or_rest(&mut self) -> Result<Token, CompileError> {
        let line = self.line;
        let col = self.col;
        let word = self.take_word();
        let duration = self.lex_duration(line, col)?;

        let kind = if word == "R" {
            TokenKind::Rest(duration)
        } else {
            let (pitch, accidental, octave) = parse_note_name(&word).ok_or_else(|| {
                CompileError::lex(format!("invalid note literal: '{word}'"), line, col)
            })?;
            TokenKind::Note(NoteToken {
                pitch,
                accidental,
                octave,
                duration,
            })
        };

        Ok(Token { kind, line, col })
    }

    /// A `/` right after a note or rest always introduces its duration.
    fn lex_duration(&mut self, line: usize, col: usize) -> Result<Beat, CompileError> {
        if self.is_at_end()
            || self.peek() != '/'
            || !self.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            return Ok(Beat::from_beats(1));
        }
        self.advance(); // consume '/'

        let mut s = String::new();
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            s.push(self.advance());
        }
        if !self.is_at_end()
            && self.peek() == '.'
            && self.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            s.push(self.advance());
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                s.push(self.advance());
            }
        }

        let beats: f64 = s
            .parse()
            .map_err(|_| CompileError::lex(format!("invalid duration: {s}"), line, col))?;
        if beats > f64::from(MAX_DURATION_BEATS) {
            return Err(CompileError::lex(
                format!("duration too long: {s} (at most {MAX_DURATION_BEATS} beats)"),
                line,
                col,
            ));
        }
        let duration = Beat::from_beats_f64(beats);
        if duration.is_zero() {
            return Err(CompileError::lex(
                format!("duration must be positive: {s}"),
                line,
                col,
            ));
        }
        Ok(duration)
    }

    fn take_word(&mut self) -> String {
        let mut s = String::new();
        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == '_') {
            s.push(self.advance());
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::error::ErrorKind;
    use crate::music::{Accidental, PitchClass};

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lex_var_decl() {
        assert_eq!(
            kinds("var x = 3"),
            vec![
                TokenKind::Var,
                TokenKind::Ident("x".to_string()),
                TokenKind::Eq,
                TokenKind::Integer(3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_assign_versus_less() {
        assert_eq!(kinds("i <- 1")[1], TokenKind::Assign);
        assert_eq!(kinds("i < 1")[1], TokenKind::BinOp("<"));
        assert_eq!(kinds("i <= 1")[1], TokenKind::BinOp("<="));
    }

    #[test]
    fn lex_two_char_operators() {
        assert_eq!(
            kinds("++ + == != ! >= >"),
            vec![
                TokenKind::BinOp("++"),
                TokenKind::BinOp("+"),
                TokenKind::BinOp("=="),
                TokenKind::BinOp("!="),
                TokenKind::BinOp("!"),
                TokenKind::BinOp(">="),
                TokenKind::BinOp(">"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_note_with_duration() {
        match &kinds("Eb4/0.5")[0] {
            TokenKind::Note(n) => {
                assert_eq!(n.pitch, PitchClass::E);
                assert_eq!(n.accidental, Accidental::Flat);
                assert_eq!(n.octave, 4);
                assert_eq!(n.duration, Beat::from_beats_f64(0.5));
            }
            other => panic!("expected Note, got {other:?}"),
        }
    }

    #[test]
    fn lex_note_default_duration() {
        match &kinds("Cn4")[0] {
            TokenKind::Note(n) => assert_eq!(n.duration, Beat::from_beats(1)),
            other => panic!("expected Note, got {other:?}"),
        }
    }

    #[test]
    fn lex_rest() {
        assert_eq!(kinds("R/24")[0], TokenKind::Rest(Beat::from_beats(24)));
        assert_eq!(kinds("R")[0], TokenKind::Rest(Beat::from_beats(1)));
    }

    #[test]
    fn slash_after_identifier_is_division() {
        assert_eq!(
            kinds("n/2"),
            vec![
                TokenKind::Ident("n".to_string()),
                TokenKind::BinOp("/"),
                TokenKind::Integer(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_word_operators() {
        assert_eq!(
            kinds("not head tail is_empty pitch initialize and or"),
            vec![
                TokenKind::UnOp("not"),
                TokenKind::UnOp("head"),
                TokenKind::UnOp("tail"),
                TokenKind::UnOp("is_empty"),
                TokenKind::UnOp("pitch"),
                TokenKind::UnOp("initialize"),
                TokenKind::BinOp("and"),
                TokenKind::BinOp("or"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_line_tracking() {
        let tokens = Lexer::new("var a = 1;\nprint a").tokenize().unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[5].kind, TokenKind::Print);
        assert_eq!(tokens[5].line, 2);
        assert_eq!(tokens[5].col, 1);
    }

    #[test]
    fn lex_comment() {
        assert_eq!(
            kinds("print 1 // trailing\nprint 2"),
            vec![
                TokenKind::Print,
                TokenKind::Integer(1),
                TokenKind::Print,
                TokenKind::Integer(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_error_on_unexpected_char() {
        let err = Lexer::new("print 1 @").tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::LexError);
        assert_eq!(err.col, 9);
    }

    #[test]
    fn lex_error_on_bad_note() {
        assert!(Lexer::new("Hn4").tokenize().is_err());
        assert!(Lexer::new("Scale").tokenize().is_err());
    }

    #[test]
    fn lex_error_on_zero_duration() {
        assert!(Lexer::new("Cn4/0").tokenize().is_err());
    }

    #[test]
    fn lex_error_on_oversized_duration() {
        let err = Lexer::new("Cn4/99999999999999999999").tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::LexError);
        assert!(err.message.contains("too long"), "{}", err.message);
        assert!(Lexer::new("R/1024.5").tokenize().is_err());
        assert_eq!(kinds("R/1024")[0], TokenKind::Rest(Beat::from_beats(1024)));
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }
}
