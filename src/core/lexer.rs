use crate::utils::error::{PlaybookError, Result};
use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    // Keywords
    Players,
    State,
    Baller,
    Position,
    Action,
    Move,
    Screen,
    Pass,
    Before,
    After,
    Middle,

    Identifier(String),
    Number(f64),

    Equals,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Arrow,
    Colon,

    Comment(String),
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Players => f.write_str("'players'"),
            Token::State => f.write_str("'state'"),
            Token::Baller => f.write_str("'baller'"),
            Token::Position => f.write_str("'position'"),
            Token::Action => f.write_str("'action'"),
            Token::Move => f.write_str("'move'"),
            Token::Screen => f.write_str("'screen'"),
            Token::Pass => f.write_str("'pass'"),
            Token::Before => f.write_str("'before'"),
            Token::After => f.write_str("'after'"),
            Token::Middle => f.write_str("'middle'"),
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::Number(n) => write!(f, "number {}", n),
            Token::Equals => f.write_str("'='"),
            Token::LBrace => f.write_str("'{'"),
            Token::RBrace => f.write_str("'}'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Comma => f.write_str("','"),
            Token::Arrow => f.write_str("'->'"),
            Token::Colon => f.write_str("':'"),
            Token::Comment(_) => f.write_str("comment"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
        }
    }

    fn error(&self, span: Span, message: String) -> PlaybookError {
        PlaybookError::LexError {
            line: span.line,
            column: span.column,
            message,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if keep(c) {
                self.advance();
            } else {
                break;
            }
        }
        &self.input[start..self.pos]
    }

    fn read_number(&mut self, span: Span) -> Result<f64> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        self.read_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.read_while(|c| c.is_ascii_digit());
        }
        let text = &self.input[start..self.pos];
        text.parse()
            .map_err(|_| self.error(span, format!("invalid number '{}'", text)))
    }

    fn read_comment(&mut self) -> String {
        self.advance();
        self.advance();
        self.read_while(|c| c != '\n').trim().to_string()
    }

    pub fn next_token(&mut self) -> Result<SpannedToken> {
        self.skip_whitespace();
        let span = self.span();

        let c = match self.peek() {
            Some(c) => c,
            None => {
                return Ok(SpannedToken {
                    token: Token::Eof,
                    span,
                })
            }
        };

        let token = match c {
            '=' => self.single(Token::Equals),
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            ',' => self.single(Token::Comma),
            ':' => self.single(Token::Colon),
            '-' => match self.peek_second() {
                Some('>') => {
                    self.advance();
                    self.advance();
                    Token::Arrow
                }
                Some(d) if d.is_ascii_digit() => Token::Number(self.read_number(span)?),
                _ => return Err(self.error(span, "unexpected character '-'".to_string())),
            },
            '/' if self.peek_second() == Some('/') => Token::Comment(self.read_comment()),
            _ if c.is_ascii_digit() => Token::Number(self.read_number(span)?),
            _ if c.is_alphabetic() || c == '_' => {
                let ident = self.read_while(|c| c.is_alphanumeric() || c == '_');
                keyword(ident).unwrap_or_else(|| Token::Identifier(ident.to_string()))
            }
            _ => return Err(self.error(span, format!("unexpected character '{}'", c))),
        };

        Ok(SpannedToken { token, span })
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                return Ok(tokens);
            }
        }
    }
}

fn keyword(ident: &str) -> Option<Token> {
    let token = match ident {
        "players" => Token::Players,
        "state" => Token::State,
        "baller" => Token::Baller,
        "position" => Token::Position,
        "action" => Token::Action,
        "move" => Token::Move,
        "screen" => Token::Screen,
        "pass" => Token::Pass,
        "before" => Token::Before,
        "after" => Token::After,
        "middle" => Token::Middle,
        _ => return None,
    };
    Some(token)
}
