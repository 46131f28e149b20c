use crate::core::lexer::{Span, SpannedToken, Token};
use crate::domain::ast::*;
use crate::utils::error::{PlaybookError, Result};
use std::mem::discriminant;

pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    /// Comments are dropped here; the grammar never sees them.
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        let mut tokens: Vec<SpannedToken> = tokens
            .into_iter()
            .filter(|t| !matches!(t.token, Token::Comment(_)))
            .collect();
        if tokens.last().map(|t| &t.token) != Some(&Token::Eof) {
            let span = tokens
                .last()
                .map(|t| t.span)
                .unwrap_or(Span { line: 1, column: 1 });
            tokens.push(SpannedToken {
                token: Token::Eof,
                span,
            });
        }
        Self { tokens, pos: 0 }
    }

    fn current(&self) -> &SpannedToken {
        // `new` guarantees a trailing Eof, and `advance` never steps past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.current().token
    }

    fn advance(&mut self) -> SpannedToken {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn error_at(&self, found: &SpannedToken, expected: &str) -> PlaybookError {
        PlaybookError::ParseError {
            line: found.span.line,
            column: found.span.column,
            message: format!("expected {}, found {}", expected, found.token),
        }
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<()> {
        if discriminant(self.peek()) == discriminant(&expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_at(self.current(), what))
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Result<String> {
        let spanned = self.advance();
        match spanned.token {
            Token::Identifier(name) => Ok(name),
            _ => Err(self.error_at(&spanned, what)),
        }
    }

    fn expect_number(&mut self, what: &str) -> Result<f64> {
        let spanned = self.advance();
        match spanned.token {
            Token::Number(n) => Ok(n),
            _ => Err(self.error_at(&spanned, what)),
        }
    }

    fn consume_if(&mut self, expected: &Token) -> bool {
        if discriminant(self.peek()) == discriminant(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Runs `item` until the closing brace of a `{ ... }` list, allowing an
    /// optional comma after each item.
    fn parse_list<F>(&mut self, mut item: F) -> Result<()>
    where
        F: FnMut(&mut Self) -> Result<()>,
    {
        self.expect(Token::LBrace, "'{'")?;
        while *self.peek() != Token::RBrace {
            item(self)?;
            self.consume_if(&Token::Comma);
        }
        self.expect(Token::RBrace, "'}'")
    }

    fn parse_coordinate(&mut self) -> Result<Point> {
        self.expect(Token::LParen, "'(' to start a coordinate")?;
        let x = self.expect_number("number for x")?;
        self.expect(Token::Comma, "',' between coordinates")?;
        let y = self.expect_number("number for y")?;
        self.expect(Token::RParen, "')' to close a coordinate")?;
        Ok(Point::new(x, y))
    }

    fn parse_timing(&mut self) -> Result<Timing> {
        if !self.consume_if(&Token::Colon) {
            return Ok(Timing::Unspecified);
        }
        let spanned = self.advance();
        match spanned.token {
            Token::Before => Ok(Timing::Before),
            Token::After => Ok(Timing::After),
            Token::Middle => Ok(Timing::Middle),
            _ => Err(self.error_at(&spanned, "timing 'before', 'after' or 'middle'")),
        }
    }

    pub fn parse(&mut self) -> Result<Playbook> {
        let mut playbook = Playbook::default();

        loop {
            match self.peek() {
                Token::Eof => break,
                Token::Players => {
                    self.advance();
                    self.consume_if(&Token::Equals);
                    self.parse_list(|p| {
                        let player = p.expect_identifier("player name")?;
                        playbook.players.push(player);
                        Ok(())
                    })?;
                }
                Token::State => {
                    self.advance();
                    self.consume_if(&Token::Equals);
                    self.expect(Token::LBrace, "'{'")?;
                    playbook.state = self.parse_state_block()?;
                    self.expect(Token::RBrace, "'}' to close 'state'")?;
                }
                Token::Action => {
                    self.advance();
                    self.consume_if(&Token::Equals);
                    self.expect(Token::LBrace, "'{'")?;
                    playbook.action = self.parse_action_block()?;
                    self.expect(Token::RBrace, "'}' to close 'action'")?;
                }
                _ => {
                    return Err(
                        self.error_at(self.current(), "section 'players', 'state' or 'action'")
                    );
                }
            }
        }

        Ok(playbook)
    }

    fn parse_state_block(&mut self) -> Result<State> {
        let mut state = State::default();
        while !matches!(self.peek(), Token::RBrace | Token::Eof) {
            match self.peek() {
                Token::Baller => {
                    self.advance();
                    self.expect(Token::Equals, "'=' after 'baller'")?;
                    state.baller = Some(self.expect_identifier("player name")?);
                }
                Token::Position => {
                    self.advance();
                    self.expect(Token::Equals, "'=' after 'position'")?;
                    self.parse_list(|p| {
                        let player = p.expect_identifier("player name")?;
                        p.expect(Token::Equals, "'=' after player name")?;
                        let point = p.parse_coordinate()?;
                        state.positions.insert(player, point);
                        Ok(())
                    })?;
                }
                _ => return Err(self.error_at(self.current(), "'baller' or 'position'")),
            }
            self.consume_if(&Token::Comma);
        }
        Ok(state)
    }

    fn parse_action_block(&mut self) -> Result<Action> {
        let mut action = Action::default();
        while !matches!(self.peek(), Token::RBrace | Token::Eof) {
            match self.peek() {
                Token::Move => {
                    self.advance();
                    self.expect(Token::Equals, "'=' after 'move'")?;
                    self.parse_list(|p| {
                        let player = p.expect_identifier("player name")?;
                        p.expect(Token::Arrow, "'->' after player name")?;
                        let target = p.parse_coordinate()?;
                        action.moves.push(MoveAction { player, target });
                        Ok(())
                    })?;
                }
                Token::Screen => {
                    self.advance();
                    self.expect(Token::Equals, "'=' after 'screen'")?;
                    self.parse_list(|p| {
                        let player = p.expect_identifier("player name")?;
                        p.expect(Token::Arrow, "'->' after player name")?;
                        let target = p.expect_identifier("screened player name")?;
                        let timing = p.parse_timing()?;
                        action.screens.push(ScreenAction {
                            player,
                            target,
                            timing,
                        });
                        Ok(())
                    })?;
                }
                Token::Pass => {
                    self.advance();
                    self.expect(Token::Equals, "'=' after 'pass'")?;
                    self.parse_list(|p| {
                        let from = p.expect_identifier("passer name")?;
                        p.expect(Token::Arrow, "'->' after passer name")?;
                        let to = p.expect_identifier("receiver name")?;
                        let timing = p.parse_timing()?;
                        action.passes.push(PassAction { from, to, timing });
                        Ok(())
                    })?;
                }
                _ => return Err(self.error_at(self.current(), "'move', 'screen' or 'pass'")),
            }
            self.consume_if(&Token::Comma);
        }
        Ok(action)
    }
}
