use super::token::{Token, TokenKind};
use crate::error::ParseError;
use std::iter::Peekable;

pub struct Parser<I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn new(tokens: I) -> Self {
        Parser {
            tokens: tokens.peekable(),
        }
    }
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// Skip comments
    fn skip(&mut self) {
        while self
            .tokens
            .next_if(|token| matches!(token.kind, TokenKind::Comment(_)))
            .is_some()
        {}
    }

    /// Peek : Watch next token without consuming it
    pub fn peek(&mut self) -> Option<&Token> {
        self.skip();
        self.tokens.peek()
    }

    /// Next : Consume next token and return it
    pub fn next(&mut self) -> Option<Token> {
        self.skip();
        self.tokens.next()
    }

    /// Peek and check next token is match with condition
    pub fn check_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> bool {
        self.peek().is_some_and(cond)
    }

    /// Consume if next token is match with condition
    pub fn consume_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Option<Token> {
        self.skip();
        self.tokens.next_if(|token| cond(token))
    }

    /// Consume until next token is match with condition
    pub fn consume_until<F: Fn(&Token) -> bool>(&mut self, cond: F) {
        while let Some(token) = self.peek() {
            if cond(token) {
                return;
            }
            self.tokens.next();
        }
    }

    /// Next token must be match with condition (skipping comments)
    pub fn expect_tobe<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Result<Token, ParseError> {
        let Some(token) = self.peek() else {
            return Err(ParseError::UnexpectedEOL);
        };
        if !cond(token) {
            return Err(ParseError::UnexpectedToken(token.into()));
        }
        self.next().ok_or(ParseError::UnexpectedEOL)
    }

    /// End of line or statement separator
    pub fn at_stmt_end(&mut self) -> bool {
        self.peek()
            .map_or(true, |token| token.kind == TokenKind::Semicolon)
    }
}

#[macro_export]
macro_rules! check {
    ($parser:expr, $kind:pat) => {
        $parser.check_if(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! expect {
    ($parser:expr, $kind:pat) => {
        $parser.expect_tobe(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! optional {
    ($parser:expr, $trigger:pat, $following:expr) => {
        if check!($parser, $trigger) {
            expect!($parser, $trigger)?;
            Some($following)
        } else {
            None
        }
    };
    ($parser:expr, $trigger:pat) => {
        $parser.consume_if(|token| matches!(&token.kind, $trigger))
    };
}

/// Parse repeated elements with optional delimiters
/// 3 args: { element } terminal (no delimiter)
/// 4 args: [ element { delimiter element } ] terminal (with delimiter)
#[macro_export]
macro_rules! repeat {
    // Without delimiter: { element } terminal
    ($parser:expr, $elem:expr, $terminal:pat) => {{
        let mut items = Vec::new();
        while !check!($parser, $terminal) {
            items.push($elem?);
        }
        items
    }};

    // With delimiter: [ element { delimiter element } ] terminal
    ($parser:expr, $elem:expr, $delimiter:pat, $terminal:pat) => {{
        let mut items = Vec::new();
        if !check!($parser, $terminal) {
            items.push($elem?);
            while check!($parser, $delimiter) {
                expect!($parser, $delimiter)?;
                items.push($elem?);
            }
        }
        items
    }};
}
