use crate::grammer::token::{Token, TokenKind};
use std::fmt;
use thiserror::Error;

/// Fatal errors. Nothing is written once one of these is raised.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Invalid config file: {0}")]
    Config(String, #[source] serde_yaml::Error),

    #[error("Class `{0}` not found; there is nothing that ends the metric definitions")]
    MissingSentinel(String),

    #[error("Invalid event map: {0}")]
    EventMap(#[from] arch::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub col: usize,
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` at column {}", self.kind, self.col + 1)
    }
}

impl From<Token> for TokenInfo {
    fn from(token: Token) -> Self {
        TokenInfo {
            kind: token.kind,
            col: token.pos.col,
        }
    }
}

impl From<&Token> for TokenInfo {
    fn from(token: &Token) -> Self {
        TokenInfo {
            kind: token.kind.clone(),
            col: token.pos.col,
        }
    }
}

/// Errors of the line parser. These only ever skip one line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Unexpected end of line")]
    UnexpectedEOL,

    #[error("Unexpected token: {0}")]
    UnexpectedToken(TokenInfo),

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}
