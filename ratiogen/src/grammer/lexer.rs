use super::token::{double_char_token, keyword, single_char_token, Pos, Token, TokenKind};
use std::iter::Peekable;
use std::str::CharIndices;

pub struct LineLexer<'a> {
    iter: Peekable<CharIndices<'a>>,
    row: usize,
}

impl<'a> LineLexer<'a> {
    pub fn new(line: &'a str, row: usize) -> Self {
        Self {
            iter: line.char_indices().peekable(),
            row,
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> LineLexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<(usize, char)> {
        self.iter.clone().nth(n)
    }
    fn peek_char(&self, n: usize) -> Option<char> {
        self.peek_nth(n).map(|(_, ch)| ch)
    }
    fn consume(&mut self) -> Option<(usize, char)> {
        self.iter.next()
    }
}

// ----------------------------------------------------------------------------
// Lexer
// ----------------------------------------------------------------------------

impl<'a> LineLexer<'a> {
    pub fn parse(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some((idx, ch0)) = self.peek_nth(0) {
            // 0. Skip whitespaces
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            let pos = Pos {
                row: self.row,
                col: idx,
            };

            // 1. Comment
            if ch0 == '#' {
                self.consume();
                let comment = self.iter.by_ref().map(|(_, ch)| ch).collect::<String>();
                tokens.push(Token::new(TokenKind::Comment(comment.trim().to_string()), pos));
                break;
            }

            // 2. Number literal
            let ch1 = self.peek_char(1);
            if ch0.is_ascii_digit() || (ch0 == '.' && ch1.is_some_and(|c| c.is_ascii_digit())) {
                tokens.push(Token::new(self.parse_number(), pos));
                continue;
            }

            // 3. Double character token
            if let Some(kind) = ch1.and_then(|ch1| double_char_token(ch0, ch1)) {
                self.consume();
                self.consume();
                tokens.push(Token::new(kind, pos));
                continue;
            }

            // 4. Single character token
            if let Some(kind) = single_char_token(ch0) {
                self.consume();
                tokens.push(Token::new(kind, pos));
                continue;
            }

            // 5. String literal
            if ch0 == '"' || ch0 == '\'' {
                tokens.push(Token::new(self.parse_text(ch0), pos));
                continue;
            }

            // 6. Identifier or keyword
            if ch0.is_ascii_alphabetic() || ch0 == '_' {
                tokens.push(Token::new(self.parse_word(), pos));
                continue;
            }

            // Error
            self.consume();
            tokens.push(Token::new(TokenKind::Error(format!("{ch0}")), pos));
        }
        tokens
    }

    fn parse_word(&mut self) -> TokenKind {
        let mut lexeme = String::new();
        while let Some((_, ch)) = self
            .iter
            .next_if(|(_, ch)| ch.is_ascii_alphanumeric() || *ch == '_')
        {
            lexeme.push(ch);
        }
        match keyword(&lexeme) {
            Some(kind) => kind,
            None => TokenKind::Ident(lexeme),
        }
    }

    // Text: "abc", 'abc', """abc"""
    fn parse_text(&mut self, quote: char) -> TokenKind {
        let triple = self.peek_char(1) == Some(quote) && self.peek_char(2) == Some(quote);
        let width = if triple { 3 } else { 1 };
        for _ in 0..width {
            self.consume();
        }

        let mut lexeme = String::new();
        loop {
            let Some((_, ch)) = self.consume() else {
                return TokenKind::Error(format!("unterminated string: {lexeme}"));
            };
            if ch == '\\' {
                match self.consume() {
                    Some((_, 'n')) => lexeme.push('\n'),
                    Some((_, 't')) => lexeme.push('\t'),
                    Some((_, ch)) if matches!(ch, '\\' | '\'' | '"') => lexeme.push(ch),
                    Some((_, ch)) => {
                        lexeme.push('\\');
                        lexeme.push(ch);
                    }
                    None => return TokenKind::Error(format!("unterminated string: {lexeme}")),
                }
                continue;
            }
            if ch == quote {
                if !triple {
                    break;
                }
                if self.peek_char(0) == Some(quote) && self.peek_char(1) == Some(quote) {
                    self.consume();
                    self.consume();
                    break;
                }
            }
            lexeme.push(ch);
        }
        TokenKind::Text(lexeme)
    }

    // Number: 42, 0x3c, 1.5, .5, 1e-3
    fn parse_number(&mut self) -> TokenKind {
        let mut lexeme = String::new();
        let radix = self.peek_char(0) == Some('0')
            && matches!(self.peek_char(1), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'));
        if radix {
            while let Some((_, ch)) = self
                .iter
                .next_if(|(_, ch)| ch.is_ascii_alphanumeric() || *ch == '_')
            {
                lexeme.push(ch);
            }
            return TokenKind::Number(lexeme);
        }

        self.digits(&mut lexeme);
        if self.peek_char(0) == Some('.') {
            self.consume();
            lexeme.push('.');
            self.digits(&mut lexeme);
        }
        if matches!(self.peek_char(0), Some('e' | 'E')) {
            let exponent = match self.peek_char(1) {
                Some('+' | '-') => self.peek_char(2).is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if exponent {
                for _ in 0..2 {
                    if let Some((_, ch)) = self.consume() {
                        lexeme.push(ch);
                    }
                }
                self.digits(&mut lexeme);
            }
        }
        TokenKind::Number(lexeme)
    }

    fn digits(&mut self, lexeme: &mut String) {
        while let Some((_, ch)) = self
            .iter
            .next_if(|(_, ch)| ch.is_ascii_digit() || *ch == '_')
        {
            lexeme.push(ch);
        }
    }
}
