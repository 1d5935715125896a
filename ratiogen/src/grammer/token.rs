use bimap::BiMap;
use once_cell::sync::Lazy;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos) -> Self {
        Token { kind, pos }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Double character tokens
    EqualEqual,   // '=='
    ExclEqual,    // '!='
    RAngleEqual,  // '>='
    LAngleEqual,  // '<='
    LAngleLAngle, // '<<'
    RAngleRAngle, // '>>'
    StarStar,     // '**'
    SlashSlash,   // '//'
    PlusEqual,    // '+='
    MinusEqual,   // '-='

    // Single character tokens
    Equal,     // '='
    Plus,      // '+'
    Minus,     // '-'
    Star,      // '*'
    Slash,     // '/'
    Percent,   // '%'
    Ampasand,  // '&'
    Pipe,      // '|'
    Caret,     // '^'
    Tilde,     // '~'
    Colon,     // ':'
    Semicolon, // ';'
    Comma,     // ','
    Period,    // '.'
    LParen,    // '('
    RParen,    // ')'
    LBracket,  // '['
    RBracket,  // ']'
    LCurly,    // '{'
    RCurly,    // '}'
    LAngle,    // '<'
    RAngle,    // '>'

    // Keywords
    KwDef,    // "def"
    KwClass,  // "class"
    KwReturn, // "return"
    KwLambda, // "lambda"
    KwIf,     // "if"
    KwElse,   // "else"
    KwAnd,    // "and"
    KwOr,     // "or"
    KwNot,    // "not"
    KwIn,     // "in"
    KwIs,     // "is"
    KwTrue,   // "True"
    KwFalse,  // "False"
    KwNone,   // "None"
    KwImport, // "import"
    KwFrom,   // "from"
    KwTry,    // "try"
    KwExcept, // "except"
    KwPass,   // "pass"

    // Identifier
    Ident(String),

    // Literals
    Number(String),
    Text(String),

    // Special
    Comment(String), // Comment
    Error(String),   // Error
}

static KEYWORDS: Lazy<BiMap<&'static str, TokenKind>> = Lazy::new(|| {
    BiMap::from_iter([
        ("def", TokenKind::KwDef),
        ("class", TokenKind::KwClass),
        ("return", TokenKind::KwReturn),
        ("lambda", TokenKind::KwLambda),
        ("if", TokenKind::KwIf),
        ("else", TokenKind::KwElse),
        ("and", TokenKind::KwAnd),
        ("or", TokenKind::KwOr),
        ("not", TokenKind::KwNot),
        ("in", TokenKind::KwIn),
        ("is", TokenKind::KwIs),
        ("True", TokenKind::KwTrue),
        ("False", TokenKind::KwFalse),
        ("None", TokenKind::KwNone),
        ("import", TokenKind::KwImport),
        ("from", TokenKind::KwFrom),
        ("try", TokenKind::KwTry),
        ("except", TokenKind::KwExcept),
        ("pass", TokenKind::KwPass),
    ])
});

pub fn keyword(s: &str) -> Option<TokenKind> {
    KEYWORDS.get_by_left(s).cloned()
}

pub fn double_char_token(ch0: char, ch1: char) -> Option<TokenKind> {
    match (ch0, ch1) {
        ('=', '=') => Some(TokenKind::EqualEqual),
        ('!', '=') => Some(TokenKind::ExclEqual),
        ('>', '=') => Some(TokenKind::RAngleEqual),
        ('<', '=') => Some(TokenKind::LAngleEqual),
        ('<', '<') => Some(TokenKind::LAngleLAngle),
        ('>', '>') => Some(TokenKind::RAngleRAngle),
        ('*', '*') => Some(TokenKind::StarStar),
        ('/', '/') => Some(TokenKind::SlashSlash),
        ('+', '=') => Some(TokenKind::PlusEqual),
        ('-', '=') => Some(TokenKind::MinusEqual),
        _ => None,
    }
}

pub fn single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '=' => Some(TokenKind::Equal),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '%' => Some(TokenKind::Percent),
        '&' => Some(TokenKind::Ampasand),
        '|' => Some(TokenKind::Pipe),
        '^' => Some(TokenKind::Caret),
        '~' => Some(TokenKind::Tilde),
        ':' => Some(TokenKind::Colon),
        ';' => Some(TokenKind::Semicolon),
        ',' => Some(TokenKind::Comma),
        '.' => Some(TokenKind::Period),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        '{' => Some(TokenKind::LCurly),
        '}' => Some(TokenKind::RCurly),
        '<' => Some(TokenKind::LAngle),
        '>' => Some(TokenKind::RAngle),
        _ => None,
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(word) = KEYWORDS.get_by_right(self) {
            return write!(f, "{word}");
        }
        let symbol = match self {
            TokenKind::EqualEqual => "==",
            TokenKind::ExclEqual => "!=",
            TokenKind::RAngleEqual => ">=",
            TokenKind::LAngleEqual => "<=",
            TokenKind::LAngleLAngle => "<<",
            TokenKind::RAngleRAngle => ">>",
            TokenKind::StarStar => "**",
            TokenKind::SlashSlash => "//",
            TokenKind::PlusEqual => "+=",
            TokenKind::MinusEqual => "-=",
            TokenKind::Equal => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Ampasand => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Period => ".",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LCurly => "{",
            TokenKind::RCurly => "}",
            TokenKind::LAngle => "<",
            TokenKind::RAngle => ">",
            TokenKind::Ident(name) => name.as_str(),
            TokenKind::Number(num) => num.as_str(),
            TokenKind::Text(text) => return write!(f, "{text:?}"),
            TokenKind::Comment(text) => return write!(f, "#{text}"),
            TokenKind::Error(text) => text.as_str(),
            _ => "?",
        };
        write!(f, "{symbol}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}
