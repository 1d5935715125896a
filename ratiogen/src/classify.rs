use crate::config::Config;
use crate::grammer::lexer::LineLexer;
use crate::grammer::token::TokenKind;
use crate::source::RawLine;

/// Dispatch decision for one top-level line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Blank, comment or import
    Skip,
    /// Runtime-provided helper: skip the header and this many body lines
    Builtin(usize),
    Func,
    Class(String),
    /// End of the metric definitions
    Sentinel,
    /// Global constant candidate
    Expr,
}

/// Look at the first tokens of a line and decide who handles it.
pub fn classify(line: &RawLine, config: &Config) -> LineKind {
    let tokens: Vec<TokenKind> = LineLexer::new(line.code(), line.idx)
        .parse()
        .into_iter()
        .map(|token| token.kind)
        .filter(|kind| !matches!(kind, TokenKind::Comment(_)))
        .take(2)
        .collect();

    match tokens.as_slice() {
        [] => LineKind::Skip,
        [TokenKind::KwImport | TokenKind::KwFrom, ..] => LineKind::Skip,
        [TokenKind::KwDef, TokenKind::Ident(name)] => match config.skip_functions.get(name) {
            Some(lines) => LineKind::Builtin(*lines),
            None => LineKind::Func,
        },
        [TokenKind::KwDef, ..] => LineKind::Func,
        [TokenKind::KwClass, TokenKind::Ident(name)] if *name == config.sentinel => {
            LineKind::Sentinel
        }
        [TokenKind::KwClass, TokenKind::Ident(name)] => LineKind::Class(name.clone()),
        _ => LineKind::Expr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(text: &str) -> LineKind {
        let line = RawLine {
            idx: 0,
            text: text.to_string(),
        };
        classify(&line, &Config::default())
    }

    #[test]
    fn rules() {
        assert_eq!(kind(""), LineKind::Skip);
        assert_eq!(kind("   # comment"), LineKind::Skip);
        assert_eq!(kind("import sys"), LineKind::Skip);
        assert_eq!(kind("from __future__ import print_function"), LineKind::Skip);
        assert_eq!(kind("def handle_error(obj, msg):"), LineKind::Builtin(4));
        assert_eq!(kind("def handle_error_metric(obj, msg):"), LineKind::Builtin(3));
        assert_eq!(kind("def CLKS(self, EV, level):"), LineKind::Func);
        assert_eq!(kind("class Setup:"), LineKind::Sentinel);
        assert_eq!(kind("class Setup_Time:"), LineKind::Class("Setup_Time".to_string()));
        assert_eq!(kind("class Frontend_Bound:"), LineKind::Class("Frontend_Bound".to_string()));
        assert_eq!(kind("Pipeline_Width = 4"), LineKind::Expr);
        assert_eq!(kind("smt_enabled = False # set later"), LineKind::Expr);
    }
}
