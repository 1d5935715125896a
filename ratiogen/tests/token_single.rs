use ratiogen::grammer::token::{TokenKind, TokenKind::*};

fn assert(code: &str, expect: TokenKind) {
    use ratiogen::grammer::lexer::LineLexer;
    let tokens = LineLexer::new(code, 0).parse();
    assert_eq!(tokens.len(), 1, "{:?}", tokens);
    assert_eq!(tokens[0].kind, expect);
}

macro_rules! case {
    ($name:ident, $code:expr, $expect:expr) => {
        #[test]
        fn $name() {
            assert($code, $expect);
        }
    };
}

// ---- Double-char operators ----
case!(equal_equal, "==", EqualEqual);
case!(excl_equal, "!=", ExclEqual);
case!(langle_equal, "<=", LAngleEqual);
case!(rangle_equal, ">=", RAngleEqual);
case!(langle_langle, "<<", LAngleLAngle);
case!(rangle_rangle, ">>", RAngleRAngle);
case!(star_star, "**", StarStar);
case!(slash_slash, "//", SlashSlash);
case!(plus_equal, "+=", PlusEqual);
case!(minus_equal, "-=", MinusEqual);

// ---- Single-char operators ----
case!(equal, "=", Equal);
case!(plus, "+", Plus);
case!(minus, "-", Minus);
case!(star, "*", Star);
case!(slash, "/", Slash);
case!(percent, "%", Percent);
case!(ampasand, "&", Ampasand);
case!(pipe, "|", Pipe);
case!(caret, "^", Caret);
case!(tilde, "~", Tilde);
case!(colon, ":", Colon);
case!(semicolon, ";", Semicolon);
case!(comma, ",", Comma);
case!(period, ".", Period);
case!(lparen, "(", LParen);
case!(rparen, ")", RParen);
case!(lbracket, "[", LBracket);
case!(rbracket, "]", RBracket);
case!(lcurly, "{", LCurly);
case!(rcurly, "}", RCurly);
case!(langle, "<", LAngle);
case!(rangle, ">", RAngle);

// ---- Keywords ----
case!(kw_def, "def", KwDef);
case!(kw_class, "class", KwClass);
case!(kw_return, "return", KwReturn);
case!(kw_lambda, "lambda", KwLambda);
case!(kw_if, "if", KwIf);
case!(kw_else, "else", KwElse);
case!(kw_and, "and", KwAnd);
case!(kw_or, "or", KwOr);
case!(kw_not, "not", KwNot);
case!(kw_in, "in", KwIn);
case!(kw_is, "is", KwIs);
case!(kw_true, "True", KwTrue);
case!(kw_false, "False", KwFalse);
case!(kw_none, "None", KwNone);
case!(kw_import, "import", KwImport);
case!(kw_from, "from", KwFrom);
case!(kw_try, "try", KwTry);
case!(kw_except, "except", KwExcept);
case!(kw_pass, "pass", KwPass);

// ---- Identifiers ----
case!(ident_lower, "thresh", Ident("thresh".to_string()));
case!(ident_mixed, "Frontend_Bound", Ident("Frontend_Bound".to_string()));
case!(ident_underscore, "_x1", Ident("_x1".to_string()));
case!(ident_lowercase_true, "true", Ident("true".to_string()));

// ---- Numbers ----
case!(num_dec, "42", Number("42".to_string()));
case!(num_hex, "0x3c", Number("0x3c".to_string()));
case!(num_oct, "0o17", Number("0o17".to_string()));
case!(num_bin, "0b101", Number("0b101".to_string()));
case!(num_float, "0.75", Number("0.75".to_string()));
case!(num_leading_dot, ".5", Number(".5".to_string()));
case!(num_exp, "1e-3", Number("1e-3".to_string()));
case!(num_exp_plus, "2.5E+6", Number("2.5E+6".to_string()));
case!(num_underscore, "1_000", Number("1_000".to_string()));

// ---- Strings ----
case!(text_double, "\"INST_RETIRED.ANY\"", Text("INST_RETIRED.ANY".to_string()));
case!(text_single, "'CPU_CLK'", Text("CPU_CLK".to_string()));
case!(text_triple, "\"\"\"Fraction of slots\"\"\"", Text("Fraction of slots".to_string()));
case!(text_escape, r#""a\"b""#, Text("a\"b".to_string()));
case!(text_empty, "''", Text(String::new()));

// ---- Comments ----
case!(comment, "# Frontend", Comment("Frontend".to_string()));

// ---- Errors ----
case!(error_char, "$", Error("$".to_string()));
case!(
    error_unterminated,
    "\"abc",
    Error("unterminated string: abc".to_string())
);
