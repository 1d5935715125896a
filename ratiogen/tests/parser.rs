use ratiogen::error::ParseError;
use ratiogen::grammer::ast::{BinaryOp, Expr, Literal, Stmt, UnaryOp};
use ratiogen::grammer::parser::{parse_expr, parse_line};

fn assert(code: &str) {
    println!("{}", code);
    let stmts = parse_line(code);
    println!("{:#?}", stmts);
    assert!(stmts.is_ok(), "Error found: {:?}", stmts);
}

fn assert_err(code: &str) {
    let stmts = parse_line(code);
    println!("{:#?}", stmts);
    assert!(stmts.is_err(), "Expected an error: {:?}", stmts);
}

macro_rules! case {
    ($name:ident, $code:expr) => {
        #[test]
        fn $name() {
            assert($code);
        }
    };
    ($name:ident, $code:expr, err) => {
        #[test]
        fn $name() {
            assert_err($code);
        }
    };
}

fn ident(name: &str) -> Expr {
    Expr::Identifier(name.to_string())
}

fn number(num: &str) -> Expr {
    Expr::Literal(Literal::Number(num.to_string()))
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::BinaryOp(op, Box::new(lhs), Box::new(rhs))
}

// Headers
case!(def_0, "def Retiring(self, EV, level):");
case!(def_no_params, "def Setup():");
case!(def_inline_body, "def f(x): return x");
case!(class_0, "class Frontend_Bound:");
case!(class_bases, "class Frontend_Bound(Metric, object):");
case!(class_empty_bases, "class Frontend_Bound():");
case!(try_0, "try:");
case!(except_0, "except ZeroDivisionError as e:");
case!(except_inline, "except: pass");

// Statements
case!(import_0, "import slots");
case!(from_import, "from __future__ import print_function");
case!(return_none, "return");
case!(return_expr, "return EV(\"INST_RETIRED.ANY\", level) / CLKS(self, EV, level)");
case!(assign_constant, "Pipeline_Width = 4");
case!(assign_attr, "self.val = A if B else C");
case!(aug_assign, "self.val += 1");
case!(aug_sub, "self.val -= 1");
case!(pass_0, "pass");
case!(multi_stmt, "n = A() ; r.run(n) ; o[\"A\"] = n");
case!(trailing_semicolon, "x = 1;");
case!(parent_link, "o[\"Fetch_Latency\"].parent = o[\"Frontend_Bound\"]");

// Expressions
case!(cond_chain, "r = A if a else B if b else C");
case!(lambda_0, "DS = lambda EV, level: 1");
case!(lambda_event, "x = EV(lambda EV, level: EV(\"A\", level) / 2, level)");
case!(not_0, "x = not a > b");
case!(is_none, "x = a is None");
case!(is_not_none, "x = a is not None");
case!(tuple_0, "x = (1, 2,)");
case!(list_0, "x = [1, 2, 3]");
case!(empty_list, "x = []");
case!(unary_chain, "x = - - ~a");
case!(power, "x = a ** -2");
case!(string_concat, "desc = \"\"\"a\"\"\" 'b'");
case!(keyword_call, "x = min(1, max(2, 3))");

// Errors
case!(err_unbalanced, "x = (1 + 2", err);
case!(err_missing_else, "x = a if b", err);
case!(err_def_no_colon, "def f(x)", err);
case!(err_trailing, "x = 1 2", err);
case!(err_dangling_op, "x = 1 +", err);
case!(err_bad_char, "x = $", err);

#[test]
fn precedence_mul_over_add() {
    let expr = parse_expr("a + b * c").unwrap();
    assert_eq!(
        expr,
        binary(
            BinaryOp::Add,
            ident("a"),
            binary(BinaryOp::Mul, ident("b"), ident("c"))
        )
    );
}

#[test]
fn left_associative_sub() {
    let expr = parse_expr("a - b - c").unwrap();
    assert_eq!(
        expr,
        binary(
            BinaryOp::Sub,
            binary(BinaryOp::Sub, ident("a"), ident("b")),
            ident("c")
        )
    );
}

#[test]
fn power_binds_tighter_than_unary() {
    let expr = parse_expr("-a ** 2").unwrap();
    assert_eq!(
        expr,
        Expr::Unary(
            UnaryOp::Neg,
            Box::new(binary(BinaryOp::Pow, ident("a"), number("2")))
        )
    );
}

#[test]
fn conditional_nests_right() {
    let expr = parse_expr("A if a else B if b else C").unwrap();
    let Expr::Conditional { otherwise, .. } = expr else {
        panic!("not a conditional");
    };
    assert!(otherwise.is_conditional());
}

#[test]
fn or_below_and() {
    let expr = parse_expr("a or b and c").unwrap();
    assert_eq!(
        expr,
        binary(
            BinaryOp::Or,
            ident("a"),
            binary(BinaryOp::And, ident("b"), ident("c"))
        )
    );
}

#[test]
fn event_reference() {
    let expr = parse_expr("EV(\"CPU_CLK_UNHALTED.THREAD\", level)").unwrap();
    assert_eq!(
        expr,
        Expr::EventRef {
            key: "CPU_CLK_UNHALTED.THREAD".to_string(),
            level: Box::new(ident("level")),
        }
    );
    assert_eq!(expr.event_keys(), vec!["CPU_CLK_UNHALTED.THREAD"]);
}

#[test]
fn event_keys_in_order() {
    let expr = parse_expr("EV(\"A\", 1) / (EV(\"B\", 2) + f(EV(\"C\", level)))").unwrap();
    assert_eq!(expr.event_keys(), vec!["A", "B", "C"]);
}

#[test]
fn receiver_fields() {
    let expr = parse_expr("self.parent.thresh and self.val > 0.2").unwrap();
    assert!(expr.mentions_receiver_field("parent"));
    assert!(expr.mentions_receiver_field("val"));
    assert!(!expr.mentions_receiver_field("thresh"));
}

#[test]
fn group_is_kept() {
    let expr = parse_expr("(a + b) * c").unwrap();
    let Expr::BinaryOp(BinaryOp::Mul, lhs, _) = expr else {
        panic!("not a product");
    };
    assert!(matches!(*lhs, Expr::Group(_)));
    assert_eq!(
        lhs.strip_group(),
        &binary(BinaryOp::Add, ident("a"), ident("b"))
    );
}

#[test]
fn inline_def_body() {
    let stmts = parse_line("def f(x): return x").unwrap();
    assert_eq!(
        stmts,
        vec![
            Stmt::Def("f".to_string(), vec!["x".to_string()]),
            Stmt::Return(Some(ident("x"))),
        ]
    );
}

#[test]
fn semicolon_statements() {
    let stmts = parse_line("a = 1; b = 2").unwrap();
    assert_eq!(
        stmts,
        vec![
            Stmt::Assign(ident("a"), number("1")),
            Stmt::Assign(ident("b"), number("2")),
        ]
    );
}

#[test]
fn comment_only_line() {
    assert_eq!(parse_line("# nothing here").unwrap(), Vec::<Stmt>::new());
}

#[test]
fn unexpected_eol() {
    assert_eq!(parse_expr("a +"), Err(ParseError::UnexpectedEOL));
}
