use crate::grammer::ast::{Expr, EVENT_ACCESSOR};

/// Name of the closure built for `EV(lambda ..., level)` returns
pub const CLOSURE: &str = "func";

/// Statement of the generated C++ body, before rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum CStmt {
    Declare(String, Option<Expr>),       // float name [= expr];
    Assign(String, Expr),                // name = expr;
    Return(Expr),                        // return expr;
    If(Expr, Vec<CStmt>, Vec<CStmt>),    // if (cond) { ... } else { ... }
    Closure(String, Expr),               // auto name = [&]() -> float { return expr; };
    Process(String, Expr),               // return g_ev_process(name, level);
    Expr(Expr),                          // expr;
}

/// Where the value of a leaf ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink<'a> {
    Return,
    Assign(&'a str),
}

impl Sink<'_> {
    fn wrap(&self, value: &Expr) -> Vec<CStmt> {
        match self {
            Sink::Return => lower_return_leaf(value),
            Sink::Assign(target) => vec![CStmt::Assign(target.to_string(), value.clone())],
        }
    }
}

/// Turn `A if c1 else B if c2 else C` into nested branches.
///
/// The `then` side goes to the sink. Everything under an `else` is lowered
/// again, and its innermost leaf is returned directly.
pub fn lower(value: &Expr, sink: Sink) -> Vec<CStmt> {
    lower_branch(value.strip_group(), sink, false)
}

fn lower_branch(value: &Expr, sink: Sink, in_else: bool) -> Vec<CStmt> {
    match value {
        Expr::Conditional {
            condition,
            then,
            otherwise,
        } => vec![CStmt::If(
            (**condition).clone(),
            sink.wrap(then),
            lower_branch(otherwise.strip_group(), sink, true),
        )],
        leaf if in_else => lower_return_leaf(leaf),
        leaf => sink.wrap(leaf),
    }
}

/// `return <value>`
pub fn lower_return(value: &Expr) -> Vec<CStmt> {
    lower(value, Sink::Return)
}

fn lower_return_leaf(value: &Expr) -> Vec<CStmt> {
    match delegated(value) {
        Some((body, level)) => vec![
            CStmt::Closure(CLOSURE.to_string(), body.clone()),
            CStmt::Process(CLOSURE.to_string(), level.clone()),
        ],
        None => vec![CStmt::Return(value.clone())],
    }
}

/// `<target> = <value>`, declaring the target first when `declare` is set.
pub fn lower_assign(target: &str, value: &Expr, declare: bool) -> Vec<CStmt> {
    if !value.is_conditional() {
        return if declare {
            vec![CStmt::Declare(target.to_string(), Some(value.clone()))]
        } else {
            vec![CStmt::Assign(target.to_string(), value.clone())]
        };
    }
    let mut stmts = Vec::new();
    if declare {
        stmts.push(CStmt::Declare(target.to_string(), None));
    }
    stmts.extend(lower(value, Sink::Assign(target)));
    stmts
}

/// `EV(lambda EV, level: body, level)` -> `(body, level)`
fn delegated(value: &Expr) -> Option<(&Expr, &Expr)> {
    let Expr::Call { callee, args } = value else {
        return None;
    };
    if !matches!(&**callee, Expr::Identifier(name) if name == EVENT_ACCESSOR) {
        return None;
    }
    match args.as_slice() {
        [Expr::Lambda { body, .. }, level] => Some((&**body, level)),
        _ => None,
    }
}

impl CStmt {
    /// Number of nested `if` levels
    pub fn depth(&self) -> usize {
        match self {
            CStmt::If(_, then, otherwise) => {
                1 + then
                    .iter()
                    .chain(otherwise)
                    .map(CStmt::depth)
                    .max()
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Every expression this statement renders
    pub fn exprs(&self) -> Vec<&Expr> {
        match self {
            CStmt::Declare(_, value) => value.iter().collect(),
            CStmt::Assign(_, expr)
            | CStmt::Return(expr)
            | CStmt::Closure(_, expr)
            | CStmt::Process(_, expr)
            | CStmt::Expr(expr) => vec![expr],
            CStmt::If(condition, then, otherwise) => {
                let mut exprs = vec![condition];
                exprs.extend(then.iter().chain(otherwise).flat_map(CStmt::exprs));
                exprs
            }
        }
    }
}
