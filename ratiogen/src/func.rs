use crate::grammer::ast::{Expr, Stmt, EVENT_ACCESSOR, RECEIVER};
use crate::grammer::parser::parse_line;
use crate::lower::{lower_assign, lower_return, CStmt};
use crate::msg::Msg;
use crate::render::{Scope, THRESH};
use crate::source::Source;
use std::collections::HashSet;

/// A top-level metric helper function.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    pub name: String,
    /// Parameters as written, without the receiver
    pub params: Vec<String>,
    pub body: Vec<CStmt>,
    /// Index of the `def` line
    pub line: usize,
}

impl FuncDef {
    /// `float NAME(FEV EV, int level, bool& thresh)`
    pub fn signature(&self) -> String {
        let mut params: Vec<String> = self.params.iter().map(|param| param_decl(param)).collect();
        if self.takes_events() {
            params.push(format!("bool& {THRESH}"));
        }
        format!("float {}({})", self.name, params.join(", "))
    }

    pub fn declaration(&self) -> String {
        format!("{};", self.signature())
    }

    pub fn definition(&self, scope: &Scope) -> String {
        format!("{} {{\n{}}}\n", self.signature(), scope.stmts(&self.body, 1))
    }

    pub fn takes_events(&self) -> bool {
        self.params.iter().any(|param| param == EVENT_ACCESSOR)
    }

    /// Every expression in the body
    pub fn exprs(&self) -> impl Iterator<Item = &Expr> {
        self.body.iter().flat_map(CStmt::exprs)
    }
}

fn param_decl(param: &str) -> String {
    match param {
        EVENT_ACCESSOR => format!("FEV {param}"),
        "level" => format!("int {param}"),
        _ => format!("float {param}"),
    }
}

/// Lowered statements of one function body, with its locals
#[derive(Debug, Default)]
struct Body {
    stmts: Vec<CStmt>,
    locals: HashSet<String>,
}

impl Body {
    /// Append one statement. Returns true once the body has returned.
    fn push(&mut self, stmt: &Stmt) -> Result<bool, String> {
        match stmt {
            Stmt::Return(Some(value)) => {
                self.stmts.extend(lower_return(value));
                Ok(true)
            }
            Stmt::Return(None) => Err("`return` without a value".to_string()),
            Stmt::Assign(Expr::Identifier(name), value) => {
                let fresh = self.locals.insert(name.clone());
                self.stmts.extend(lower_assign(name, value, fresh));
                Ok(false)
            }
            Stmt::Assign(target, value) => match target.receiver_field() {
                Some(field) => {
                    self.stmts.extend(lower_assign(field, value, false));
                    Ok(false)
                }
                None => {
                    Err("assignment target is neither a local nor a field of `self`".to_string())
                }
            },
            Stmt::AugAssign(op, target, value) => {
                let name = match target {
                    Expr::Identifier(name) => name.as_str(),
                    target => target
                        .receiver_field()
                        .ok_or("augmented assignment to an unsupported target")?,
                };
                let sum = Expr::BinaryOp(*op, Box::new(target.clone()), Box::new(value.clone()));
                self.stmts.push(CStmt::Assign(name.to_string(), sum));
                Ok(false)
            }
            Stmt::Expr(expr) => {
                self.stmts.push(CStmt::Expr(expr.clone()));
                Ok(false)
            }
            Stmt::Try | Stmt::Except | Stmt::Pass | Stmt::Import => Ok(false),
            Stmt::Def(..) | Stmt::Class(..) => {
                Err("nested definitions are not translated".to_string())
            }
        }
    }
}

/// Read the function starting at `start` and return the cursor after it.
///
/// The body ends at the first `return`. A following non-indented line also
/// ends it and is left for the caller.
pub fn extract(source: &Source, start: usize, msgs: &mut Vec<Msg>) -> (Option<FuncDef>, usize) {
    let Some(head) = source.get(start) else {
        return (None, start);
    };
    let (name, params) = match parse_line(head.code()).as_deref() {
        Ok([Stmt::Def(name, params), ..]) => (name.clone(), params.clone()),
        Ok(_) => {
            msgs.push(
                Msg::warn("Unsupported function header, skipped").at_line(&source.file, head),
            );
            return (None, start + 1);
        }
        Err(err) => {
            msgs.push(
                Msg::warn(format!("Cannot parse function header: {err}"))
                    .at_line(&source.file, head),
            );
            return (None, start + 1);
        }
    };
    let params: Vec<String> = params.into_iter().filter(|param| param != RECEIVER).collect();
    log::debug!("function `{name}` ({}) at line {}", params.join(", "), start + 1);

    let mut body = Body::default();
    let mut cursor = start + 1;
    let mut returned = false;
    while let Some(line) = source.get(cursor) {
        if line.is_blank() {
            cursor += 1;
            continue;
        }
        if !line.is_indented() {
            break;
        }
        cursor += 1;

        let stmts = match parse_line(line.code()) {
            Ok(stmts) => stmts,
            Err(err) => {
                msgs.push(
                    Msg::warn(format!("Cannot parse statement in `{name}`: {err}"))
                        .at_line(&source.file, line),
                );
                continue;
            }
        };
        for stmt in &stmts {
            match body.push(stmt) {
                Ok(done) => returned |= done,
                Err(reason) => {
                    msgs.push(
                        Msg::warn(format!("Statement in `{name}` skipped: {reason}"))
                            .at_line(&source.file, line),
                    );
                }
            }
            if returned {
                break;
            }
        }
        if returned {
            break;
        }
    }

    if !returned {
        msgs.push(
            Msg::warn(format!("Function `{name}` has no `return`")).at_line(&source.file, head),
        );
    }

    let func = FuncDef {
        name,
        params,
        body: body.stmts,
        line: start,
    };
    (Some(func), cursor)
}
