use crate::grammer::ast::{BinaryOp, Expr, Literal, Stmt, UnaryOp};
use crate::render::{quote, Dialect, Scope};
use arch::EventTable;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConstKind {
    Bool,
    Number,
    Text,
}

impl ConstKind {
    pub fn cpp_type(self) -> &'static str {
        match self {
            ConstKind::Bool => "bool",
            ConstKind::Number => "float",
            ConstKind::Text => "std::string",
        }
    }
}

/// A top-level `NAME = <literal>`, where a number may be an arithmetic
/// expression over numeric literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: String,
    pub kind: ConstKind,
    /// Rendered C++ literal
    pub value: String,
    pub line: usize,
}

impl Constant {
    /// Interpret the statements of one global line, or say why not.
    pub fn parse(stmts: &[Stmt], line: usize) -> Result<Self, String> {
        let [Stmt::Assign(Expr::Identifier(name), value)] = stmts else {
            return Err("not a single assignment to a name".to_string());
        };
        let (kind, value) = match value.strip_group() {
            Expr::Literal(Literal::Bool(b)) => (ConstKind::Bool, b.to_string()),
            Expr::Literal(Literal::Text(text)) => (ConstKind::Text, quote(text)),
            expr if is_numeric(expr) => {
                let events = EventTable::default();
                let scope = Scope::new(&events, Dialect::Function);
                (ConstKind::Number, scope.expr(expr))
            }
            Expr::Lambda { .. } => {
                return Err(format!("lambda `{name}` is provided by the runtime"));
            }
            Expr::Conditional { .. } => {
                return Err(format!("inline conditional assigned to `{name}` is not supported"));
            }
            _ => return Err(format!("`{name}` is not a literal")),
        };
        Ok(Self {
            name: name.clone(),
            kind,
            value,
            line,
        })
    }

    /// `static float NAME = 4;`
    pub fn declaration(&self) -> String {
        format!("static {} {} = {};", self.kind.cpp_type(), self.name, self.value)
    }
}

/// Numbers combined only by arithmetic, signs and parentheses
fn is_numeric(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(Literal::Number(_)) => true,
        Expr::Unary(UnaryOp::Neg | UnaryOp::Pos, inner) | Expr::Group(inner) => is_numeric(inner),
        Expr::BinaryOp(op, lhs, rhs) => {
            matches!(
                op,
                BinaryOp::Add
                    | BinaryOp::Sub
                    | BinaryOp::Mul
                    | BinaryOp::Div
                    | BinaryOp::FloorDiv
                    | BinaryOp::Mod
                    | BinaryOp::Pow
            ) && is_numeric(lhs)
                && is_numeric(rhs)
        }
        _ => false,
    }
}
