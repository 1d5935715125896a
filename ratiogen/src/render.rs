use crate::grammer::ast::{BinaryOp, Expr, Literal, UnaryOp, EVENT_ACCESSOR, RECEIVER};
use crate::lower::CStmt;
use arch::EventTable;
use indexmap::IndexMap;
use once_cell::sync::Lazy;

pub const INDENT: &str = "    ";

/// Runtime helper rendered for events missing from the map
pub const EVENT_ERROR: &str = "g_ev_error";

/// Runtime helper evaluating a closure at a level
pub const EVENT_PROCESS: &str = "g_ev_process";

/// Threshold output parameter appended to `f(EV, level)` calls
pub const THRESH: &str = "thresh";

/// Rendering of `self.parent.thresh` for a class without a parent link
pub const NULL_PARENT_THRESH: &str = "(parent != nullptr && parent->thresh)";

static BUILTINS: Lazy<IndexMap<&'static str, &'static str>> = Lazy::new(|| {
    IndexMap::from([
        ("min", "std::min<float>"),
        ("max", "std::max<float>"),
        ("abs", "std::fabs"),
    ])
});

/// Which kind of body an expression lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Free function body
    Function,
    /// `X::compute` value statements
    Compute,
    /// `thresh = ...`, where `or` is bitwise
    Threshold,
}

/// Everything rendering needs besides the expression itself.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub events: &'a EventTable,
    pub parent: Option<&'a str>,
    pub dialect: Dialect,
}

// Binding strength of the rendered C++ operators, smaller binds tighter.
const PREC_ATOM: u8 = 0;
const PREC_UNARY: u8 = 3;
const PREC_CONDITIONAL: u8 = 16;

impl<'a> Scope<'a> {
    pub fn new(events: &'a EventTable, dialect: Dialect) -> Self {
        Self {
            events,
            parent: None,
            dialect,
        }
    }

    pub fn with_parent(self, parent: Option<&'a str>) -> Self {
        Self { parent, ..self }
    }

    pub fn with_dialect(self, dialect: Dialect) -> Self {
        Self { dialect, ..self }
    }
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

impl Scope<'_> {
    pub fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(lit) => literal(lit),
            Expr::Identifier(name) if name == RECEIVER => "this".to_string(),
            Expr::Identifier(name) => name.clone(),
            Expr::Attribute(obj, field) => self.attribute(obj, field),
            Expr::Subscript(obj, index) => {
                format!("{}[{}]", self.operand(obj, PREC_ATOM), self.expr(index))
            }
            Expr::Unary(op, inner) => self.unary(*op, inner),
            Expr::BinaryOp(op, lhs, rhs) => self.binary(*op, lhs, rhs),
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => format!(
                "({} ? {} : {})",
                self.expr(condition),
                self.expr(then),
                self.expr(otherwise)
            ),
            Expr::Call { callee, args } => self.call(callee, args),
            Expr::Lambda { body, .. } => self.closure(body),
            Expr::EventRef { key, level } => self.event(key, level),
            Expr::Group(inner) => format!("({})", self.expr(inner)),
            Expr::List(items) => format!("{{{}}}", self.list(items)),
        }
    }

    /// Condition of an `if`, without redundant outer parentheses
    pub fn condition(&self, expr: &Expr) -> String {
        self.expr(expr.strip_group())
    }

    fn list(&self, items: &[Expr]) -> String {
        items
            .iter()
            .map(|item| self.expr(item))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn attribute(&self, obj: &Expr, field: &str) -> String {
        // self.x -> x
        if obj.is_receiver() {
            return field.to_string();
        }
        // self.parent.x
        if obj.receiver_field() == Some("parent") {
            return match (self.parent, field) {
                (Some(parent), _) => format!("{parent}::{field}"),
                (None, THRESH) => NULL_PARENT_THRESH.to_string(),
                (None, _) => format!("parent->{field}"),
            };
        }
        let obj = self.operand(obj, PREC_ATOM);
        match field {
            "compute" | "thresh" | "val" => format!("{obj}::{field}"),
            _ => format!("{obj}.{field}"),
        }
    }

    fn unary(&self, op: UnaryOp, inner: &Expr) -> String {
        let op = match op {
            UnaryOp::Pos => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Invert => "~",
            UnaryOp::Not => "!",
        };
        format!("{op}{}", self.operand(inner, PREC_UNARY))
    }

    fn binary(&self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> String {
        match op {
            BinaryOp::Pow => {
                return format!("std::pow({}, {})", self.expr(lhs), self.expr(rhs));
            }
            BinaryOp::FloorDiv => {
                return format!("std::floor({} / {})", self.expr(lhs), self.expr(rhs));
            }
            _ => {}
        }
        let (symbol, prec) = self.operator(op);
        format!(
            "{} {symbol} {}",
            self.operand(lhs, prec),
            self.operand(rhs, prec)
        )
    }

    /// C++ spelling and binding strength of a binary operator
    fn operator(&self, op: BinaryOp) -> (&'static str, u8) {
        match op {
            BinaryOp::Mul => ("*", 5),
            BinaryOp::Div => ("/", 5),
            BinaryOp::Mod => ("%", 5),
            BinaryOp::Add => ("+", 6),
            BinaryOp::Sub => ("-", 6),
            BinaryOp::Shl => ("<<", 7),
            BinaryOp::Shr => (">>", 7),
            BinaryOp::Lt => ("<", 9),
            BinaryOp::Le => ("<=", 9),
            BinaryOp::Gt => (">", 9),
            BinaryOp::Ge => (">=", 9),
            BinaryOp::Eq => ("==", 10),
            BinaryOp::Ne => ("!=", 10),
            BinaryOp::BitAnd => ("&", 11),
            BinaryOp::BitXor => ("^", 12),
            BinaryOp::BitOr => ("|", 13),
            BinaryOp::And => ("&&", 14),
            BinaryOp::Or if self.dialect == Dialect::Threshold => ("|", 13),
            BinaryOp::Or => ("||", 15),
            BinaryOp::Pow | BinaryOp::FloorDiv => ("", PREC_ATOM),
        }
    }

    fn precedence(&self, expr: &Expr) -> u8 {
        match expr {
            Expr::BinaryOp(op, ..) => self.operator(*op).1,
            Expr::Unary(..) => PREC_UNARY,
            Expr::Conditional { .. } | Expr::Lambda { .. } => PREC_CONDITIONAL,
            _ => PREC_ATOM,
        }
    }

    /// Operand of an operator binding at `prec`, parenthesised if looser
    fn operand(&self, expr: &Expr, prec: u8) -> String {
        let text = self.expr(expr);
        if self.precedence(expr) > prec && !matches!(expr, Expr::Conditional { .. }) {
            format!("({text})")
        } else {
            text
        }
    }

    fn call(&self, callee: &Expr, args: &[Expr]) -> String {
        // The receiver is never passed on
        let args = match args.split_first() {
            Some((first, rest)) if first.is_receiver() => rest,
            _ => args,
        };

        if let (Expr::Identifier(name), [Expr::Lambda { body, .. }, level]) = (callee, args) {
            if name == EVENT_ACCESSOR {
                return format!(
                    "{EVENT_PROCESS}({}, {})",
                    self.closure(body),
                    self.expr(level)
                );
            }
        }

        let name = match callee {
            Expr::Identifier(name) => BUILTINS
                .get(name.as_str())
                .map_or_else(|| name.clone(), |builtin| builtin.to_string()),
            callee => self.operand(callee, PREC_ATOM),
        };
        let mut rendered: Vec<String> = args.iter().map(|arg| self.expr(arg)).collect();
        if takes_thresh(args) {
            rendered.push(THRESH.to_string());
        }
        format!("{name}({})", rendered.join(", "))
    }

    fn closure(&self, body: &Expr) -> String {
        format!("[&]() -> float {{ return {}; }}", self.expr(body))
    }

    fn event(&self, key: &str, level: &Expr) -> String {
        match self.events.get(key) {
            Some(attr) => format!("{EVENT_ACCESSOR}({attr}, {})", self.expr(level)),
            None => format!("{EVENT_ERROR}({}, {})", quote(key), self.expr(level)),
        }
    }
}

/// `f(EV, level)` and `f(EV, 3)` propagate the threshold
fn takes_thresh(args: &[Expr]) -> bool {
    let [Expr::Identifier(accessor), level] = args else {
        return false;
    };
    if accessor != EVENT_ACCESSOR {
        return false;
    }
    match level {
        Expr::Identifier(name) => name == "level",
        Expr::Literal(Literal::Number(num)) => {
            num.len() == 1 && num.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

fn literal(lit: &Literal) -> String {
    match lit {
        Literal::Number(num) => number(num),
        Literal::Text(text) => quote(text),
        Literal::Bool(true) => "true".to_string(),
        Literal::Bool(false) => "false".to_string(),
        Literal::None => "nullptr".to_string(),
    }
}

fn number(num: &str) -> String {
    let num = num.replace('_', "");
    match num.strip_prefix("0o").or_else(|| num.strip_prefix("0O")) {
        Some(oct) => format!("0{oct}"),
        None => num,
    }
}

/// Double-quoted C++ string literal
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            ch => out.push(ch),
        }
    }
    out.push('"');
    out
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

impl Scope<'_> {
    /// Render a lowered body, one statement per line
    pub fn stmts(&self, stmts: &[CStmt], depth: usize) -> String {
        let mut out = String::new();
        for stmt in stmts {
            self.stmt(stmt, depth, &mut out);
        }
        out
    }

    fn stmt(&self, stmt: &CStmt, depth: usize, out: &mut String) {
        let pad = INDENT.repeat(depth);
        match stmt {
            CStmt::Declare(name, Some(value)) => {
                out.push_str(&format!("{pad}float {name} = {};\n", self.expr(value)));
            }
            CStmt::Declare(name, None) => {
                out.push_str(&format!("{pad}float {name};\n"));
            }
            CStmt::Assign(name, value) => {
                out.push_str(&format!("{pad}{name} = {};\n", self.expr(value)));
            }
            CStmt::Return(value) => {
                out.push_str(&format!("{pad}return {};\n", self.expr(value)));
            }
            CStmt::If(condition, then, otherwise) => {
                out.push_str(&format!("{pad}if ({}) {{\n", self.condition(condition)));
                out.push_str(&self.stmts(then, depth + 1));
                out.push_str(&format!("{pad}}} else {{\n"));
                out.push_str(&self.stmts(otherwise, depth + 1));
                out.push_str(&format!("{pad}}}\n"));
            }
            CStmt::Closure(name, body) => {
                out.push_str(&format!("{pad}auto {name} = [&]() -> float {{\n"));
                out.push_str(&format!("{pad}{INDENT}return {};\n", self.expr(body)));
                out.push_str(&format!("{pad}}};\n"));
            }
            CStmt::Process(name, level) => {
                out.push_str(&format!(
                    "{pad}return {EVENT_PROCESS}({name}, {});\n",
                    self.expr(level)
                ));
            }
            CStmt::Expr(expr) => {
                out.push_str(&format!("{pad}{};\n", self.expr(expr)));
            }
        }
    }
}
