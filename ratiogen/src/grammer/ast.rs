/// Name of the implicit receiver of methods and metric classes
pub const RECEIVER: &str = "self";

/// Name of the event accessor passed to every metric function
pub const EVENT_ACCESSOR: &str = "EV";

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Def(String, Vec<String>),        // "def" ident "(" [ ident { "," ident } ] ")" ":"
    Class(String, Vec<Expr>),        // "class" ident [ "(" [ expr { "," expr } ] ")" ] ":"
    Return(Option<Expr>),            // "return" [ expr ]
    Assign(Expr, Expr),              // expr "=" expr
    AugAssign(BinaryOp, Expr, Expr), // expr ( "+=" | "-=" ) expr
    Import,                          // ( "import" | "from" ) ...
    Try,                             // "try" ":"
    Except,                          // "except" ... ":"
    Pass,                            // "pass"
    Expr(Expr),                      // expr
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(String), // num-lit, as written
    Text(String),   // text-lit
    Bool(bool),     // "True" | "False"
    None,           // "None"
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Identifier(String),               // ident
    Attribute(Box<Expr>, String),     // expr "." ident
    Subscript(Box<Expr>, Box<Expr>),  // expr "[" expr "]"
    Unary(UnaryOp, Box<Expr>),        // ( "+" | "-" | "~" | "not" ) expr
    BinaryOp(BinaryOp, Box<Expr>, Box<Expr>), // expr (binop) expr
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    }, // expr "if" expr "else" expr
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    }, // expr "(" [ expr { "," expr } ] ")"
    Lambda {
        params: Vec<String>,
        body: Box<Expr>,
    }, // "lambda" [ ident { "," ident } ] ":" expr
    EventRef {
        key: String,
        level: Box<Expr>,
    }, // "EV" "(" text-lit "," expr ")"
    Group(Box<Expr>), // "(" expr ")"
    List(Vec<Expr>),  // "[" ... "]" | "(" expr "," ... ")"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Pos,    // "+"
    Neg,    // "-"
    Invert, // "~"
    Not,    // "not"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,      // "+"
    Sub,      // "-"
    Mul,      // "*"
    Div,      // "/"
    FloorDiv, // "//"
    Mod,      // "%"
    Pow,      // "**"
    BitAnd,   // "&"
    BitOr,    // "|"
    BitXor,   // "^"
    Shl,      // "<<"
    Shr,      // ">>"
    Eq,       // "==" | "is"
    Ne,       // "!=" | "is not"
    Lt,       // "<"
    Le,       // "<="
    Gt,       // ">"
    Ge,       // ">="
    And,      // "and"
    Or,       // "or"
}

impl Expr {
    pub fn ident(name: &str) -> Self {
        Expr::Identifier(name.to_string())
    }

    pub fn is_receiver(&self) -> bool {
        matches!(self, Expr::Identifier(name) if name == RECEIVER)
    }

    /// `self.<field>` -> `<field>`
    pub fn receiver_field(&self) -> Option<&str> {
        match self {
            Expr::Attribute(obj, field) if obj.is_receiver() => Some(field.as_str()),
            _ => None,
        }
    }

    /// Look through redundant parentheses
    pub fn strip_group(&self) -> &Expr {
        match self {
            Expr::Group(inner) => inner.strip_group(),
            expr => expr,
        }
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self.strip_group(), Expr::Conditional { .. })
    }

    /// Pre-order traversal over this expression and all its children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        match self {
            Expr::Literal(_) | Expr::Identifier(_) => {}
            Expr::Attribute(obj, _) => obj.walk(visit),
            Expr::Subscript(obj, idx) => {
                obj.walk(visit);
                idx.walk(visit);
            }
            Expr::Unary(_, expr) | Expr::Group(expr) => expr.walk(visit),
            Expr::BinaryOp(_, lhs, rhs) => {
                lhs.walk(visit);
                rhs.walk(visit);
            }
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                then.walk(visit);
                condition.walk(visit);
                otherwise.walk(visit);
            }
            Expr::Call { callee, args } => {
                callee.walk(visit);
                args.iter().for_each(|arg| arg.walk(visit));
            }
            Expr::Lambda { body, .. } => body.walk(visit),
            Expr::EventRef { level, .. } => level.walk(visit),
            Expr::List(items) => items.iter().for_each(|item| item.walk(visit)),
        }
    }

    pub fn mentions_receiver_field(&self, field: &str) -> bool {
        let mut found = false;
        self.walk(&mut |expr| found |= expr.receiver_field() == Some(field));
        found
    }

    /// Keys of every `EV("KEY", level)` in this expression
    pub fn event_keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        self.walk(&mut |expr| {
            if let Expr::EventRef { key, .. } = expr {
                keys.push(key.as_str());
            }
        });
        keys
    }
}
