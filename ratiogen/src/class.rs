use crate::config::Config;
use crate::grammer::ast::{Expr, Literal, Stmt};
use crate::grammer::lexer::LineLexer;
use crate::grammer::parser::parse_line;
use crate::grammer::token::TokenKind;
use crate::msg::Msg;
use crate::render::{quote, Dialect, Scope, INDENT};
use crate::source::Source;
use strum::Display;

const DOC_QUOTE: &str = "\"\"\"";

/// Which registration list a metric ends up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Core,
    Extra,
}

/// One metric class.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDef {
    pub name: String,
    pub domain: Option<Expr>,
    pub area: Option<Expr>,
    pub level: Option<Expr>,
    pub desc: String,
    /// `self.val = ...` statements, in order
    pub compute: Vec<Expr>,
    pub thresh: Option<Expr>,
    /// Resolved after all classes are known
    pub parent: Option<String>,
    pub category: Category,
    /// Index of the `class` line
    pub line: usize,
}

impl MetricDef {
    pub fn new(name: &str, category: Category, line: usize) -> Self {
        Self {
            name: name.to_string(),
            domain: None,
            area: None,
            level: None,
            desc: String::new(),
            compute: Vec::new(),
            thresh: None,
            parent: None,
            category,
            line,
        }
    }

    /// Record one statement of the class body. Unknown ones are ignored.
    fn field(&mut self, stmt: &Stmt) {
        let Stmt::Assign(target, value) = stmt else {
            return;
        };
        if let Expr::Identifier(key) = target {
            match key.as_str() {
                "domain" => self.domain = Some(value.clone()),
                "area" => self.area = Some(value.clone()),
                "level" => self.level = Some(value.clone()),
                _ => {}
            }
            return;
        }
        match target.receiver_field() {
            Some("val") if value.mentions_receiver_field("val") => self.compute.push(value.clone()),
            Some("val") => self.compute = vec![value.clone()],
            Some("thresh") => self.thresh = Some(value.clone()),
            _ => {}
        }
    }

    /// Every expression rendered for this class
    pub fn exprs(&self) -> impl Iterator<Item = &Expr> {
        self.compute.iter().chain(&self.thresh)
    }

    /// Declaration half: constructor and `compute` prototype
    pub fn declaration(&self, scope: &Scope) -> String {
        let name = &self.name;
        let mut fields = vec![format!("name = {};", quote(name))];
        if let Some(domain) = &self.domain {
            fields.push(format!("domain = {};", scope.expr(domain)));
        }
        if let Some(area) = &self.area {
            fields.push(format!("area = {};", scope.expr(area)));
        }
        if let Some(level) = &self.level {
            fields.push(format!("level = {};", scope.expr(level)));
        }
        fields.push(format!("desc = {};", quote(&self.desc)));
        fields.push("parent = nullptr;".to_string());
        fields.push("func_compute = (void*)&compute;".to_string());

        let mut out = format!("class {name} : public MetricBase {{\npublic:\n");
        out.push_str(&format!("{INDENT}{name}() {{\n"));
        for field in fields {
            out.push_str(&format!("{INDENT}{INDENT}{field}\n"));
        }
        out.push_str(&format!("{INDENT}}}\n"));
        out.push_str(&format!("{INDENT}static float compute(FEV EV);\n"));
        out.push_str("};\n");
        out
    }

    /// Body half: `NAME::compute`
    pub fn definition(&self, scope: &Scope) -> String {
        let scope = scope.with_parent(self.parent.as_deref());
        let compute = scope.with_dialect(Dialect::Compute);
        let mut out = format!("float {}::compute(FEV EV) {{\n", self.name);
        for value in &self.compute {
            out.push_str(&compute.stmts(&crate::lower::lower_assign("val", value, false), 1));
        }
        if let Some(thresh) = &self.thresh {
            let thresh = scope.with_dialect(Dialect::Threshold).expr(thresh);
            out.push_str(&format!("{INDENT}thresh = {thresh};\n"));
        }
        out.push_str(&format!("{INDENT}return val;\n}}\n"));
        out
    }
}

/// Read the class starting at `start` and return the cursor after it.
///
/// The body ends with its description. A non-indented line also ends it and
/// is left for the caller.
pub fn extract(
    source: &Source,
    start: usize,
    name: &str,
    config: &Config,
    msgs: &mut Vec<Msg>,
) -> (MetricDef, usize) {
    let category = if config.is_extra(name) {
        Category::Extra
    } else {
        Category::Core
    };
    let mut def = MetricDef::new(name, category, start);
    log::debug!("class `{name}` ({category}) at line {}", start + 1);

    let mut cursor = start + 1;
    while let Some(line) = source.get(cursor) {
        if line.is_blank() {
            cursor += 1;
            continue;
        }
        if !line.is_indented() {
            break;
        }
        cursor += 1;

        if let Some(rest) = desc_value(line.code()) {
            let (desc, next) = read_desc(source, cursor - 1, rest, msgs);
            def.desc = desc;
            cursor = next;
            break;
        }

        match parse_line(line.code()) {
            Ok(stmts) => stmts.iter().for_each(|stmt| def.field(stmt)),
            Err(err) => msgs.push(
                Msg::warn(format!("Cannot parse line in class `{name}`: {err}"))
                    .at_line(&source.file, line),
            ),
        }
    }
    (def, cursor)
}

/// `desc = <rest>` -> `<rest>`
fn desc_value(code: &str) -> Option<&str> {
    let rest = code.strip_prefix("desc")?.trim_start();
    Some(rest.strip_prefix('=')?.trim())
}

/// Read a description starting on line `at`, returning it and the cursor
/// after its last line.
///
/// A `"""` block is joined with single spaces until the closing quotes.
fn read_desc(source: &Source, at: usize, rest: &str, msgs: &mut Vec<Msg>) -> (String, usize) {
    let Some(first) = rest.strip_prefix(DOC_QUOTE) else {
        return (plain_desc(source, at, rest, msgs), at + 1);
    };
    if let Some(end) = first.find(DOC_QUOTE) {
        return (first[..end].trim().to_string(), at + 1);
    }

    let mut parts = vec![first.trim().to_string()];
    let mut cursor = at + 1;
    while let Some(line) = source.get(cursor) {
        cursor += 1;
        let text = line.code();
        if let Some(end) = text.find(DOC_QUOTE) {
            parts.push(text[..end].trim().to_string());
            return (join(&parts), cursor);
        }
        parts.push(text.to_string());
    }

    if let Some(line) = source.get(at) {
        msgs.push(Msg::warn("Unterminated description").at_line(&source.file, line));
    }
    (join(&parts), cursor)
}

fn join(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `desc = "..."` on one line
fn plain_desc(source: &Source, at: usize, rest: &str, msgs: &mut Vec<Msg>) -> String {
    let tokens = LineLexer::new(rest, at).parse();
    let text: Option<String> = tokens
        .iter()
        .filter(|token| !matches!(token.kind, TokenKind::Comment(_)))
        .map(|token| match &token.kind {
            TokenKind::Text(text) => Some(text.clone()),
            _ => None,
        })
        .collect();
    match text {
        Some(text) if !tokens.is_empty() => text,
        _ => {
            if let Some(line) = source.get(at) {
                msgs.push(
                    Msg::warn("Description is not a string literal, left empty")
                        .at_line(&source.file, line),
                );
            }
            String::new()
        }
    }
}

/// Literal text of a taxonomy field, for the summary table
pub fn field_text(expr: &Option<Expr>) -> String {
    match expr {
        Some(Expr::Literal(Literal::Text(text))) => text.clone(),
        Some(Expr::Literal(Literal::Number(num))) => num.clone(),
        Some(Expr::Identifier(name)) => name.clone(),
        Some(_) => "...".to_string(),
        None => "-".to_string(),
    }
}
