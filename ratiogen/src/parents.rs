use crate::classify::{classify, LineKind};
use crate::config::Config;
use crate::error::Error;
use crate::grammer::ast::{Expr, Literal, Stmt};
use crate::grammer::parser::parse_line;
use crate::msg::Msg;
use crate::source::Source;
use indexmap::{IndexMap, IndexSet};

/// `child -> parent` links harvested from the setup class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParentTable(pub IndexMap<String, String>);

impl ParentTable {
    /// Scan every line after the sentinel class for
    /// `o["<child>"].parent = o["<parent>"]`.
    pub fn collect(source: &Source, config: &Config, msgs: &mut Vec<Msg>) -> Result<Self, Error> {
        let start = source
            .lines
            .iter()
            .position(|line| classify(line, config) == LineKind::Sentinel)
            .ok_or_else(|| Error::MissingSentinel(config.sentinel.clone()))?;

        let mut table = ParentTable::default();
        for line in &source.lines[start + 1..] {
            if !line.text.contains(".parent") {
                continue;
            }
            let stmts = match parse_line(line.code()) {
                Ok(stmts) => stmts,
                Err(err) => {
                    msgs.push(
                        Msg::warn(format!("Cannot parse parent link: {err}"))
                            .at_line(&source.file, line),
                    );
                    continue;
                }
            };
            for stmt in &stmts {
                if let Some((child, parent)) = link(stmt) {
                    table.0.insert(child.to_string(), parent.to_string());
                }
            }
        }
        log::debug!("{} parent links", table.0.len());
        Ok(table)
    }

    pub fn get(&self, child: &str) -> Option<&str> {
        self.0.get(child).map(String::as_str)
    }

    /// Every cycle in the links, each listed once starting from its first
    /// member in table order.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut seen: IndexSet<&str> = IndexSet::new();
        for start in self.0.keys() {
            let mut path: IndexSet<&str> = IndexSet::new();
            let mut node = start.as_str();
            loop {
                if let Some(pos) = path.get_index_of(node) {
                    let cycle: Vec<&str> = path.iter().skip(pos).copied().collect();
                    if cycle.iter().all(|member| !seen.contains(member)) {
                        cycles.push(cycle.iter().map(|member| member.to_string()).collect());
                    }
                    break;
                }
                if seen.contains(node) {
                    break;
                }
                path.insert(node);
                match self.get(node) {
                    Some(parent) => node = parent,
                    None => break,
                }
            }
            seen.extend(path);
        }
        cycles
    }
}

/// `o["A"].parent = o["B"]` -> `("A", "B")`
fn link(stmt: &Stmt) -> Option<(&str, &str)> {
    let Stmt::Assign(Expr::Attribute(child, field), parent) = stmt else {
        return None;
    };
    if field != "parent" {
        return None;
    }
    Some((subscript_key(child)?, subscript_key(parent)?))
}

fn subscript_key(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Subscript(_, key) => match &**key {
            Expr::Literal(Literal::Text(key)) => Some(key.as_str()),
            _ => None,
        },
        _ => None,
    }
}
