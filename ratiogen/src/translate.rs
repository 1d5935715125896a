use crate::class::{self, MetricDef};
use crate::classify::{classify, LineKind};
use crate::config::Config;
use crate::consts::Constant;
use crate::emit;
use crate::error::Error;
use crate::func::{self, FuncDef};
use crate::grammer::parser::parse_line;
use crate::msg::Msg;
use crate::parents::ParentTable;
use crate::source::{RawLine, Source};
use arch::EventTable;
use indexmap::{IndexMap, IndexSet};

/// Everything extracted from one input file.
#[derive(Debug, Default)]
pub struct Translation {
    pub constants: IndexMap<String, Constant>,
    pub functions: IndexMap<String, FuncDef>,
    pub classes: IndexMap<String, MetricDef>,
    pub parents: ParentTable,
    pub diagnostics: Vec<Msg>,
}

/// Run the whole front half of the pipeline over one input.
pub fn translate(
    source: &Source,
    events: &EventTable,
    config: &Config,
) -> Result<Translation, Error> {
    let mut unit = Translation::default();
    unit.parents = ParentTable::collect(source, config, &mut unit.diagnostics)?;

    let mut cursor = 0;
    while let Some(line) = source.get(cursor) {
        match classify(line, config) {
            LineKind::Skip => cursor += 1,
            LineKind::Builtin(lines) => {
                log::trace!("skip runtime helper at line {}", cursor + 1);
                cursor += 1 + lines;
            }
            LineKind::Func => {
                let (func, next) = func::extract(source, cursor, &mut unit.diagnostics);
                if let Some(func) = func {
                    unit.add_function(source, func);
                }
                cursor = next;
            }
            LineKind::Class(name) => {
                let (def, next) =
                    class::extract(source, cursor, &name, config, &mut unit.diagnostics);
                unit.add_class(source, def);
                cursor = next;
            }
            LineKind::Sentinel => break,
            LineKind::Expr => {
                unit.add_constant(source, line);
                cursor += 1;
            }
        }
    }

    unit.prune_constants(source);
    unit.resolve_parents(source);
    unit.check_events(source, events);
    log::debug!(
        "{} constants, {} functions, {} classes",
        unit.constants.len(),
        unit.functions.len(),
        unit.classes.len()
    );
    Ok(unit)
}

impl Translation {
    pub fn emit(&self, events: &EventTable, config: &Config, setup: &str) -> String {
        emit::emit(self, events, config, setup)
    }

    fn redefined(&mut self, source: &Source, what: &str, name: &str, line: usize, prev: usize) {
        if let Some(line) = source.get(line) {
            self.diagnostics.push(
                Msg::warn(format!("Re-defined {what}: `{name}`")).at_line(&source.file, line),
            );
        }
        if let Some(prev) = source.get(prev) {
            self.diagnostics.push(
                Msg::note("Already defined here. The definition has been overridden. If this is not intentional, please reorder the source file.")
                    .at_line(&source.file, prev),
            );
        }
    }

    fn add_function(&mut self, source: &Source, func: FuncDef) {
        if let Some(prev) = self.functions.get(&func.name).map(|prev| prev.line) {
            self.redefined(source, "function", &func.name, func.line, prev);
        }
        self.functions.insert(func.name.clone(), func);
    }

    fn add_class(&mut self, source: &Source, def: MetricDef) {
        if let Some(prev) = self.classes.get(&def.name).map(|prev| prev.line) {
            self.redefined(source, "class", &def.name, def.line, prev);
        }
        self.classes.insert(def.name.clone(), def);
    }

    fn add_constant(&mut self, source: &Source, line: &RawLine) {
        let parsed = parse_line(line.code())
            .map_err(|err| err.to_string())
            .and_then(|stmts| Constant::parse(&stmts, line.idx));
        match parsed {
            Ok(constant) => {
                if let Some(prev) = self.constants.get(&constant.name).map(|prev| prev.line) {
                    self.redefined(source, "constant", &constant.name, constant.line, prev);
                }
                self.constants.insert(constant.name.clone(), constant);
            }
            Err(reason) => self.diagnostics.push(
                Msg::warn(format!("Global line skipped: {reason}")).at_line(&source.file, line),
            ),
        }
    }

    /// Drop constants shadowed by a function or class of the same name
    fn prune_constants(&mut self, source: &Source) {
        let shadowed: Vec<Constant> = self
            .constants
            .values()
            .filter(|c| self.functions.contains_key(&c.name) || self.classes.contains_key(&c.name))
            .cloned()
            .collect();
        for constant in shadowed {
            self.constants.shift_remove(&constant.name);
            if let Some(line) = source.get(constant.line) {
                self.diagnostics.push(
                    Msg::warn(format!(
                        "Constant `{}` has the name of a function or class, skipped",
                        constant.name
                    ))
                    .at_line(&source.file, line),
                );
            }
        }
    }

    /// Attach each class to its parent if that parent is a known class
    fn resolve_parents(&mut self, source: &Source) {
        let names: IndexSet<String> = self.classes.keys().cloned().collect();
        let mut msgs = Vec::new();
        for def in self.classes.values_mut() {
            let line = source.get(def.line);
            match self.parents.get(&def.name) {
                Some(parent) if names.contains(parent) => def.parent = Some(parent.to_string()),
                Some(parent) => {
                    if let Some(line) = line {
                        msgs.push(
                            Msg::warn(format!(
                                "Parent `{parent}` of `{}` is not a metric class, using no parent",
                                def.name
                            ))
                            .at_line(&source.file, line),
                        );
                    }
                }
                None => {}
            }
            let uses_parent = def.exprs().any(|expr| expr.mentions_receiver_field("parent"));
            if def.parent.is_none() && uses_parent {
                if let Some(line) = line {
                    msgs.push(
                        Msg::warn(format!(
                            "`{}` refers to its parent but has none, the null-parent fallback is used",
                            def.name
                        ))
                        .at_line(&source.file, line),
                    );
                }
            }
        }
        for cycle in self.parents.cycles() {
            let mut chain = cycle.clone();
            chain.push(cycle[0].clone());
            msgs.push(Msg::warn(format!(
                "Parent links form a cycle: {}",
                chain.join(" -> ")
            )));
        }
        self.diagnostics.extend(msgs);
    }

    /// Report every event key missing from the map once, at its first use
    fn check_events(&mut self, source: &Source, events: &EventTable) {
        let mut uses: Vec<(usize, &str)> = Vec::new();
        for func in self.functions.values() {
            uses.extend(
                func.exprs()
                    .flat_map(|expr| expr.event_keys())
                    .map(|key| (func.line, key)),
            );
        }
        for def in self.classes.values() {
            uses.extend(
                def.exprs()
                    .flat_map(|expr| expr.event_keys())
                    .map(|key| (def.line, key)),
            );
        }
        uses.sort_by_key(|(line, _)| *line);

        let mut reported = IndexSet::new();
        let mut msgs = Vec::new();
        for (line, key) in uses {
            if events.contains(key) || !reported.insert(key) {
                continue;
            }
            if let Some(line) = source.get(line) {
                msgs.push(
                    Msg::warn(format!("Unresolved event `{key}`, rendered as an error marker"))
                        .at_line(&source.file, line),
                );
            }
        }
        self.diagnostics.extend(msgs);
    }
}
