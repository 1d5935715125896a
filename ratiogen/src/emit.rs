use crate::class::Category;
use crate::config::Config;
use crate::consts::Constant;
use crate::error::Error;
use crate::func::FuncDef;
use crate::render::{Dialect, Scope, INDENT};
use crate::translate::Translation;
use arch::EventTable;
use std::path::Path;

pub const RATIOS_SUFFIX: &str = "_ratios.py";
pub const CORE_LIST: &str = "m_vmtc_core";
pub const EXTRA_LIST: &str = "m_vmtc_extra";

/// `skl_client_ratios.py` -> `SKLCLIENT`
pub fn setup_name(path: &str) -> String {
    let file = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path);
    let stem = file
        .strip_suffix(RATIOS_SUFFIX)
        .or_else(|| file.strip_suffix(".py"))
        .unwrap_or(file);
    stem.replace('_', "").to_uppercase()
}

/// Write the whole translation unit.
///
/// Sections: header, include, namespaces, constants, function prototypes,
/// class prototypes, class declarations, class bodies, function bodies,
/// setup and teardown.
pub fn emit(unit: &Translation, events: &EventTable, config: &Config, setup: &str) -> String {
    let scope = Scope::new(events, Dialect::Function);
    let mut out = String::new();

    out.push_str(&format!("{}\n", config.header));
    out.push_str(&format!("#include \"{}\"\n\n", config.include));
    for namespace in &config.namespaces {
        out.push_str(&format!("namespace {namespace} {{\n"));
    }
    out.push('\n');

    section(&mut out, unit.constants.values().map(Constant::declaration));
    section(&mut out, unit.functions.values().map(FuncDef::declaration));
    section(&mut out, unit.classes.keys().map(|name| format!("class {name};")));
    for def in unit.classes.values() {
        out.push_str(&def.declaration(&scope));
        out.push('\n');
    }
    for def in unit.classes.values() {
        out.push_str(&def.definition(&scope));
        out.push('\n');
    }
    for func in unit.functions.values() {
        out.push_str(&func.definition(&scope));
        out.push('\n');
    }

    out.push_str(&setup_routines(unit, setup));
    out.push('\n');
    for namespace in config.namespaces.iter().rev() {
        out.push_str(&format!("}}  // namespace {namespace}\n"));
    }
    out
}

fn section(out: &mut String, lines: impl Iterator<Item = String>) {
    let mut any = false;
    for line in lines {
        out.push_str(&line);
        out.push('\n');
        any = true;
    }
    if any {
        out.push('\n');
    }
}

/// Constructor registering every metric and destructor releasing them
fn setup_routines(unit: &Translation, setup: &str) -> String {
    let class = format!("{setup}SetUpImpl");
    let mut out = format!("{class}::{class}() {{\n");
    for def in unit.classes.values() {
        let list = match def.category {
            Category::Core => CORE_LIST,
            Category::Extra => EXTRA_LIST,
        };
        out.push_str(&format!(
            "{INDENT}{list}.push_back(std::make_pair(\"{name}\", (MetricBase*)(new {name}())));\n",
            name = def.name
        ));
    }
    out.push_str("}\n\n");

    out.push_str(&format!("{class}::~{class}() {{\n"));
    for list in [CORE_LIST, EXTRA_LIST] {
        out.push_str(&format!("{INDENT}for (auto& metric : {list}) {{\n"));
        out.push_str(&format!("{INDENT}{INDENT}delete metric.second;\n"));
        out.push_str(&format!("{INDENT}}}\n"));
        out.push_str(&format!("{INDENT}{list}.clear();\n"));
    }
    out.push_str("}\n");
    out
}

/// Write `text` to `path` through a sibling temporary file
pub fn write_output(path: &str, text: &str) -> Result<(), Error> {
    let tmp = format!("{path}.tmp");
    std::fs::write(&tmp, text).map_err(|e| Error::FileWrite(tmp.clone(), e))?;
    std::fs::rename(&tmp, path).map_err(|e| Error::FileWrite(path.to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_names() {
        assert_eq!(setup_name("skl_client_ratios.py"), "SKLCLIENT");
        assert_eq!(setup_name("/pmu-tools/icl_server_ratios.py"), "ICLSERVER");
        assert_eq!(setup_name("neoverse_n1.py"), "NEOVERSEN1");
    }
}
