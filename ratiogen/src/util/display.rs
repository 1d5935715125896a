use crate::class::{field_text, MetricDef};
use crate::translate::Translation;
use arch::EventTable;
use color_print::cprintln;
use indexmap::IndexSet;

/// Tables of what was extracted, for `--verbose`
pub fn summary(unit: &Translation, events: &EventTable) {
    println!("+-[Const]-----------------------------------------------------------------------");
    for constant in unit.constants.values() {
        let kind = format!("{:<8}", constant.kind.to_string());
        let row = format!("{:<32} = {}", constant.name, constant.value);
        cprintln!("| <c>{}</c> {}", kind, row);
    }

    println!("+-[Func]------------------------------------------------------------------------");
    for func in unit.functions.values() {
        cprintln!("| <green>{}</green>", func.signature());
    }

    println!("+-[Class]-----------------------------------------------------------------------");
    for def in unit.classes.values() {
        let category = format!("{:<6}", def.category.to_string());
        cprintln!("| <m>{}</m> {}", category, class_row(def));
    }

    println!("+-[Event]-----------------------------------------------------------------------");
    let used: IndexSet<&str> = unit
        .functions
        .values()
        .flat_map(|func| func.exprs())
        .chain(unit.classes.values().flat_map(|def| def.exprs()))
        .flat_map(|expr| expr.event_keys())
        .collect();
    let resolved = used.iter().filter(|key| events.contains(key)).count();
    cprintln!(
        "| {} events in map, {} referenced, <red>{}</red> unresolved",
        events.len(),
        resolved,
        used.len() - resolved
    );
    println!("+-------------------------------------------------------------------------------");
}

/// Name, taxonomy fields and parent of one class, padded into columns
fn class_row(def: &MetricDef) -> String {
    format!(
        "{:<40} {:<8} {:<6} L{:<3} <- {}",
        def.name,
        field_text(&def.domain),
        field_text(&def.area),
        field_text(&def.level),
        def.parent.as_deref().unwrap_or("-")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::Category;
    use crate::grammer::ast::{Expr, Literal};

    #[test]
    fn class_columns() {
        let mut def = MetricDef::new("Fetch_Latency", Category::Core, 0);
        def.domain = Some(Expr::Literal(Literal::Text("Slots".to_string())));
        def.level = Some(Expr::Literal(Literal::Number("2".to_string())));
        def.parent = Some("Frontend_Bound".to_string());
        let row = class_row(&def);
        assert!(row.starts_with("Fetch_Latency "));
        assert!(row.ends_with("Slots    -      L2   <- Frontend_Bound"));

        let orphan = MetricDef::new("Orphan", Category::Extra, 0);
        assert!(class_row(&orphan).ends_with("<- -"));
    }
}
