//! ARM event map: parallel `.name = "X",` and `.code = 0x11,` lines

use crate::error::Error;
use crate::event::EventAttr;
use crate::table::EventTable;

pub const NAME_FIELD: &str = ".name";
pub const CODE_FIELD: &str = ".code";

/// Value after `=`, without the trailing comma
fn field_value(line: &str, row: usize, field: &str) -> Result<String, Error> {
    let (_, value) = line
        .split_once('=')
        .ok_or_else(|| Error::ArmFieldValue(field.to_string(), row + 1))?;
    let value = value.trim();
    let value = value.strip_suffix(',').unwrap_or(value).trim();
    Ok(value.to_string())
}

fn unquote(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'')
}

/// Collect names and codes separately, then pair them by position.
pub fn load(text: &str) -> Result<EventTable, Error> {
    let mut names = Vec::new();
    let mut codes = Vec::new();
    for (row, line) in text.lines().enumerate() {
        if line.contains(NAME_FIELD) {
            names.push(field_value(line, row, NAME_FIELD)?);
        } else if line.contains(CODE_FIELD) {
            codes.push(field_value(line, row, CODE_FIELD)?);
        }
    }
    if names.len() != codes.len() {
        return Err(Error::ArmFieldMismatch(names.len(), codes.len()));
    }

    let mut table = EventTable::default();
    for (name, code) in names.iter().zip(&codes) {
        table.insert(EventAttr::code(unquote(name), code));
    }
    Ok(table)
}
