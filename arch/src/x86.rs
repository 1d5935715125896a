//! x86 event map: `KEY,cpu/event=0x3c,umask=0x0[/k][,cmask=0x6/]`

use crate::event::EventAttr;
use crate::table::{EventTable, Issue};

pub const UMASK_SHIFT: u32 = 8;
pub const CMASK_SHIFT: u32 = 24;

/// Umask qualifier selecting kernel-only counting
pub const KERNEL_ONLY: &str = "k";

const FIELDS: [&str; 3] = ["cpu/event", "umask", "cmask"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Encoding {
    pub config: u32,
    pub exclude_user: bool,
}

/// Encode the attribute part of a map line.
///
/// Only `cpu/event=,umask=` and `cpu/event=,umask=,cmask=` are accepted, in
/// this order. Anything else is reported back as a reason string.
pub fn encode(spec: &str) -> Result<Encoding, String> {
    let fields: Vec<&str> = spec.split(',').map(str::trim).collect();
    if !(2..=3).contains(&fields.len()) {
        return Err(format!(
            "expected 2 or 3 attributes, found {}",
            fields.len()
        ));
    }

    let mut values = Vec::with_capacity(fields.len());
    for (field, expected) in fields.iter().zip(FIELDS) {
        match field.split_once('=') {
            Some((name, value)) if name.trim() == expected => values.push(value.trim()),
            _ => return Err(format!("expected `{expected}=` but found `{field}`")),
        }
    }

    let event = number(values[0])?;
    let (umask, qualifier) = match values[1].split_once('/') {
        Some((umask, qualifier)) => (umask, qualifier.trim()),
        None => (values[1], ""),
    };
    let umask = number(umask)?;
    let cmask = match values.get(2) {
        Some(cmask) => number(cmask.split('/').next().unwrap_or(cmask))?,
        None => 0,
    };

    Ok(Encoding {
        config: event | umask << UMASK_SHIFT | cmask << CMASK_SHIFT,
        exclude_user: qualifier == KERNEL_ONLY,
    })
}

fn number(text: &str) -> Result<u32, String> {
    parse_int(text).ok_or_else(|| format!("`{}` is not a number", text.trim()))
}

/// Integer literal with automatic base: `0x`, `0o`, `0b` or decimal.
pub fn parse_int(text: &str) -> Option<u32> {
    let text = text.trim().replace('_', "").to_ascii_lowercase();
    if let Some(hex) = text.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(oct) = text.strip_prefix("0o") {
        u32::from_str_radix(oct, 8).ok()
    } else if let Some(bin) = text.strip_prefix("0b") {
        u32::from_str_radix(bin, 2).ok()
    } else if text.len() > 1 && text.starts_with('0') && text.chars().any(|c| c != '0') {
        // `010` is not a valid literal
        None
    } else {
        text.parse().ok()
    }
}

/// Load every `KEY,SPEC` line.
///
/// Shapes that cannot be encoded still enter the table as a zero config, so
/// that references to them render as an inert event rather than an error.
pub fn load(text: &str) -> (EventTable, Vec<Issue>) {
    let mut table = EventTable::default();
    let mut issues = Vec::new();
    for (line, raw) in text.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let Some((key, spec)) = raw.split_once(',') else {
            issues.push(Issue::new(line, raw, "missing `,` between key and attributes, skipped"));
            continue;
        };
        let key = key.trim();
        let encoding = match encode(spec) {
            Ok(encoding) => encoding,
            Err(reason) => {
                issues.push(Issue::new(
                    line,
                    raw,
                    &format!("unsupported event shape for `{key}` ({reason}), encoded as 0"),
                ));
                Encoding::default()
            }
        };
        table.insert(EventAttr::raw(key, encoding.config, encoding.exclude_user));
    }
    (table, issues)
}
