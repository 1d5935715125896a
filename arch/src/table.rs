use crate::error::Error;
use crate::event::EventAttr;
use crate::target::Target;
use crate::{arm, x86};
use indexmap::IndexMap;

/// Map line that was skipped or only partially understood
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// 0-origin line index in the map file
    pub line: usize,
    pub raw: String,
    pub reason: String,
}

impl Issue {
    pub fn new(line: usize, raw: &str, reason: &str) -> Self {
        Self {
            line,
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Symbolic event key to encoding, in map order.
#[derive(Debug, Clone, Default)]
pub struct EventTable(pub IndexMap<String, EventAttr>);

impl EventTable {
    pub fn load(target: Target, text: &str) -> Result<(Self, Vec<Issue>), Error> {
        match target {
            Target::X86 => Ok(x86::load(text)),
            Target::Arm => Ok((arm::load(text)?, Vec::new())),
        }
    }

    /// A later entry for the same key replaces the earlier one.
    pub fn insert(&mut self, attr: EventAttr) -> Option<EventAttr> {
        self.0.insert(attr.key.clone(), attr)
    }

    pub fn get(&self, key: &str) -> Option<&EventAttr> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventAttr> {
        self.0.values()
    }
}
