use crate::source::RawLine;
use color_print::cprintln;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Error,
    Warn,
    Note,
}

/// Where a diagnostic points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loc {
    pub file: String,
    /// 0-origin
    pub line: usize,
    pub raw: String,
}

/// Recoverable finding, collected during a run and printed at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Msg {
    pub level: Level,
    pub text: String,
    pub loc: Option<Loc>,
}

impl Msg {
    fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            loc: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Level::Error, text)
    }

    pub fn warn(text: impl Into<String>) -> Self {
        Self::new(Level::Warn, text)
    }

    pub fn note(text: impl Into<String>) -> Self {
        Self::new(Level::Note, text)
    }

    pub fn at(self, file: &str, line: usize, raw: &str) -> Self {
        Self {
            loc: Some(Loc {
                file: file.to_string(),
                line,
                raw: raw.to_string(),
            }),
            ..self
        }
    }

    pub fn at_line(self, file: &str, line: &RawLine) -> Self {
        self.at(file, line.idx, &line.text)
    }

    pub fn print(&self) {
        match self.level {
            Level::Error => cprintln!("<red,bold>error</>: {}", self.text),
            Level::Warn => cprintln!("<yellow,bold>warn</>: {}", self.text),
            Level::Note => cprintln!("<green,bold>note</>: {}", self.text),
        }
        if let Some(loc) = &self.loc {
            cprintln!("     <blue>--></> <underline>{}:{}</>", loc.file, loc.line + 1);
            cprintln!("      <blue>|</>");
            cprintln!(" <blue>{:>4} |</> {}", loc.line + 1, loc.raw);
            cprintln!("      <blue>|</>");
        }
    }
}

pub fn dump(msgs: &[Msg]) {
    for msg in msgs {
        msg.print();
    }
}

pub fn count(msgs: &[Msg], level: Level) -> usize {
    msgs.iter().filter(|msg| msg.level == level).count()
}
