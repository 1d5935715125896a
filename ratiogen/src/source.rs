use crate::error::Error;

/// One physical line of the input, as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 0-origin line index
    pub idx: usize,
    pub text: String,
}

impl RawLine {
    pub fn code(&self) -> &str {
        self.text.trim()
    }

    pub fn is_indented(&self) -> bool {
        self.text.starts_with(char::is_whitespace)
    }

    /// Blank or comment-only
    pub fn is_blank(&self) -> bool {
        let code = self.code();
        code.is_empty() || code.starts_with('#')
    }
}

/// The whole input file held in memory for the single pass.
#[derive(Debug, Clone)]
pub struct Source {
    pub file: String,
    pub lines: Vec<RawLine>,
}

impl Source {
    pub fn new(file: &str, text: &str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(idx, text)| RawLine {
                idx,
                text: text.to_string(),
            })
            .collect();
        Self {
            file: file.to_string(),
            lines,
        }
    }

    pub fn read(path: &str) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::FileRead(path.to_string(), e))?;
        Ok(Self::new(path, &text))
    }

    pub fn get(&self, idx: usize) -> Option<&RawLine> {
        self.lines.get(idx)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
