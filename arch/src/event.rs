use crate::perf::PerfType;
use std::fmt;

/// Selector of one hardware event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventCode {
    /// x86 raw config: `event | umask << 8 | cmask << 24`
    Raw(u32),
    /// ARM event number, kept as written in the map
    Code(String),
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventCode::Raw(config) => write!(f, "{config:#x}"),
            EventCode::Code(code) => write!(f, "{code}"),
        }
    }
}

/// One resolved entry of an event map.
///
/// The `Display` form is the brace initialiser of the runtime's `EventAttr`:
/// `{"KEY", 0x3c, 4, 0}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventAttr {
    pub key: String,
    pub code: EventCode,
    pub perf_type: PerfType,
    pub exclude_user: bool,
}

impl EventAttr {
    pub fn raw(key: &str, config: u32, exclude_user: bool) -> Self {
        Self {
            key: key.to_string(),
            code: EventCode::Raw(config),
            perf_type: PerfType::Raw,
            exclude_user,
        }
    }

    pub fn code(key: &str, code: &str) -> Self {
        Self {
            key: key.to_string(),
            code: EventCode::Code(code.to_string()),
            perf_type: PerfType::Raw,
            exclude_user: false,
        }
    }

    /// Raw config value, if this is an x86 encoding
    pub fn config(&self) -> Option<u32> {
        match self.code {
            EventCode::Raw(config) => Some(config),
            EventCode::Code(_) => None,
        }
    }
}

impl fmt::Display for EventAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"{}\", {}, {}, {}}}",
            self.key,
            self.code,
            self.perf_type.value(),
            u8::from(self.exclude_user)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_raw() {
        let attr = EventAttr::raw("CPU_CLK_UNHALTED.THREAD", 0x3c, false);
        assert_eq!(attr.to_string(), r#"{"CPU_CLK_UNHALTED.THREAD", 0x3c, 4, 0}"#);
    }

    #[test]
    fn display_kernel_only() {
        let attr = EventAttr::raw("X", 0x06000201, true);
        assert_eq!(attr.to_string(), r#"{"X", 0x6000201, 4, 1}"#);
    }

    #[test]
    fn display_arm_code() {
        let attr = EventAttr::code("CPU_CYCLES", "0x11");
        assert_eq!(attr.to_string(), r#"{"CPU_CYCLES", 0x11, 4, 0}"#);
        assert_eq!(attr.config(), None);
    }
}
