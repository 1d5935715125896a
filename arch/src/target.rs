use strum::{Display, EnumString};

/// Architecture whose event map is being loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum Target {
    #[strum(serialize = "x86")]
    X86,
    #[strum(serialize = "arm")]
    Arm,
}

impl Target {
    pub fn parse(s: &str) -> Result<Self, String> {
        s.parse::<Self>()
            .map_err(|_| format!("Unknown target: {s} (expected `x86` or `arm`)"))
    }
}
