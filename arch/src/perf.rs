use num_enum::{FromPrimitive, IntoPrimitive};
use strum::{Display, EnumString};

/// `perf_event_attr.type` as understood by the metric runtime.
///
/// Every event coming out of an event map is counted as a raw event, so
/// `Raw` is also what an unknown value decodes to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[repr(u32)]
pub enum PerfType {
    Hardware = 0,
    Software = 1,
    Tracepoint = 2,
    HwCache = 3,
    #[default]
    Raw = 4,
    Breakpoint = 5,
}

impl PerfType {
    pub fn value(self) -> u32 {
        self.into()
    }
}
