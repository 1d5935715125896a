pub mod arm;
pub mod error;
pub mod event;
pub mod perf;
pub mod table;
pub mod target;
pub mod x86;

pub use error::Error;
pub use event::{EventAttr, EventCode};
pub use perf::PerfType;
pub use table::{EventTable, Issue};
pub use target::Target;
