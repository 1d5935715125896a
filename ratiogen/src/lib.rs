pub mod class;
pub mod classify;
pub mod config;
pub mod consts;
pub mod emit;
pub mod error;
pub mod func;
pub mod grammer;
pub mod lower;
pub mod msg;
pub mod parents;
pub mod render;
pub mod source;
pub mod translate;
pub mod util;

pub use config::Config;
pub use error::Error;
pub use source::Source;
pub use translate::{translate, Translation};
