//! Logging setup shared by the solbot binaries.

mod logging;

pub use logging::{init, LogConfig, LogFormat, LogOutput};
