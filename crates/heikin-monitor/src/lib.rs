//! Logging setup.

mod logging;

pub use logging::{setup_logging, warn_file_layer, LogError};
pub use tracing_appender::non_blocking::WorkerGuard;
