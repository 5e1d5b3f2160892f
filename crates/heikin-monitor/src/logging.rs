//! Logging setup.
//!
//! Console output honors `RUST_LOG` and falls back to the configured level.
//! An optional file receives `WARN` and above.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Invalid log file path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Failed to open log file: {0}")]
    File(#[from] InitError),
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Setup logging with the given level.
///
/// The returned guard flushes the warning log on drop; hold it for the
/// lifetime of the process.
pub fn setup_logging(
    level: &str,
    json: bool,
    file: Option<&Path>,
) -> Result<Option<WorkerGuard>, LogError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console: BoxedLayer = if json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().pretty().boxed()
    };
    let mut layers = vec![console.with_filter(filter).boxed()];

    let mut guard = None;
    if let Some(path) = file {
        let (layer, file_guard) = warn_file_layer(path)?;
        layers.push(layer);
        guard = Some(file_guard);
    }

    tracing_subscriber::registry().with(layers).init();
    Ok(guard)
}

/// Layer writing `WARN` and above to `path`, without rotation.
pub fn warn_file_layer(path: &Path) -> Result<(BoxedLayer, WorkerGuard), LogError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LogError::InvalidPath(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(LevelFilter::WARN)
        .boxed();
    Ok((layer, guard))
}
