//! tracing subscriber setup
//!
//! Driven by the `[logging]` section: level filter, text or json lines, and
//! stdout or a (daily rotated) file.

use std::io::Write;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder as RollingBuilder, Rotation};

use crate::config::LoggingConfig;

type BoxedWriter = Box<dyn Write + Send + Sync>;

/// Install the global subscriber
///
/// Keep the returned guard alive until exit, otherwise buffered lines are lost.
///
/// # Panics
/// When the log file cannot be opened, or a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    let log_file = config.file.as_deref().filter(|f| !f.is_empty());
    let writer = match log_file {
        None => Box::new(std::io::stdout()) as BoxedWriter,
        Some(file) if config.enable_rotation => rotating_writer(file, config.max_backups),
        Some(file) => append_writer(file),
    };

    let (writer, guard) = tracing_appender::non_blocking(writer);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.level))
        .with_writer(writer)
        // 文件里不要颜色码
        .with_ansi(log_file.is_none());

    match config.format.as_str() {
        "json" => builder.json().init(),
        _ => builder.init(),
    }
    guard
}

/// `dir/name.log` 按天滚动为 `name.YYYY-MM-DD.log`，保留 `keep` 个
fn rotating_writer(file: &str, keep: u32) -> BoxedWriter {
    let path = Path::new(file);
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let prefix = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("shortledger");

    let appender = RollingBuilder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(keep.max(1) as usize)
        .build(dir)
        .unwrap_or_else(|e| panic!("cannot create rolling log in {}: {}", dir.display(), e));
    Box::new(appender)
}

fn append_writer(file: &str) -> BoxedWriter {
    let handle = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .unwrap_or_else(|e| panic!("cannot open log file {}: {}", file, e));
    Box::new(handle)
}
