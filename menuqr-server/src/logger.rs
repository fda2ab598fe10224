//! Logging Infrastructure
//!
//! `RUST_LOG` wins when set; otherwise `LOG_LEVEL` applies to this crate and
//! tower-http. Output is plain text or JSON, to stdout or to a daily-rotated
//! file when a log directory is configured.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("menuqr_server={log_level},tower_http={log_level}"))
    })
}

/// Initialize the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn init_logger(log_level: &str, json: bool, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter = build_filter(log_level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok() {
            let file_appender = tracing_appender::rolling::daily(log_path, "menuqr-server.log");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            if json {
                builder.json().with_writer(writer).init();
            } else {
                builder.with_ansi(false).with_writer(writer).init();
            }
            return Some(guard);
        }
        eprintln!("log directory {dir} is not writable, logging to stdout");
    }

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    None
}
