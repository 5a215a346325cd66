//! Structured JSONL logging to a file and compact human-readable stderr output.
//!
//! - **JSONL to file** (`<data_dir>/logs/browser-actions.jsonl`), one object per line
//! - **Compact to stderr** - stdout belongs to the launcher payload
//!
//! # Usage
//!
//! ```rust,ignore
//! use browser_actions::logging;
//!
//! // Keep the guard alive for the duration of the program
//! let _guard = logging::init(Some(&config.log_dir()));
//! tracing::info!(name = "open", "Action completed");
//! ```
//!
//! # JSONL Output Format
//!
//! ```json
//! {"timestamp":"2025-01-12T10:30:45.123Z","level":"INFO","target":"browser_actions::executor::runner","fields":{"message":"Action completed","exit_code":0,"duration_ms":42}}
//! ```

use std::fs::{self, OpenOptions};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE_NAME: &str = "browser-actions.jsonl";

/// Filter used when `RUST_LOG` is unset or invalid
const DEFAULT_FILTER: &str = "info";

/// Guard that must be kept alive for the duration of the program.
/// Dropping it flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    log_path: Option<PathBuf>,
}

impl LoggingGuard {
    /// JSONL file being written, if file logging could be set up
    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }
}

/// Initialize logging.
///
/// With `log_dir`, events also go to a JSONL file in that directory. If the
/// directory or file cannot be created, only stderr logging is installed.
/// Calling this more than once keeps the first subscriber.
pub fn init(log_dir: Option<&Path>) -> LoggingGuard {
    let file = log_dir.and_then(|dir| match open_log_file(dir) {
        Ok(file) => Some((file, dir.join(LOG_FILE_NAME))),
        Err(e) => {
            eprintln!("[browser-actions] cannot open log file in {}: {}", dir.display(), e);
            None
        }
    });

    let (json_layer, file_guard, log_path) = match file {
        Some((file, path)) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .with_span_events(FmtSpan::NONE);
            (Some(layer), Some(guard), Some(path))
        }
        None => (None, None, None),
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::new(format_description!(
            "[hour]:[minute]:[second].[subsecond digits:3]"
        )))
        .with_target(false)
        .with_level(true)
        .compact();

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            log_path = ?log_path.as_ref().map(|p| p.display().to_string()),
            "Logging initialized"
        );
    }

    LoggingGuard {
        _file_guard: file_guard,
        log_path,
    }
}

fn open_log_file(dir: &Path) -> std::io::Result<fs::File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritable_log_dir_falls_back_to_stderr() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the log directory should be
        let blocker = dir.path().join("logs");
        fs::write(&blocker, "").unwrap();

        let guard = init(Some(&blocker));
        assert_eq!(guard.log_path(), None);
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested/logs");
        open_log_file(&log_dir).unwrap();
        assert!(log_dir.join(LOG_FILE_NAME).is_file());
    }
}
