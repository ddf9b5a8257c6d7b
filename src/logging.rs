//! Structured JSONL logging to file plus human-readable stderr output.
//!
//! This module provides dual-output logging:
//! - **JSONL to file** (`<data dir>/wallswitch/logs/wallswitch.jsonl`) -
//!   structured for log tooling
//! - **Compact to stderr** - human-readable for developers
//!
//! # Usage
//!
//! ```rust,ignore
//! use wallswitch::logging;
//!
//! // Initialize logging - MUST keep guard alive for duration of program
//! let _guard = logging::init();
//!
//! // Use tracing macros directly
//! tracing::info!(hotkey = "Ctrl+Alt+N", "Hotkey registered");
//! ```
//!
//! # JSONL Output Format
//!
//! Each line is a valid JSON object:
//! ```json
//! {"timestamp":"2026-03-01T10:30:45.123Z","level":"INFO","target":"wallswitch::hotkeys","fields":{"message":"registered hotkey","id":1000}}
//! ```

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::paths;

const LOG_FILE_NAME: &str = "wallswitch.jsonl";

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard will flush and close the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize the dual-output logging system.
///
/// Returns a guard that MUST be kept alive for the duration of the program.
/// Dropping the guard will flush remaining logs and close the file.
pub fn init() -> LoggingGuard {
    let log_dir = paths::log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }

    let log_path = log_dir.join(LOG_FILE_NAME);

    // Open the log file in append mode; fall back to a sink so a failure
    // here never takes the daemon down.
    let writer: Box<dyn io::Write + Send> = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => Box::new(file),
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file, file logging disabled: {}", e);
            Box::new(io::sink())
        }
    };

    // Non-blocking writer so logging never stalls the event loop
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(writer);

    // Environment filter - default to info, allow override via RUST_LOG
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // JSONL layer for file output
    let json_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    // Compact layer for stderr (human developers)
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(stderr_layer)
        .init();

    tracing::info!(log_path = %log_path.display(), "logging initialized");

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// Get the path to the JSONL log file.
pub fn log_path() -> PathBuf {
    paths::log_dir().join(LOG_FILE_NAME)
}
