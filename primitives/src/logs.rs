// standard library
use std::fmt::Display;
use std::path::PathBuf;

// external crates
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, EnvFilter};

/// Minimum level of events written by [`init`]. Deserializes leniently:
/// unknown or non-string values fall back to `Info` with an error log.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Case-insensitive; also accepts `warning`.
    pub fn parse(s: &str) -> Option<LogLevel> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let level = String::deserialize(deserializer)
            .map_err(|e| error!("Error deserializing log level: {:?}", e))
            .ok()
            .and_then(|s| {
                let level = LogLevel::parse(&s);
                if level.is_none() {
                    error!("Invalid log level: {}. Setting to default: '{}'", s, LogLevel::default());
                }
                level
            });
        Ok(level.unwrap_or_default())
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Options {
    pub stdout: bool,
    pub log_level: LogLevel,
    pub log_dir: PathBuf,
    pub file_prefix: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            stdout: true,
            log_level: LogLevel::Info,
            log_dir: std::env::temp_dir().join("file-primitives"),
            file_prefix: "file-primitives.log".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to create log file appender in '{}': {source}", .log_dir.display())]
pub struct InitLogsErr {
    pub log_dir: PathBuf,
    pub source: InitError,
}

/// Install a global tracing subscriber for applications embedding this crate.
///
/// Logs go through a non-blocking writer to stdout or, with `stdout` off, to an
/// hourly rolling file in `log_dir`. Keep the returned guard alive for as long
/// as logs should be flushed. If a global subscriber is already installed it is
/// left in place.
pub fn init(options: Options) -> Result<WorkerGuard, InitLogsErr> {
    let (writer, guard) = if options.stdout {
        tracing_appender::non_blocking(std::io::stdout())
    } else {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::HOURLY)
            .filename_prefix(&options.file_prefix)
            .build(&options.log_dir)
            .map_err(|e| InitLogsErr {
                log_dir: options.log_dir.clone(),
                source: e,
            })?;
        tracing_appender::non_blocking(appender)
    };

    // respect RUST_LOG environment variable if set, otherwise use provided log level
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.log_level.as_str()));

    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(options.stdout)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_thread_names(true);
    let _ = tracing::subscriber::set_global_default(subscriber.finish());
    Ok(guard)
}
