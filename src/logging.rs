//! Tracing setup shared by the trainer and status binaries.
//!
//! Each binary logs to stdout and to its own timestamped file under
//! `<config dir>/.healthpredict/logs`, or `$HEALTHPREDICT_HOME/logs` when that
//! variable is set. Only the newest files of each binary are kept.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use directories::BaseDirs;
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

/// Environment variable that replaces the `.healthpredict` data directory.
pub const HOME_ENV_VAR: &str = "HEALTHPREDICT_HOME";
const APP_DIR_NAME: &str = ".healthpredict";
const MAX_LOG_FILES: usize = 10;

const FILE_STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
const LINE_STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

struct ActiveLog {
    path: PathBuf,
    _guard: WorkerGuard,
}

static ACTIVE_LOG: OnceLock<ActiveLog> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("No config directory available for logs; set HEALTHPREDICT_HOME")]
    NoLogDir,
    #[error("Failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read log directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to remove old log file {path}: {source}")]
    RemoveFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log file timestamp: {0}")]
    FormatTime(#[from] time::error::Format),
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Directory receiving log files. Not created here.
pub fn logs_dir() -> Result<PathBuf, LoggingError> {
    logs_dir_under(std::env::var_os(HOME_ENV_VAR)).ok_or(LoggingError::NoLogDir)
}

fn logs_dir_under(home: Option<OsString>) -> Option<PathBuf> {
    let root = match home {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => BaseDirs::new()?.config_dir().join(APP_DIR_NAME),
    };
    Some(root.join("logs"))
}

/// Log to stdout and to a file named after `binary` in [`logs_dir`].
pub fn init(binary: &str) -> Result<PathBuf, LoggingError> {
    init_in(&logs_dir()?, binary)
}

/// Like [`init`] with an explicit log directory.
///
/// Only the first successful call installs a subscriber; later calls return
/// the file chosen by that first call.
pub fn init_in(dir: &Path, binary: &str) -> Result<PathBuf, LoggingError> {
    if let Some(active) = ACTIVE_LOG.get() {
        return Ok(active.path.clone());
    }
    fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let file_name = log_file_name(binary, now_local_or_utc())?;
    let (file_writer, guard) = tracing_appender::non_blocking(rolling::never(dir, &file_name));
    prune_old_logs(dir, binary, MAX_LOG_FILES)?;

    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = fmt::time::OffsetTime::new(offset, LINE_STAMP);
    let subscriber = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_target(false)
                .with_timer(timer.clone())
                .with_writer(std::io::stdout),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber)?;

    let path = dir.join(&file_name);
    let _ = ACTIVE_LOG.set(ActiveLog {
        path: path.clone(),
        _guard: guard,
    });
    tracing::debug!("{binary} logging to {}", path.display());
    Ok(path)
}

fn log_file_name(binary: &str, now: OffsetDateTime) -> Result<String, LoggingError> {
    Ok(format!("{binary}_{}.log", now.format(FILE_STAMP)?))
}

/// Delete all but the `keep` newest logs written by `binary`.
///
/// Names embed a zero-padded timestamp, so name order is age order.
fn prune_old_logs(dir: &Path, binary: &str, keep: usize) -> Result<(), LoggingError> {
    let prefix = format!("{binary}_");
    let mut logs: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| LoggingError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(".log"))
        })
        .collect();
    logs.sort();
    let excess = logs.len().saturating_sub(keep);
    for path in logs.into_iter().take(excess) {
        fs::remove_file(&path).map_err(|source| LoggingError::RemoveFile { path, source })?;
    }
    Ok(())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
