use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use camino::Utf8Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::EtlError;

pub const DEFAULT_FILTER: &str = "info";

/// Logs to stdout and appends to `log_file`.
pub fn init(log_file: &Utf8Path) -> Result<(), EtlError> {
    if let Some(parent) = log_file.parent().filter(|parent| !parent.as_str().is_empty()) {
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| EtlError::Filesystem(format!("create {parent}: {err}")))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file.as_std_path())
        .map_err(|err| EtlError::Filesystem(format!("open {log_file}: {err}")))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stdout),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|err| EtlError::Logging(err.to_string()))
}
