use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber: stdout always, plus a daily-rolling file
/// when `[logging] file` is set. Keep the returned guard alive for the
/// lifetime of the process so buffered file output is flushed.
pub fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer());

    match &logging.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let prefix = path
                .file_name()
                .map(|f| f.to_os_string())
                .unwrap_or_else(|| "chatrelay.log".into());

            std::fs::create_dir_all(directory)?;
            let appender = tracing_appender::rolling::daily(directory, prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            registry
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            registry.try_init()?;
            Ok(None)
        }
    }
}
