use crate::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "counsel-api.log";

/// Installs the global subscriber. Console output always; a daily rolling file
/// as well when `logging.directory` is configured.
///
/// The returned guard flushes the file writer and must live as long as the server.
pub fn init_logging(config: Option<&LoggingConfig>) -> Option<WorkerGuard> {
    let default_level = config
        .and_then(|c| c.level.clone())
        .unwrap_or_else(|| "info".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match config.and_then(|c| c.directory.as_ref()) {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}
