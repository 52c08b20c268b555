use crate::config::LoggingConfig;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global subscriber: readable lines on stderr, and a daily-rolled
/// JSON file under `config.directory` when that directory can be created.
///
/// Hold the returned guard until exit; dropping it flushes the file writer.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let (file_layer, guard) = match fs::create_dir_all(&config.directory) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
        Err(e) => {
            eprintln!(
                "file logging disabled: cannot create {}: {}",
                config.directory.display(),
                e
            );
            (None, None)
        }
    };

    // stdout is reserved for the run summary
    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}
