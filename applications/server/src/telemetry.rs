/// Logging setup
///
/// Events go to stdout and, when `log_file_path` is set, to that file through
/// a non-blocking writer. `RUST_LOG` overrides the configured level.
use crate::config::{LogFormat, Settings};
use crate::error::{Result, ServerError};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install the global subscriber
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the process.
pub fn init(settings: &Settings) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(settings)));

    let mut layers: Vec<BoxedLayer> = vec![stdout_layer(settings.log_format)];

    let guard = match file_target(&settings.log_file_path) {
        Some((directory, file_name)) => {
            std::fs::create_dir_all(&directory).map_err(|e| {
                ServerError::Config(format!(
                    "Failed to create log directory {}: {}",
                    directory.display(),
                    e
                ))
            })?;

            let appender = tracing_appender::rolling::never(&directory, &file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(file_layer(settings.log_format, writer));
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| ServerError::Internal(format!("Failed to install subscriber: {}", e)))?;

    Ok(guard)
}

fn stdout_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Text => fmt::layer().boxed(),
    }
}

fn file_layer(format: LogFormat, writer: tracing_appender::non_blocking::NonBlocking) -> BoxedLayer {
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Text => fmt::layer().with_ansi(false).with_writer(writer).boxed(),
    }
}

/// Filter used when `RUST_LOG` is unset
fn default_directive(settings: &Settings) -> String {
    let level = settings.log_level.as_directive();
    if settings.db_echo {
        format!("{level},sqlx=info")
    } else {
        format!("{level},sqlx=warn")
    }
}

/// Split the log file path into directory and file name; empty disables
fn file_target(path: &Path) -> Option<(PathBuf, PathBuf)> {
    let file_name = path.file_name()?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some((directory, PathBuf::from(file_name)))
}
