use std::path::Path;

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Appender that keeps adding to `path` across runs.
///
/// # Errors
///
/// Returns an error if the file or its directory cannot be created.
pub fn file_appender(path: &Path) -> Result<RollingFileAppender, InitError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map_or_else(|| "suporte_tecnico.log".to_string(), |n| n.to_string_lossy().into_owned());
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
}

/// Installs the global subscriber: human-readable stderr output plus,
/// when `log_file` is set, the same events without colours in that file.
///
/// A log file that cannot be opened is reported and skipped.
pub fn init(verbose: bool, log_file: Option<&Path>) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let (appender, failure) = match log_file.map(file_appender) {
        Some(Ok(appender)) => (Some(appender), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };
    let file_layer = appender.map(|writer| fmt::layer().with_ansi(false).with_writer(writer));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    if let (Some(path), Some(e)) = (log_file, failure) {
        tracing::warn!(file = %path.display(), "log em arquivo desativado: {e}");
    }
}
