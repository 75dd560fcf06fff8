// Tracing subscriber setup: env filter, console layer, optional file layer

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber. Keep the returned guard alive for the whole process
/// or buffered file output is lost.
pub fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create EnvFilter")?;

    let (file_layer, guard) = match config.log_file.as_deref() {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let (json_layer, text_layer) = if config.json {
        (Some(fmt::layer().json().with_target(false)), None)
    } else {
        (
            None,
            Some(fmt::layer().with_target(false).with_thread_ids(true)),
        )
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(guard)
}

fn file_writer(path: &str) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let path = Path::new(path);
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("LOG_FILE {:?} has no file name", path))?;
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_writer_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("agent.log");

        let (_writer, _guard) = file_writer(path.to_str().unwrap()).unwrap();
        assert!(dir.path().join("logs").is_dir());
    }

    #[test]
    fn test_file_writer_rejects_directory_path() {
        assert!(file_writer("/").is_err());
    }
}
