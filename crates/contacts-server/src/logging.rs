//! Tracing setup: console output always, plus a plain-text file when a log
//! directory is configured.

use std::path::Path;

use anyhow::Context as _;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Install the global subscriber. The returned guard flushes the file writer
/// on drop and must live until shutdown.
pub fn init(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

  let (file_layer, guard) = match log_dir {
    Some(dir) => {
      std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {dir:?}"))?;
      let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, "app.log"));
      let layer = fmt::layer().with_writer(writer).with_ansi(false);
      (Some(layer), Some(guard))
    }
    None => (None, None),
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer())
    .with(file_layer)
    .try_init()
    .context("failed to install tracing subscriber")?;

  Ok(guard)
}
