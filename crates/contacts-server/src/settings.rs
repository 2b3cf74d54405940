//! Server configuration, read from an optional TOML file layered under
//! `CONTACTS_*` environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use contacts_api::ApiConfig;
use contacts_store_sqlite::StoreOptions;
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub database_path:        PathBuf,
  pub birthday_window_days: u32,
  pub max_sessions:         usize,
  pub session_timeout_secs: u64,
  /// When set, logs are also written to `<log_dir>/app.log`.
  pub log_dir:              Option<PathBuf>,
}

impl ServerConfig {
  /// Load from `path` (if it exists) and the environment, falling back to
  /// built-in defaults for anything unset.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8000_i64)?
      .set_default("database_path", "contacts.db")?
      .set_default("birthday_window_days", 7_i64)?
      .set_default("max_sessions", 16_i64)?
      .set_default("session_timeout_secs", 5_i64)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CONTACTS"))
      .build()
      .context("failed to read config file")?;

    let cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.validate()?;
    Ok(cfg)
  }

  fn validate(&self) -> anyhow::Result<()> {
    if self.max_sessions == 0 {
      anyhow::bail!("max_sessions must be at least 1");
    }
    Ok(())
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn store_options(&self) -> StoreOptions {
    StoreOptions {
      max_sessions:    self.max_sessions,
      acquire_timeout: Duration::from_secs(self.session_timeout_secs),
    }
  }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig { birthday_window_days: self.birthday_window_days }
  }
}
