//! Error type for `contacts-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] contacts_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// No session could be acquired: the store is closed, saturated past the
  /// acquire timeout, or the connection does not answer.
  #[error("store unavailable: {0}")]
  Unavailable(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
