//! Error types for `contacts-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("field `{0}` must not be empty")]
  EmptyField(&'static str),

  /// Birthdays are stored as `YYYY-MM-DD` text; years need exactly four digits.
  #[error("birthday year {0} is outside 0000..=9999")]
  YearOutOfRange(i32),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
