//! The forward-looking window used to classify a birthday as upcoming.
//!
//! Birthdays are compared by month and day only. Both ends of the window are
//! inclusive, so a window of 7 days starting on December 29 covers December
//! 29 through January 5.

use chrono::{Datelike, Days, NaiveDate};

/// Width of the window when no other value is configured.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayWindow {
  start: NaiveDate,
  days:  u32,
}

impl BirthdayWindow {
  pub fn new(today: NaiveDate, days: u32) -> Self {
    Self { start: today, days }
  }

  pub fn end(&self) -> NaiveDate {
    self
      .start
      .checked_add_days(Days::new(u64::from(self.days)))
      .unwrap_or(NaiveDate::MAX)
  }

  /// `MM-DD` of the first day in the window.
  pub fn start_key(&self) -> String { month_day_key(self.start) }

  /// `MM-DD` of the last day in the window.
  pub fn end_key(&self) -> String { month_day_key(self.end()) }

  /// True when the window runs past December 31. The month-day range is
  /// then split in two: `[start_key, 12-31]` and `[01-01, end_key]`.
  pub fn wraps_year(&self) -> bool { self.end().year() != self.start.year() }

  /// Whether a birthday (any year) falls inside the window. Stores filter
  /// on the same `start_key`/`end_key`/`wraps_year` rules.
  pub fn contains(&self, birthday: NaiveDate) -> bool {
    let key = month_day_key(birthday);
    let (start, end) = (self.start_key(), self.end_key());
    if self.wraps_year() {
      key >= start || key <= end
    } else {
      key >= start && key <= end
    }
  }
}

/// Zero-padded `MM-DD`; sorts the same way as the calendar, with `02-29`
/// landing between February 28 and March 1.
pub fn month_day_key(date: NaiveDate) -> String {
  format!("{:02}-{:02}", date.month(), date.day())
}
