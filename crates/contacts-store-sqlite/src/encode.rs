//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Birthdays are stored as `YYYY-MM-DD` strings; the last five characters are
//! the `MM-DD` key the upcoming-birthday query filters on.

use chrono::NaiveDate;
use contacts_core::contact::Contact;

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Wrap `needle` in `%...%`, escaping the LIKE metacharacters with `\`.
/// Queries using the result must declare `ESCAPE '\'`.
pub fn like_pattern(needle: &str) -> String {
  let mut out = String::with_capacity(needle.len() + 2);
  out.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Raw row ─────────────────────────────────────────────────────────────────

/// A `contacts` row as read from SQLite, before date decoding.
pub struct RawContact {
  pub id:         i64,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub birthday:   String,
  pub phone:      Option<String>,
  pub address:    Option<String>,
  pub notes:      Option<String>,
}

impl RawContact {
  /// Read the columns listed in [`crate::schema::CONTACT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawContact {
      id:         row.get(0)?,
      first_name: row.get(1)?,
      last_name:  row.get(2)?,
      email:      row.get(3)?,
      birthday:   row.get(4)?,
      phone:      row.get(5)?,
      address:    row.get(6)?,
      notes:      row.get(7)?,
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:         self.id,
      first_name: self.first_name,
      last_name:  self.last_name,
      email:      self.email,
      birthday:   decode_date(&self.birthday)?,
      phone:      self.phone,
      address:    self.address,
      notes:      self.notes,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn like_pattern_escapes_metacharacters() {
    assert_eq!(like_pattern("ada"), "%ada%");
    assert_eq!(like_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
  }

  #[test]
  fn dates_keep_four_digit_years() {
    let d = NaiveDate::from_ymd_opt(815, 1, 2).unwrap();
    assert_eq!(encode_date(d), "0815-01-02");
    assert_eq!(decode_date("0815-01-02").unwrap(), d);
    assert!(decode_date("not-a-date").is_err());
  }
}
