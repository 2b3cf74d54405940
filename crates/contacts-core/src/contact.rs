//! The `Contact` entity and its input field set.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A persisted contact. `id` is assigned by the store and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub id:         i64,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub birthday:   NaiveDate,
  pub phone:      Option<String>,
  pub address:    Option<String>,
  pub notes:      Option<String>,
}

/// Input to create and update. Update is a full replace: an optional field
/// left out of the body is stored as `NULL`, not kept from the old row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub birthday:   NaiveDate,
  #[serde(default)]
  pub phone:      Option<String>,
  #[serde(default)]
  pub address:    Option<String>,
  #[serde(default)]
  pub notes:      Option<String>,
}

impl NewContact {
  /// Check the invariants the store relies on.
  pub fn validate(&self) -> Result<()> {
    if self.first_name.trim().is_empty() {
      return Err(Error::EmptyField("first_name"));
    }
    if self.last_name.trim().is_empty() {
      return Err(Error::EmptyField("last_name"));
    }
    let year = self.birthday.year();
    if !(0..=9999).contains(&year) {
      return Err(Error::YearOutOfRange(year));
    }
    Ok(())
  }

  /// Attach a store-assigned id.
  pub fn with_id(self, id: i64) -> Contact {
    Contact {
      id,
      first_name: self.first_name,
      last_name:  self.last_name,
      email:      self.email,
      birthday:   self.birthday,
      phone:      self.phone,
      address:    self.address,
      notes:      self.notes,
    }
  }
}

impl Contact {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}
