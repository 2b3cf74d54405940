//! The `ContactStore` and `ContactSession` traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g.
//! `contacts-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  birthday::BirthdayWindow,
  contact::{Contact, NewContact},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ContactSession::search`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
  /// Case-insensitive substring of the first name, last name, or full name.
  pub name:  Option<String>,
  /// Case-insensitive substring of the email address.
  pub email: Option<String>,
}

impl ContactQuery {
  /// The name filter, if present and not blank.
  pub fn name(&self) -> Option<&str> { non_blank(self.name.as_deref()) }

  /// The email filter, if present and not blank.
  pub fn email(&self) -> Option<&str> { non_blank(self.email.as_deref()) }

  /// No usable filter was supplied. Searching with an empty query yields no
  /// contacts.
  pub fn is_empty(&self) -> bool { self.name().is_none() && self.email().is_none() }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
  s.map(str::trim).filter(|s| !s.is_empty())
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// A storage backend that hands out request-scoped sessions.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
  type Session: ContactSession<Error = Self::Error>;

  /// Acquire a session for one request. The session is released when it is
  /// dropped. Fails when the backend cannot be reached or is shut down.
  fn session(
    &self,
  ) -> impl Future<Output = Result<Self::Session, Self::Error>> + Send + '_;
}

/// The contact repository: one operation per use case, each a single bounded
/// query that either commits fully or leaves no trace.
///
/// Absence is not an error: lookups by id return `Ok(None)`.
pub trait ContactSession: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new contact and return it with its assigned id.
  fn create(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Up to `limit` contacts in id order, skipping the first `skip`.
  fn list(
    &self,
    skip: u32,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Replace every mutable field of contact `id` with `input`.
  fn update(
    &self,
    id: i64,
    input: NewContact,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Hard-delete contact `id`, returning the row as it was.
  fn delete(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Contacts matching either filter of `query`; empty when `query` is empty.
  fn search<'a>(
    &'a self,
    query: &'a ContactQuery,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;

  /// Contacts whose birthday falls inside `window`, soonest first.
  fn upcoming_birthdays(
    &self,
    window: BirthdayWindow,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;
}
