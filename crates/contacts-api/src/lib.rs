//! JSON REST API for the contacts service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`contacts_core::store::ContactStore`]. Every contact handler acquires one
//! session from the store, runs exactly one repository operation on it, and
//! drops the session before the response is written.
//!
//! TLS and transport concerns are the caller's responsibility.

pub mod contacts;
pub mod error;
pub mod health;
pub mod search;

use std::sync::Arc;

use axum::{Router, routing::get};
use contacts_core::{birthday::DEFAULT_WINDOW_DAYS, store::ContactStore};

pub use error::{ApiError, Operation};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Request-independent settings for the handlers.
#[derive(Debug, Clone, Copy)]
pub struct ApiConfig {
  /// Days ahead of today that count as an upcoming birthday.
  pub birthday_window_days: u32,
}

impl Default for ApiConfig {
  fn default() -> Self { Self { birthday_window_days: DEFAULT_WINDOW_DAYS } }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub config: ApiConfig,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), config: self.config }
  }
}

impl<S: ContactStore> ApiState<S> {
  /// Acquire the session for one request. Failure here means the store is
  /// unreachable, never that a contact is missing.
  pub(crate) async fn session(&self) -> Result<S::Session, ApiError> {
    self.store.session().await.map_err(ApiError::unavailable)
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `store`.
///
/// Collection paths answer with and without the trailing slash.
pub fn api_router<S>(store: Arc<S>, config: ApiConfig) -> Router<()>
where
  S: ContactStore + 'static,
{
  Router::new()
    .route("/", get(health::root))
    .route("/health", get(health::health))
    // Contacts
    .route("/contacts", get(contacts::list::<S>).post(contacts::create::<S>))
    .route("/contacts/", get(contacts::list::<S>).post(contacts::create::<S>))
    .route(
      "/contacts/{id}",
      get(contacts::get_one::<S>)
        .put(contacts::update::<S>)
        .delete(contacts::delete::<S>),
    )
    // Queries
    .route("/contacts/search", get(search::search::<S>))
    .route("/contacts/search/", get(search::search::<S>))
    .route("/contacts/upcoming_birthdays", get(search::upcoming_birthdays::<S>))
    .route("/contacts/upcoming_birthdays/", get(search::upcoming_birthdays::<S>))
    .with_state(ApiState { store, config })
}

#[cfg(test)]
mod tests;
