//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Store failures are logged here, with the operation and contact id, and
//! reach the client only as a fixed message.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The repository operation a handler was running when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  Create,
  List,
  Get,
  Update,
  Delete,
  Search,
  UpcomingBirthdays,
}

impl Operation {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Create => "create",
      Self::List => "list",
      Self::Get => "get",
      Self::Update => "update",
      Self::Delete => "delete",
      Self::Search => "search",
      Self::UpcomingBirthdays => "upcoming_birthdays",
    }
  }

  /// Client-facing message when the store fails during this operation.
  pub fn failure_message(self) -> &'static str {
    match self {
      Self::Create => "Failed to create contact",
      Self::List | Self::UpcomingBirthdays => "Failed to retrieve contacts",
      Self::Get => "Failed to retrieve contact",
      Self::Update => "Failed to update contact",
      Self::Delete => "Failed to delete contact",
      Self::Search => "Failed to search contacts",
    }
  }
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("contact {0} not found")]
  NotFound(i64),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("{} failed", .op.as_str())]
  Store {
    op:     Operation,
    id:     Option<i64>,
    #[source]
    source: BoxError,
  },

  #[error("service unavailable")]
  Unavailable(#[source] BoxError),
}

impl ApiError {
  pub fn store<E>(op: Operation, id: Option<i64>, e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store { op, id, source: Box::new(e) }
  }

  pub fn unavailable<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Unavailable(Box::new(e))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) | ApiError::Store { .. } => StatusCode::BAD_REQUEST,
      ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match &self {
      ApiError::NotFound(id) => {
        tracing::debug!(id, "contact not found");
        "Contact not found".to_owned()
      }
      ApiError::BadRequest(m) => m.clone(),
      ApiError::Store { op, id, source } => {
        tracing::error!(op = op.as_str(), id = ?id, error = %source, "store operation failed");
        op.failure_message().to_owned()
      }
      ApiError::Unavailable(source) => {
        tracing::error!(error = %source, "could not acquire a store session");
        "Service unavailable".to_owned()
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
