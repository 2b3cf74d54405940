//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts/` | `?skip` (default 0), `?limit` (default 10) |
//! | `POST`   | `/contacts/` | Body: [`NewContact`]; returns 201 + stored contact |
//! | `GET`    | `/contacts/{id}` | 404 if not found |
//! | `PUT`    | `/contacts/{id}` | Full replace; 404 if not found |
//! | `DELETE` | `/contacts/{id}` | Returns the deleted contact; 404 if not found |

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use contacts_core::{
  contact::{Contact, NewContact},
  store::{ContactSession, ContactStore},
};
use serde::Deserialize;

use crate::{
  ApiState,
  error::{ApiError, Operation},
};

// ─── List ─────────────────────────────────────────────────────────────────────

fn default_limit() -> u32 { 10 }

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub skip:  u32,
  #[serde(default = "default_limit")]
  pub limit: u32,
}

/// `GET /contacts/[?skip=<n>][&limit=<n>]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore,
{
  let session = state.session().await?;
  let contacts = session
    .list(params.skip, params.limit)
    .await
    .map_err(|e| ApiError::store(Operation::List, None, e))?;
  Ok(Json(contacts))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /contacts/` — returns 201 + the stored [`Contact`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<NewContact>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
{
  let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let session = state.session().await?;
  let contact = session
    .create(input)
    .await
    .map_err(|e| ApiError::store(Operation::Create, None, e))?;
  tracing::info!(id = contact.id, name = %contact.full_name(), "contact created");
  Ok((StatusCode::CREATED, Json(contact)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contacts/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
{
  let session = state.session().await?;
  let contact = session
    .get(id)
    .await
    .map_err(|e| ApiError::store(Operation::Get, Some(id), e))?
    .ok_or(ApiError::NotFound(id))?;
  Ok(Json(contact))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /contacts/{id}` — every mutable field is replaced by the body.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  body: Result<Json<NewContact>, JsonRejection>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
{
  let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let session = state.session().await?;
  let contact = session
    .update(id, input)
    .await
    .map_err(|e| ApiError::store(Operation::Update, Some(id), e))?
    .ok_or(ApiError::NotFound(id))?;
  tracing::info!(id, name = %contact.full_name(), "contact updated");
  Ok(Json(contact))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contacts/{id}` — returns the contact as it was before deletion.
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
{
  let session = state.session().await?;
  let contact = session
    .delete(id)
    .await
    .map_err(|e| ApiError::store(Operation::Delete, Some(id), e))?
    .ok_or(ApiError::NotFound(id))?;
  tracing::info!(id, name = %contact.full_name(), "contact deleted");
  Ok(Json(contact))
}
