//! Handlers for the read-only query endpoints.
//!
//! - `GET /contacts/search/?name=...&email=...`: a contact matches when any
//!   supplied filter is a case-insensitive substring of its name or email.
//!   With no filters the result is empty.
//! - `GET /contacts/upcoming_birthdays/`: birthdays from today through the
//!   configured number of days ahead, soonest first.

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::Local;
use contacts_core::{
  birthday::BirthdayWindow,
  contact::Contact,
  store::{ContactQuery, ContactSession, ContactStore},
};
use serde::Deserialize;

use crate::{
  ApiState,
  error::{ApiError, Operation},
};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  pub name:  Option<String>,
  pub email: Option<String>,
}

impl From<SearchParams> for ContactQuery {
  fn from(p: SearchParams) -> Self { ContactQuery { name: p.name, email: p.email } }
}

/// `GET /contacts/search/[?name=...][&email=...]`
pub async fn search<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore,
{
  let query = ContactQuery::from(params);
  let session = state.session().await?;
  let contacts = session
    .search(&query)
    .await
    .map_err(|e| ApiError::store(Operation::Search, None, e))?;
  Ok(Json(contacts))
}

/// `GET /contacts/upcoming_birthdays/`
pub async fn upcoming_birthdays<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore,
{
  let window = BirthdayWindow::new(
    Local::now().date_naive(),
    state.config.birthday_window_days,
  );
  let session = state.session().await?;
  let contacts = session
    .upcoming_birthdays(window)
    .await
    .map_err(|e| ApiError::store(Operation::UpcomingBirthdays, None, e))?;
  Ok(Json(contacts))
}
