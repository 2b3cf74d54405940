//! Router tests against an in-memory `SqliteStore`.

use std::{sync::Arc, time::Duration};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use chrono::{Datelike, Days, Local};
use contacts_core::{
  birthday::BirthdayWindow,
  contact::{Contact, NewContact},
  store::{ContactQuery, ContactSession, ContactStore},
};
use contacts_store_sqlite::{SqliteStore, StoreOptions};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ApiConfig, api_router};

async fn make_router() -> axum::Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(Arc::new(store), ApiConfig::default())
}

async fn oneshot(
  app: &axum::Router,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn json_body(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn ada() -> Value {
  json!({
    "first_name": "Ada",
    "last_name": "Lovelace",
    "email": "ada@x.com",
    "birthday": "1815-12-10"
  })
}

fn person(first: &str, email: &str, birthday: &str) -> Value {
  json!({
    "first_name": first,
    "last_name": "Tester",
    "email": email,
    "birthday": birthday
  })
}

// ── Fixed endpoints ──────────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
  let app = make_router().await;
  let resp = oneshot(&app, "GET", "/health", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await, json!({ "status": "OK" }));
}

#[tokio::test]
async fn root_returns_welcome() {
  let app = make_router().await;
  let resp = oneshot(&app, "GET", "/", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(
    json_body(resp).await,
    json!({ "message": "Welcome to the contact API" })
  );
}

// ── CRUD lifecycle ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_get_delete_get() {
  let app = make_router().await;

  let resp = oneshot(&app, "POST", "/contacts/", Some(ada())).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created = json_body(resp).await;
  assert_eq!(created["id"], 1);
  assert_eq!(created["first_name"], "Ada");
  assert_eq!(created["birthday"], "1815-12-10");
  assert_eq!(created["phone"], Value::Null);

  let resp = oneshot(&app, "GET", "/contacts/1", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await, created);

  let resp = oneshot(&app, "DELETE", "/contacts/1", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await, created);

  let resp = oneshot(&app, "GET", "/contacts/1", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(json_body(resp).await, json!({ "error": "Contact not found" }));
}

#[tokio::test]
async fn update_replaces_all_fields() {
  let app = make_router().await;
  let mut with_phone = ada();
  with_phone["phone"] = json!("555-0100");
  oneshot(&app, "POST", "/contacts/", Some(with_phone)).await;

  let replacement = person("Augusta", "countess@x.com", "1815-12-10");
  let resp = oneshot(&app, "PUT", "/contacts/1", Some(replacement)).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let updated = json_body(resp).await;
  assert_eq!(updated["first_name"], "Augusta");
  assert_eq!(updated["phone"], Value::Null);

  let resp = oneshot(&app, "GET", "/contacts/1", None).await;
  assert_eq!(json_body(resp).await, updated);
}

#[tokio::test]
async fn missing_ids_return_404() {
  let app = make_router().await;
  for (method, body) in [("GET", None), ("PUT", Some(ada())), ("DELETE", None)] {
    let resp = oneshot(&app, method, "/contacts/99", body).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{method}");
    assert_eq!(json_body(resp).await["error"], "Contact not found");
  }
}

#[tokio::test]
async fn create_with_blank_name_returns_400() {
  let app = make_router().await;
  let resp = oneshot(&app, "POST", "/contacts/", Some(person(" ", "a@b.c", "2000-01-01"))).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await, json!({ "error": "Failed to create contact" }));
}

#[tokio::test]
async fn update_with_blank_name_returns_400() {
  let app = make_router().await;
  oneshot(&app, "POST", "/contacts/", Some(ada())).await;
  let resp = oneshot(&app, "PUT", "/contacts/1", Some(person("", "a@b.c", "2000-01-01"))).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await, json!({ "error": "Failed to update contact" }));
}

#[tokio::test]
async fn malformed_body_returns_400() {
  let app = make_router().await;
  let resp = oneshot(&app, "POST", "/contacts/", Some(json!({ "first_name": "Ada" }))).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = oneshot(&app, "POST", "/contacts/", Some(person("Ada", "a@b.c", "not-a-date"))).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_numeric_id_returns_400() {
  let app = make_router().await;
  let resp = oneshot(&app, "GET", "/contacts/abc", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── List ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_defaults_to_ten() {
  let app = make_router().await;
  for i in 0..12 {
    let body = person(&format!("P{i}"), "p@x.com", "1990-05-05");
    oneshot(&app, "POST", "/contacts", Some(body)).await;
  }

  let resp = oneshot(&app, "GET", "/contacts/", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await.as_array().unwrap().len(), 10);

  let resp = oneshot(&app, "GET", "/contacts/?skip=10&limit=10", None).await;
  let page = json_body(resp).await;
  let ids: Vec<_> = page.as_array().unwrap().iter().map(|c| c["id"].clone()).collect();
  assert_eq!(ids, [json!(11), json!(12)]);
}

#[tokio::test]
async fn list_empty_store_is_empty_array() {
  let app = make_router().await;
  let resp = oneshot(&app, "GET", "/contacts", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await, json!([]));
}

#[tokio::test]
async fn list_rejects_negative_skip() {
  let app = make_router().await;
  let resp = oneshot(&app, "GET", "/contacts/?skip=-1", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Search ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_by_name_and_email() {
  let app = make_router().await;
  oneshot(&app, "POST", "/contacts/", Some(ada())).await;
  oneshot(&app, "POST", "/contacts/", Some(person("Grace", "grace@navy.mil", "1906-12-09"))).await;

  let resp = oneshot(&app, "GET", "/contacts/search/?name=lovelace", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let hits = json_body(resp).await;
  assert_eq!(hits.as_array().unwrap().len(), 1);
  assert_eq!(hits[0]["first_name"], "Ada");

  let resp = oneshot(&app, "GET", "/contacts/search?email=navy", None).await;
  let hits = json_body(resp).await;
  assert_eq!(hits[0]["first_name"], "Grace");
}

#[tokio::test]
async fn search_without_match_or_filters_is_empty() {
  let app = make_router().await;
  oneshot(&app, "POST", "/contacts/", Some(ada())).await;

  for uri in ["/contacts/search/?name=turing", "/contacts/search/"] {
    let resp = oneshot(&app, "GET", uri, None).await;
    assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    assert_eq!(json_body(resp).await, json!([]), "{uri}");
  }
}

// ── Upcoming birthdays ───────────────────────────────────────────────────────

fn birthday_in(days: u64) -> String {
  let d = Local::now().date_naive() + Days::new(days);
  // Born in 1990 on the same month and day; fall back to Mar 1 for Feb 29.
  let born = d.with_year(1990).unwrap_or_else(|| {
    chrono::NaiveDate::from_ymd_opt(1990, 3, 1).unwrap()
  });
  born.format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn upcoming_birthdays_uses_configured_window() {
  let app = make_router().await;
  oneshot(&app, "POST", "/contacts/", Some(person("Soon", "s@x.com", &birthday_in(2)))).await;
  oneshot(&app, "POST", "/contacts/", Some(person("Later", "l@x.com", &birthday_in(30)))).await;

  let resp = oneshot(&app, "GET", "/contacts/upcoming_birthdays/", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let hits = json_body(resp).await;
  let names: Vec<_> = hits.as_array().unwrap().iter().map(|c| c["first_name"].clone()).collect();
  assert_eq!(names, [json!("Soon")]);
}

// ── Session provider ─────────────────────────────────────────────────────────

#[tokio::test]
async fn closed_store_returns_503() {
  let store = SqliteStore::open_in_memory_with(StoreOptions {
    max_sessions:    4,
    acquire_timeout: Duration::from_millis(50),
  })
  .await
  .unwrap();
  let app = api_router(Arc::new(store.clone()), ApiConfig::default());
  store.close().await.unwrap();

  let resp = oneshot(&app, "GET", "/contacts/1", None).await;
  assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
  assert_eq!(json_body(resp).await, json!({ "error": "Service unavailable" }));

  let resp = oneshot(&app, "GET", "/health", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn sessions_are_released_between_requests() {
  let store = SqliteStore::open_in_memory_with(StoreOptions {
    max_sessions:    1,
    acquire_timeout: Duration::from_millis(200),
  })
  .await
  .unwrap();
  let app = api_router(Arc::new(store), ApiConfig::default());

  // With one slot, every request after the first would time out if a slot
  // leaked on any exit path.
  oneshot(&app, "POST", "/contacts/", Some(ada())).await;
  oneshot(&app, "GET", "/contacts/99", None).await;
  oneshot(&app, "PUT", "/contacts/1", Some(person("", "a@b.c", "2000-01-01"))).await;
  let resp = oneshot(&app, "GET", "/contacts/1", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

// ── Store failures after the session is acquired ─────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("disk I/O error")]
struct DiskError;

/// Hands out sessions freely; every repository call on them fails.
struct FailingStore;

struct FailingSession;

impl ContactStore for FailingStore {
  type Error = DiskError;
  type Session = FailingSession;

  async fn session(&self) -> Result<FailingSession, DiskError> { Ok(FailingSession) }
}

impl ContactSession for FailingSession {
  type Error = DiskError;

  async fn create(&self, _input: NewContact) -> Result<Contact, DiskError> { Err(DiskError) }

  async fn list(&self, _skip: u32, _limit: u32) -> Result<Vec<Contact>, DiskError> {
    Err(DiskError)
  }

  async fn get(&self, _id: i64) -> Result<Option<Contact>, DiskError> { Err(DiskError) }

  async fn update(&self, _id: i64, _input: NewContact) -> Result<Option<Contact>, DiskError> {
    Err(DiskError)
  }

  async fn delete(&self, _id: i64) -> Result<Option<Contact>, DiskError> { Err(DiskError) }

  async fn search(&self, _query: &ContactQuery) -> Result<Vec<Contact>, DiskError> {
    Err(DiskError)
  }

  async fn upcoming_birthdays(&self, _window: BirthdayWindow) -> Result<Vec<Contact>, DiskError> {
    Err(DiskError)
  }
}

#[tokio::test]
async fn store_failures_return_400_with_operation_message() {
  let app = api_router(Arc::new(FailingStore), ApiConfig::default());
  let cases = [
    ("POST", "/contacts/", Some(ada()), "Failed to create contact"),
    ("GET", "/contacts/", None, "Failed to retrieve contacts"),
    ("GET", "/contacts/1", None, "Failed to retrieve contact"),
    ("PUT", "/contacts/1", Some(ada()), "Failed to update contact"),
    ("DELETE", "/contacts/1", None, "Failed to delete contact"),
    ("GET", "/contacts/search/?name=ada", None, "Failed to search contacts"),
    ("GET", "/contacts/upcoming_birthdays/", None, "Failed to retrieve contacts"),
  ];
  for (method, uri, body, message) in cases {
    let resp = oneshot(&app, method, uri, body).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{method} {uri}");
    let body = json_body(resp).await;
    assert_eq!(body, json!({ "error": message }), "{method} {uri}");
    assert!(!body.to_string().contains("disk"), "{method} {uri}");
  }
}
