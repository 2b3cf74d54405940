//! Fixed-payload endpoints that never touch the store.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
  pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
  pub message: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> { Json(HealthResponse { status: "OK" }) }

/// `GET /`
pub async fn root() -> Json<WelcomeResponse> {
  Json(WelcomeResponse { message: "Welcome to the contact API" })
}
