//! Request handlers

mod auth;
mod books;

pub use auth::*;
pub use books::*;

use axum::Json;
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Acknowledgement body for mutations that return no resource
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
