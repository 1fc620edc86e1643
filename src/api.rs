//! HTTP surface for the stub web service.
//!
//! Two read-only, unauthenticated endpoints, unrelated to the ingestion
//! pipeline:
//!
//! - `GET /` – static greeting used as a health check.
//! - `GET /api/users/:user_id` – echoes the integer path parameter back in a
//!   JSON body. No persistence, no validation beyond path-type coercion.

use axum::{Json, Router, extract::Path, routing::get};
use serde_json::{Value, json};

/// Build the router exposing the stub endpoints.
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/users/:user_id", get(get_user))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}

async fn get_user(Path(user_id): Path<i64>) -> Json<Value> {
    Json(json!({ "user_id": user_id }))
}
