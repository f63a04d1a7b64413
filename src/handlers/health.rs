use axum::Json;
use serde_json::{json, Value};

/// GET /api/health - liveness only; the store is not consulted
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
