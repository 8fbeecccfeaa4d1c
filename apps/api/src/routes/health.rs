use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "screening-api",
        "store": state.screening.store_backend()
    }))
}

/// GET /api/v1
pub async fn banner_handler() -> Json<Value> {
    Json(json!({
        "message": "TalentScout Hiring Assistant API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
