use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and rasterizer readiness.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let rasterizer = if state.rasterizer.has_font() {
        "ready"
    } else {
        "no-font"
    };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "aura-catcher",
        "rasterizer": rasterizer
    }))
}
