use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the report pipeline's current state.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "callscreen",
        "pending_reports": state.scheduler.pending(),
        "last_report_conversation": state.scheduler.generator().gate().last_processed(),
    }))
}
