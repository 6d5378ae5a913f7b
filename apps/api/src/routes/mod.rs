pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interviews::handlers as interviews;
use crate::report::handlers as report;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Invitation flow
        .route("/send-sms", post(interviews::handle_send_sms))
        .route("/elevenlabs/prompt", post(interviews::handle_prompt_fetch))
        // Post-call flow
        .route("/twilio/status", post(report::handle_call_status))
        .with_state(state)
}
