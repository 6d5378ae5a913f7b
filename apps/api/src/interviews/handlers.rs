//! Axum route handlers for invitations and the voice platform's prompt fetch.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::UnknownCallerPolicy;
use crate::errors::AppError;
use crate::interviews::dispatcher::{dispatch_invitation, SendSmsRequest};
use crate::interviews::models::DEFAULT_LANGUAGE;
use crate::interviews::prompt::{first_message, FALLBACK_FIRST_MESSAGE, FALLBACK_PROMPT};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SendSmsResponse {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub caller_id: Option<String>,
}

/// Conversation-initiation payload the voice platform expects back.
#[derive(Debug, Serialize)]
pub struct PromptResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub conversation_config_override: ConversationConfigOverride,
}

#[derive(Debug, Serialize)]
pub struct ConversationConfigOverride {
    pub agent: AgentOverride,
}

#[derive(Debug, Serialize)]
pub struct AgentOverride {
    pub prompt: PromptText,
    pub first_message: String,
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct PromptText {
    pub prompt: String,
}

impl PromptResponse {
    pub fn new(prompt: String, first_message: String, language: String) -> Self {
        Self {
            kind: "conversation_initiation_client_data",
            conversation_config_override: ConversationConfigOverride {
                agent: AgentOverride {
                    prompt: PromptText { prompt },
                    first_message,
                    language,
                },
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /send-sms
///
/// Stores a pending interview for the candidate and texts them the call-in number.
pub async fn handle_send_sms(
    State(state): State<AppState>,
    Json(request): Json<SendSmsRequest>,
) -> Result<Json<SendSmsResponse>, AppError> {
    info!(number = ?request.number, occupation = ?request.occupation, "Received /send-sms");

    let invitation = request.validate()?;
    dispatch_invitation(
        state.registry.as_ref(),
        state.sms.as_ref(),
        &state.config.twilio_phone_number,
        invitation,
    )
    .await?;

    Ok(Json(SendSmsResponse {
        message: "Prompt saved & SMS sent.".to_string(),
    }))
}

/// POST /elevenlabs/prompt
///
/// Looks up the caller's pending interview. Unknown callers get a 404 or the
/// generic persona depending on `UNKNOWN_CALLER_POLICY`.
pub async fn handle_prompt_fetch(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<PromptResponse>, AppError> {
    let caller_id = request
        .caller_id
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    info!(caller_id, "Prompt request from voice platform");

    let record = if caller_id.is_empty() {
        None
    } else {
        state.registry.get(caller_id).await?
    };

    if let Some(record) = record {
        let message = first_message(&record.first_name, &record.occupation, &record.language);
        return Ok(Json(PromptResponse::new(
            record.prompt,
            message,
            record.language,
        )));
    }

    match state.config.unknown_caller_policy {
        UnknownCallerPolicy::NotFound => Err(AppError::NotFound(format!(
            "No pending interview for caller '{caller_id}'"
        ))),
        UnknownCallerPolicy::Fallback => {
            warn!(caller_id, "Unknown caller; serving fallback persona");
            Ok(Json(PromptResponse::new(
                FALLBACK_PROMPT.to_string(),
                FALLBACK_FIRST_MESSAGE.to_string(),
                DEFAULT_LANGUAGE.to_string(),
            )))
        }
    }
}
