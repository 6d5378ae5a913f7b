//! Telephony status callback: schedules the post-call report.

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub const CALL_STATUS_COMPLETED: &str = "completed";

/// Terminal statuses for calls that never produced a conversation.
pub const CALL_STATUSES_UNANSWERED: [&str; 4] = ["busy", "canceled", "failed", "no-answer"];

/// Accepts the body as `application/x-www-form-urlencoded` when declared so,
/// JSON otherwise.
#[derive(Debug)]
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            Ok(Self(value))
        }
    }
}

/// The fields of Twilio's status callback this service reads.
#[derive(Debug, Default, Deserialize)]
pub struct StatusCallback {
    #[serde(rename = "CallStatus", default)]
    pub call_status: Option<String>,
    #[serde(rename = "CallSid", default)]
    pub call_sid: Option<String>,
}

impl StatusCallback {
    pub fn is_completed(&self) -> bool {
        self.call_status.as_deref() == Some(CALL_STATUS_COMPLETED)
    }

    pub fn is_unanswered(&self) -> bool {
        self.call_status
            .as_deref()
            .is_some_and(|s| CALL_STATUSES_UNANSWERED.contains(&s))
    }

    fn call_sid(&self) -> Option<&str> {
        self.call_sid.as_deref().filter(|sid| !sid.trim().is_empty())
    }
}

/// POST /twilio/status
///
/// Always answers `OK`. A completed call arms the delayed report job; an
/// unanswered terminal status drops any job still pending for that call.
pub async fn handle_call_status(
    State(state): State<AppState>,
    payload: Result<JsonOrForm<StatusCallback>, AppError>,
) -> &'static str {
    let callback = match payload {
        Ok(JsonOrForm(callback)) => callback,
        Err(e) => {
            warn!(error = %e, "Unreadable status callback");
            return "OK";
        }
    };

    info!(
        status = callback.call_status.as_deref().unwrap_or("<none>"),
        call_sid = callback.call_sid.as_deref().unwrap_or("<none>"),
        "Call status received"
    );

    if callback.is_completed() {
        let call_key = callback
            .call_sid()
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if !state.scheduler.schedule(&call_key) {
            debug!(call_sid = %call_key, "Duplicate completion callback coalesced");
        }
    } else if callback.is_unanswered() {
        if let Some(sid) = callback.call_sid() {
            if state.scheduler.cancel(sid) {
                info!(call_sid = sid, "Pending report dropped for unanswered call");
            }
        }
    }

    "OK"
}
