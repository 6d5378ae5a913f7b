//! Invitation dispatch: validate → compose prompt → store record → send SMS.
//!
//! The record is stored before the SMS goes out and is NOT rolled back when
//! the send fails, so a prompt can exist for a candidate who never got a text.

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interviews::models::{normalize_language, PendingInterview};
use crate::interviews::prompt::{compose_prompt, InterviewSubject};
use crate::interviews::registry::InterviewRegistry;
use crate::questions::SUPPORTED_OCCUPATIONS;
use crate::vendors::SmsSender;

/// Request body for `POST /send-sms`. Every field is optional at the serde
/// level so missing fields surface as a validation error, not a JSON rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsRequest {
    pub number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub occupation: Option<String>,
    pub language: Option<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Invitation {
    pub number: String,
    pub first_name: String,
    pub last_name: String,
    pub occupation: String,
    pub language: String,
}

impl SendSmsRequest {
    pub fn validate(self) -> Result<Invitation, AppError> {
        let mut missing = Vec::new();
        let mut take = |value: Option<String>, name: &'static str| {
            match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
                Some(v) => v,
                None => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let number = take(self.number, "number");
        let first_name = take(self.first_name, "firstName");
        let last_name = take(self.last_name, "lastName");
        let occupation = take(self.occupation, "occupation");

        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(Invitation {
            number,
            first_name,
            last_name,
            occupation,
            language: normalize_language(self.language.as_deref()),
        })
    }
}

/// Text of the invitation SMS.
pub fn invitation_sms_body(first_name: &str, call_in_number: &str) -> String {
    format!(
        "Hi {first_name}, thank you for applying. Please call this number to begin your interview: {call_in_number}"
    )
}

/// Stores the pending interview and texts the candidate.
pub async fn dispatch_invitation(
    registry: &dyn InterviewRegistry,
    sms: &dyn SmsSender,
    call_in_number: &str,
    invitation: Invitation,
) -> Result<PendingInterview, AppError> {
    if !SUPPORTED_OCCUPATIONS.contains(&invitation.occupation.as_str()) {
        warn!(occupation = %invitation.occupation, "No question bank for occupation; prompt has no role questions");
    }

    let prompt = compose_prompt(&InterviewSubject {
        first_name: &invitation.first_name,
        last_name: &invitation.last_name,
        occupation: &invitation.occupation,
    });

    let interview = PendingInterview {
        phone_number: invitation.number,
        first_name: invitation.first_name,
        last_name: invitation.last_name,
        occupation: invitation.occupation,
        language: invitation.language,
        prompt,
        invited_at: Utc::now(),
    };

    registry.put(interview.clone()).await?;
    info!(
        phone = %interview.phone_number,
        occupation = %interview.occupation,
        language = %interview.language,
        "Pending interview stored"
    );

    let body = invitation_sms_body(&interview.first_name, call_in_number);
    match sms.send_message(&interview.phone_number, &body).await {
        Ok(sent) => {
            info!(phone = %interview.phone_number, sid = %sent.sid, status = ?sent.status, "Invitation SMS sent");
            Ok(interview)
        }
        Err(e) => {
            warn!(phone = %interview.phone_number, "Invitation SMS failed; prompt kept");
            Err(AppError::Sms(e.to_string()))
        }
    }
}
