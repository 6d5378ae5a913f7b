//! Vendor clients: the only modules that talk to third-party services.
//!
//! Each capability sits behind a narrow trait carried in `AppState` as
//! `Arc<dyn _>`:
//! - `SmsSender`: Twilio Messages API
//! - `ConversationSource`: ElevenLabs Conversational AI conversations API
//! - `Mailer`: SMTP relay via lettre
//!
//! Calls are single-attempt. Retry policy, if ever needed, belongs in these
//! implementations and not at the call sites.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

pub mod elevenlabs;
pub mod mailer;
pub mod twilio;

pub use elevenlabs::{ConversationSource, ElevenLabsClient};
pub use mailer::{Mailer, OutgoingReport, SmtpMailer};
pub use twilio::{SmsSender, TwilioClient};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum VendorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub(crate) fn build_http_client() -> Result<Client, VendorError> {
    Ok(Client::builder().timeout(HTTP_TIMEOUT).build()?)
}

/// Reads a non-2xx response into `VendorError::Api`, using `extract` to pull
/// a readable message out of the vendor's error JSON when possible.
pub(crate) async fn api_error(
    response: reqwest::Response,
    extract: fn(&serde_json::Value) -> Option<String>,
) -> VendorError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .as_ref()
        .and_then(extract)
        .unwrap_or(body);
    VendorError::Api { status, message }
}

/// Strips a trailing slash so paths can be appended with `format!`.
pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
