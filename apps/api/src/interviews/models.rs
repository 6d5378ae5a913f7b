use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Language used when the invitation does not specify one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Links a phone number to the candidate and the prompt composed for them.
///
/// Written once per invitation and read by the prompt-fetch webhook and the
/// report generator. A second invitation to the same number replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInterview {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub occupation: String,
    pub language: String,
    pub prompt: String,
    pub invited_at: DateTime<Utc>,
}

/// Normalizes an optional language code, falling back to English.
pub fn normalize_language(language: Option<&str>) -> String {
    language
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| l.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}
