//! ElevenLabs Conversational AI: conversation listing and detail retrieval.
//!
//! Payload types are tolerant: every field the report does not strictly need
//! is defaulted, so vendor schema additions or omissions never fail a report.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::vendors::{api_error, build_http_client, trim_base_url, VendorError};

/// Status the vendor assigns to a finished, fully processed conversation.
pub const STATUS_DONE: &str = "done";

#[async_trait]
pub trait ConversationSource: Send + Sync {
    async fn list_conversations(
        &self,
        page_size: u32,
    ) -> Result<Vec<ConversationSummary>, VendorError>;

    async fn get_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationDetail, VendorError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Payload types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationList {
    #[serde(default)]
    pub conversations: Vec<ConversationSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationSummary {
    pub conversation_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start_time_unix_secs: Option<i64>,
    #[serde(default)]
    pub metadata: Option<ConversationMetadata>,
}

impl ConversationSummary {
    /// Start time from the top-level field or nested metadata; 0 when absent.
    pub fn start_time(&self) -> i64 {
        self.start_time_unix_secs
            .or_else(|| self.metadata.as_ref().and_then(|m| m.start_time_unix_secs))
            .unwrap_or(0)
    }

    pub fn is_done(&self) -> bool {
        self.status == STATUS_DONE
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationDetail {
    pub conversation_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub transcript: Vec<TranscriptTurn>,
    #[serde(default)]
    pub metadata: ConversationMetadata,
    #[serde(default)]
    pub analysis: ConversationAnalysis,
}

impl ConversationDetail {
    /// The candidate's phone number as seen by the telephony leg of the call.
    pub fn phone_number(&self) -> Option<&str> {
        self.metadata
            .phone_call
            .as_ref()
            .and_then(|p| p.external_number.as_deref())
            .filter(|n| !n.trim().is_empty())
            .or_else(|| {
                self.metadata
                    .phone_number
                    .as_deref()
                    .filter(|n| !n.trim().is_empty())
            })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptTurn {
    pub role: String,
    /// Null for tool-call turns.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationMetadata {
    #[serde(default)]
    pub start_time_unix_secs: Option<i64>,
    #[serde(default)]
    pub phone_call: Option<PhoneCall>,
    #[serde(default, rename = "phoneNumber")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhoneCall {
    #[serde(default)]
    pub external_number: Option<String>,
    #[serde(default)]
    pub call_sid: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationAnalysis {
    #[serde(default)]
    pub transcript_summary: Option<String>,
    #[serde(default)]
    pub data_collection_results: HashMap<String, DataCollectionResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataCollectionResult {
    #[serde(default)]
    pub value: Value,
}

impl ConversationAnalysis {
    /// Extracted answers keyed by field id, rendered as display strings.
    /// Null and blank values are omitted so the report shows an empty cell.
    pub fn extracted_answers(&self) -> HashMap<String, String> {
        self.data_collection_results
            .iter()
            .filter_map(|(field_id, result)| {
                display_value(&result.value).map(|v| (field_id.clone(), v))
            })
            .collect()
    }
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Bool(true) => Some("Yes".to_string()),
        Value::Bool(false) => Some("No".to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ElevenLabsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ElevenLabsClient {
    pub fn new(base_url: &str, api_key: String) -> Result<Self, VendorError> {
        Ok(Self {
            client: build_http_client()?,
            base_url: trim_base_url(base_url),
            api_key,
        })
    }

    fn conversations_url(&self) -> String {
        format!("{}/v1/convai/conversations", self.base_url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, VendorError> {
        let response = request.header("xi-api-key", &self.api_key).send().await?;

        if !response.status().is_success() {
            return Err(api_error(response, extract_detail).await);
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// ElevenLabs errors look like `{"detail": "..."}` or `{"detail": {"message": "..."}}`.
fn extract_detail(v: &Value) -> Option<String> {
    let detail = v.get("detail")?;
    detail
        .as_str()
        .map(str::to_string)
        .or_else(|| detail.get("message").and_then(|m| m.as_str()).map(str::to_string))
}

#[async_trait]
impl ConversationSource for ElevenLabsClient {
    async fn list_conversations(
        &self,
        page_size: u32,
    ) -> Result<Vec<ConversationSummary>, VendorError> {
        let request = self
            .client
            .get(self.conversations_url())
            .query(&[("page_size", page_size)]);
        let list: ConversationList = self.get_json(request).await?;
        debug!(count = list.conversations.len(), "Listed conversations");
        Ok(list.conversations)
    }

    async fn get_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationDetail, VendorError> {
        let request = self
            .client
            .get(format!("{}/{}", self.conversations_url(), conversation_id));
        self.get_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_list_conversations_sends_key_and_page_size() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/convai/conversations")
            .match_query(Matcher::UrlEncoded("page_size".to_string(), "10".to_string()))
            .match_header("xi-api-key", "xi-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "conversations": [
                        {"agent_id": "a", "conversation_id": "c1", "status": "done", "start_time_unix_secs": 100},
                        {"agent_id": "a", "conversation_id": "c2", "status": "processing", "start_time_unix_secs": 200}
                    ],
                    "has_more": false
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ElevenLabsClient::new(&server.url(), "xi-test".to_string()).unwrap();
        let list = client.list_conversations(10).await.unwrap();

        assert_eq!(list.len(), 2);
        assert!(list[0].is_done());
        assert_eq!(list[1].start_time(), 200);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_conversation_parses_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/convai/conversations/c1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "conversation_id": "c1",
                    "status": "done",
                    "transcript": [
                        {"role": "agent", "message": "Hi", "time_in_call_secs": 0},
                        {"role": "user", "message": null, "time_in_call_secs": 2},
                        {"role": "user", "message": "Hello", "time_in_call_secs": 3}
                    ],
                    "metadata": {
                        "start_time_unix_secs": 1700000000,
                        "phone_call": {"type": "twilio", "external_number": "+15550001111", "call_sid": "CA1"}
                    },
                    "analysis": {
                        "transcript_summary": "Good fit",
                        "data_collection_results": {
                            "years_experience_total": {"data_collection_id": "years_experience_total", "value": "5 years"},
                            "tools_owned": {"data_collection_id": "tools_owned", "value": true},
                            "license_status": {"data_collection_id": "license_status", "value": null}
                        }
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ElevenLabsClient::new(&server.url(), "xi-test".to_string()).unwrap();
        let detail = client.get_conversation("c1").await.unwrap();

        assert_eq!(detail.transcript.len(), 3);
        assert_eq!(detail.phone_number(), Some("+15550001111"));
        assert_eq!(detail.analysis.transcript_summary.as_deref(), Some("Good fit"));

        let answers = detail.analysis.extracted_answers();
        assert_eq!(answers.get("years_experience_total").map(String::as_str), Some("5 years"));
        assert_eq!(answers.get("tools_owned").map(String::as_str), Some("Yes"));
        assert!(!answers.contains_key("license_status"));
    }

    #[tokio::test]
    async fn test_error_detail_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/convai/conversations/missing")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail":{"status":"not_found","message":"Conversation not found"}}"#)
            .create_async()
            .await;

        let client = ElevenLabsClient::new(&server.url(), "xi-test".to_string()).unwrap();
        let err = client.get_conversation("missing").await.unwrap_err();
        assert!(
            matches!(err, VendorError::Api { status: 404, ref message } if message == "Conversation not found")
        );
    }

    #[test]
    fn test_start_time_falls_back_to_metadata_then_zero() {
        let nested: ConversationSummary = serde_json::from_value(json!({
            "conversation_id": "c", "status": "done", "metadata": {"start_time_unix_secs": 42}
        }))
        .unwrap();
        assert_eq!(nested.start_time(), 42);

        let bare: ConversationSummary =
            serde_json::from_value(json!({"conversation_id": "c"})).unwrap();
        assert_eq!(bare.start_time(), 0);
        assert!(!bare.is_done());
    }

    #[test]
    fn test_phone_number_falls_back_to_legacy_field() {
        let detail: ConversationDetail = serde_json::from_value(json!({
            "conversation_id": "c", "metadata": {"phoneNumber": "+1999"}
        }))
        .unwrap();
        assert_eq!(detail.phone_number(), Some("+1999"));

        let blank_external: ConversationDetail = serde_json::from_value(json!({
            "conversation_id": "c",
            "metadata": {"phone_call": {"external_number": ""}, "phoneNumber": "+1999"}
        }))
        .unwrap();
        assert_eq!(blank_external.phone_number(), Some("+1999"));
    }
}
