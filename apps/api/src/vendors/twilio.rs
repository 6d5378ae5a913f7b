use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::vendors::{api_error, build_http_client, trim_base_url, VendorError};

/// Sends SMS messages to candidates.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_message(&self, to: &str, body: &str) -> Result<SentMessage, VendorError>;
}

/// The subset of Twilio's Message resource we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Twilio REST client for the Messages API.
#[derive(Clone)]
pub struct TwilioClient {
    client: Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioClient {
    pub fn new(
        base_url: &str,
        account_sid: String,
        auth_token: String,
        from_number: String,
    ) -> Result<Self, VendorError> {
        Ok(Self {
            client: build_http_client()?,
            base_url: trim_base_url(base_url),
            account_sid,
            auth_token,
            from_number,
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioClient {
    async fn send_message(&self, to: &str, body: &str) -> Result<SentMessage, VendorError> {
        let params = [("To", to), ("From", self.from_number.as_str()), ("Body", body)];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response, |v| {
                v.get("message").and_then(|m| m.as_str()).map(str::to_string)
            })
            .await);
        }

        let message: SentMessage = response.json().await?;
        debug!(sid = %message.sid, status = ?message.status, "Twilio accepted message");
        Ok(message)
    }
}
