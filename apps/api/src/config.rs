use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.us.elevenlabs.io";
pub const DEFAULT_TWILIO_BASE_URL: &str = "https://api.twilio.com";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// What the prompt-fetch webhook does when the caller has no pending interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownCallerPolicy {
    /// Respond 404 and let the voice platform end the call.
    NotFound,
    /// Respond 200 with the generic default recruiter persona.
    Fallback,
}

impl FromStr for UnknownCallerPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "not_found" | "404" => Ok(UnknownCallerPolicy::NotFound),
            "fallback" => Ok(UnknownCallerPolicy::Fallback),
            other => bail!("unknown caller policy '{other}' (expected 'not_found' or 'fallback')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub elevenlabs_api_key: String,
    pub elevenlabs_base_url: String,
    pub conversation_page_size: u32,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
    pub twilio_base_url: String,
    pub email_user: String,
    pub email_pass: String,
    pub email_to: String,
    pub smtp_host: String,
    pub port: u16,
    pub rust_log: String,
    pub report_delay_secs: u64,
    pub report_dir: PathBuf,
    pub include_questionnaire: bool,
    pub unknown_caller_policy: UnknownCallerPolicy,
    /// When set, pending interviews live in Redis instead of process memory.
    pub redis_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            elevenlabs_api_key: require_env("ELEVENLABS_API_KEY")?,
            elevenlabs_base_url: env_or("ELEVENLABS_BASE_URL", DEFAULT_ELEVENLABS_BASE_URL),
            conversation_page_size: parse_env("CONVERSATION_PAGE_SIZE", 10)?,
            twilio_account_sid: require_env("TWILIO_ACCOUNT_SID")?,
            twilio_auth_token: require_env("TWILIO_AUTH_TOKEN")?,
            twilio_phone_number: require_env("TWILIO_PHONE_NUMBER")?,
            twilio_base_url: env_or("TWILIO_BASE_URL", DEFAULT_TWILIO_BASE_URL),
            email_user: require_env("EMAIL_USER")?,
            email_pass: require_env("EMAIL_PASS")?,
            email_to: require_env("EMAIL_TO")?,
            smtp_host: env_or("SMTP_HOST", DEFAULT_SMTP_HOST),
            port: parse_env("PORT", 3001).context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            report_delay_secs: parse_env("REPORT_DELAY_SECS", 20)?,
            report_dir: std::env::var("REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            include_questionnaire: parse_bool(
                "INCLUDE_QUESTIONNAIRE",
                std::env::var("INCLUDE_QUESTIONNAIRE").ok().as_deref(),
                true,
            )?,
            unknown_caller_policy: std::env::var("UNKNOWN_CALLER_POLICY")
                .ok()
                .map(|v| v.parse::<UnknownCallerPolicy>())
                .transpose()
                .context("UNKNOWN_CALLER_POLICY is invalid")?
                .unwrap_or(UnknownCallerPolicy::NotFound),
            redis_url: std::env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
        })
    }
}

#[cfg(test)]
impl Config {
    /// Fixed configuration for handler tests; never touches the environment.
    pub fn for_tests() -> Self {
        Config {
            elevenlabs_api_key: "test-key".to_string(),
            elevenlabs_base_url: DEFAULT_ELEVENLABS_BASE_URL.to_string(),
            conversation_page_size: 10,
            twilio_account_sid: "ACtest".to_string(),
            twilio_auth_token: "token".to_string(),
            twilio_phone_number: "+15557654321".to_string(),
            twilio_base_url: DEFAULT_TWILIO_BASE_URL.to_string(),
            email_user: "reports@example.com".to_string(),
            email_pass: "secret".to_string(),
            email_to: "hiring@example.com".to_string(),
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            port: 3001,
            rust_log: "info".to_string(),
            report_delay_secs: 20,
            report_dir: std::env::temp_dir(),
            include_questionnaire: true,
            unknown_caller_policy: UnknownCallerPolicy::NotFound,
            redis_url: None,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} has invalid value '{raw}': {e}")),
        Err(_) => Ok(default),
    }
}

fn parse_bool(key: &str, raw: Option<&str>, default: bool) -> Result<bool> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{key} must be a boolean, got '{other}'"),
    }
}
