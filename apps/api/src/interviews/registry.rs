//! Pending-interview registry: phone number → `PendingInterview`.
//!
//! `AppState` holds an `Arc<dyn InterviewRegistry>`:
//! - `InMemoryRegistry` (default): process-lifetime only, lost on restart.
//! - `RedisRegistry`: selected when `REDIS_URL` is set, so several instances
//!   behind one webhook URL see the same invitations.
//!
//! Writes are whole-record replacements; last write wins.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::interviews::models::PendingInterview;

const REDIS_KEY_PREFIX: &str = "callscreen:interview:";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Corrupt registry record: {0}")]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait InterviewRegistry: Send + Sync {
    /// Stores the record under its phone number, replacing any previous one.
    async fn put(&self, interview: PendingInterview) -> Result<(), RegistryError>;

    async fn get(&self, phone_number: &str) -> Result<Option<PendingInterview>, RegistryError>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryRegistry {
    records: RwLock<HashMap<String, PendingInterview>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl InterviewRegistry for InMemoryRegistry {
    async fn put(&self, interview: PendingInterview) -> Result<(), RegistryError> {
        self.records
            .write()
            .await
            .insert(interview.phone_number.clone(), interview);
        Ok(())
    }

    async fn get(&self, phone_number: &str) -> Result<Option<PendingInterview>, RegistryError> {
        Ok(self.records.read().await.get(phone_number).cloned())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis backend
// ────────────────────────────────────────────────────────────────────────────

/// Stores each record as a JSON string at `callscreen:interview:<phone>`. No TTL.
pub struct RedisRegistry {
    conn: MultiplexedConnection,
}

impl RedisRegistry {
    pub async fn connect(redis_url: &str) -> Result<Self, RegistryError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis interview registry connected");
        Ok(Self { conn })
    }
}

fn redis_key(phone_number: &str) -> String {
    format!("{REDIS_KEY_PREFIX}{phone_number}")
}

#[async_trait]
impl InterviewRegistry for RedisRegistry {
    async fn put(&self, interview: PendingInterview) -> Result<(), RegistryError> {
        let payload = serde_json::to_string(&interview)?;
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(redis_key(&interview.phone_number), payload)
            .await?;
        Ok(())
    }

    async fn get(&self, phone_number: &str) -> Result<Option<PendingInterview>, RegistryError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn.get(redis_key(phone_number)).await?;
        payload
            .map(|p| serde_json::from_str(&p))
            .transpose()
            .map_err(RegistryError::from)
    }
}
