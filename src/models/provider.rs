use anyhow::Context;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered third-party SMM panel (key-action HTTP API reseller).
///
/// Referenced, never mutated, by the protocol client; created and updated
/// only by admin action through the store.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Provider {
    pub id: Uuid,
    pub name: String,
    pub api_url: String,
    pub api_key: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Payload for registering or updating a provider.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProvider {
    pub name: String,
    pub api_url: String,
    pub api_key: String,
}

impl NewProvider {
    /// Soft validation: all three fields non-empty, URL well-formed.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.name.trim().is_empty(), "provider name is empty");
        anyhow::ensure!(!self.api_key.trim().is_empty(), "provider API key is empty");
        url::Url::parse(&self.api_url)
            .with_context(|| format!("invalid provider API URL: {:?}", self.api_url))?;
        Ok(())
    }
}
