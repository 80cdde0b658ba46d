//! In-memory catalog store.
//!
//! Backs the test suite and disconnected development runs (mock provider +
//! memory store = fully offline end-to-end sync). Supports injecting a
//! failure for a specific external service id so per-item error containment
//! can be exercised deterministically.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::catalog::{CatalogEntry, CatalogUpdate, NewCatalogEntry, Platform};
use crate::models::provider::{NewProvider, Provider};
use crate::store::CatalogStore;

#[derive(Default)]
struct Inner {
    providers: Vec<Provider>,
    platforms: Vec<Platform>,
    entries: Vec<CatalogEntry>,
    fail_external_ids: HashSet<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a platform; registration order is the matcher's scan order.
    pub fn seed_platform(&self, name: &str) -> Uuid {
        let mut inner = self.inner.lock().unwrap();
        let id = Uuid::new_v4();
        let position = inner.platforms.len() as i32 + 1;
        inner.platforms.push(Platform {
            id,
            name: name.to_string(),
            slug: name.to_lowercase(),
            position,
        });
        id
    }

    /// Make every write for this external service id fail.
    pub fn fail_on_external_id(&self, external_service_id: &str) {
        self.inner
            .lock()
            .unwrap()
            .fail_external_ids
            .insert(external_service_id.to_string());
    }

    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.inner.lock().unwrap().entries.clone()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_provider(&self, provider: &NewProvider) -> anyhow::Result<Uuid> {
        provider.validate()?;
        let mut inner = self.inner.lock().unwrap();
        let id = Uuid::new_v4();
        let now = Utc::now();
        inner.providers.push(Provider {
            id,
            name: provider.name.clone(),
            api_url: provider.api_url.clone(),
            api_key: provider.api_key.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn get_provider(&self, id: Uuid) -> anyhow::Result<Option<Provider>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.providers.iter().find(|p| p.id == id).cloned())
    }

    async fn list_providers(&self) -> anyhow::Result<Vec<Provider>> {
        Ok(self.inner.lock().unwrap().providers.clone())
    }

    async fn update_provider(
        &self,
        id: Uuid,
        provider: &NewProvider,
        is_active: bool,
    ) -> anyhow::Result<bool> {
        provider.validate()?;
        let mut inner = self.inner.lock().unwrap();
        match inner.providers.iter_mut().find(|p| p.id == id) {
            Some(p) => {
                p.name = provider.name.clone();
                p.api_url = provider.api_url.clone();
                p.api_key = provider.api_key.clone();
                p.is_active = is_active;
                p.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_provider(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.providers.len();
        inner.providers.retain(|p| p.id != id);
        Ok(inner.providers.len() < before)
    }

    async fn list_platforms(&self) -> anyhow::Result<Vec<Platform>> {
        Ok(self.inner.lock().unwrap().platforms.clone())
    }

    async fn find_by_external_id(
        &self,
        provider_name: &str,
        external_service_id: &str,
    ) -> anyhow::Result<Option<CatalogEntry>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .entries
            .iter()
            .find(|e| {
                e.provider_name.as_deref() == Some(provider_name)
                    && e.external_service_id.as_deref() == Some(external_service_id)
            })
            .cloned())
    }

    async fn insert_entry(&self, entry: &NewCatalogEntry) -> anyhow::Result<Uuid> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_external_ids.contains(&entry.external_service_id) {
            anyhow::bail!("injected store failure for service {}", entry.external_service_id);
        }

        // Uphold the reconciliation-key uniqueness the partial index enforces
        // in Postgres.
        let duplicate = inner.entries.iter().any(|e| {
            e.provider_name.as_deref() == Some(entry.provider_name.as_str())
                && e.external_service_id.as_deref() == Some(entry.external_service_id.as_str())
        });
        if duplicate {
            anyhow::bail!(
                "duplicate entry for provider {} service {}",
                entry.provider_name,
                entry.external_service_id
            );
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        inner.entries.push(CatalogEntry {
            id,
            name: entry.name.clone(),
            description: entry.description.clone(),
            price_cents: entry.price_cents,
            platform_id: entry.platform_id,
            category: entry.category.clone(),
            service_type: entry.service_type.clone(),
            external_product_id: entry.external_product_id,
            external_service_id: Some(entry.external_service_id.clone()),
            provider_name: Some(entry.provider_name.clone()),
            min_quantity: entry.min_quantity,
            max_quantity: entry.max_quantity,
            is_active: entry.is_active,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn update_entry(&self, id: Uuid, update: &CatalogUpdate) -> anyhow::Result<bool> {
        let mut inner = self.inner.lock().unwrap();

        let blocked = inner
            .entries
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.external_service_id.clone())
            .is_some_and(|ext| inner.fail_external_ids.contains(&ext));
        if blocked {
            anyhow::bail!("injected store failure for entry {id}");
        }

        match inner.entries.iter_mut().find(|e| e.id == id) {
            Some(e) => {
                e.name = update.name.clone();
                e.price_cents = update.price_cents;
                e.min_quantity = update.min_quantity;
                e.max_quantity = update.max_quantity;
                e.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_entries_for_provider(&self, provider_name: &str) -> anyhow::Result<i64> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .entries
            .iter()
            .filter(|e| e.provider_name.as_deref() == Some(provider_name))
            .count() as i64)
    }
}
