pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::catalog::{CatalogEntry, CatalogUpdate, NewCatalogEntry, Platform};
use crate::models::provider::{NewProvider, Provider};

/// Persistence seam for the synchronizer and the provider registry.
/// Implementations: PgStore (Postgres), MemoryStore (tests and disconnected
/// runs).
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // -- Provider registry --

    async fn insert_provider(&self, provider: &NewProvider) -> anyhow::Result<Uuid>;
    async fn get_provider(&self, id: Uuid) -> anyhow::Result<Option<Provider>>;
    async fn list_providers(&self) -> anyhow::Result<Vec<Provider>>;
    async fn update_provider(
        &self,
        id: Uuid,
        provider: &NewProvider,
        is_active: bool,
    ) -> anyhow::Result<bool>;
    async fn delete_provider(&self, id: Uuid) -> anyhow::Result<bool>;

    // -- Platform taxonomy --

    /// Platforms in registration order. The matcher scans this list front to
    /// back, so the order is load-bearing.
    async fn list_platforms(&self) -> anyhow::Result<Vec<Platform>>;

    // -- Catalog entries --

    async fn find_by_external_id(
        &self,
        provider_name: &str,
        external_service_id: &str,
    ) -> anyhow::Result<Option<CatalogEntry>>;
    async fn insert_entry(&self, entry: &NewCatalogEntry) -> anyhow::Result<Uuid>;
    async fn update_entry(&self, id: Uuid, update: &CatalogUpdate) -> anyhow::Result<bool>;
    async fn count_entries_for_provider(&self, provider_name: &str) -> anyhow::Result<i64>;
}
