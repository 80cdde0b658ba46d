//! Synchronization engine facade.
//!
//! The narrow, typed surface the rest of the platform consumes: discovery
//! with grouping, catalog synchronization, connection testing and balance.
//! An admin HTTP layer (or the bundled CLI) calls this; nothing below it
//! knows how it was invoked.

pub mod classify;
pub mod discovery;
pub mod engine;

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::errors::{AppError, PanelError};
use crate::models::provider::Provider;
use crate::models::remote::{Balance, DiscoverReport, RemoteService, SyncReport};
use crate::panel::{Mode, PanelClient};
use crate::store::CatalogStore;

pub struct SyncEngine {
    store: Arc<dyn CatalogStore>,
    /// Forces every client into a mode (config-driven); `None` means
    /// auto-detect test credentials per provider.
    mode_override: Option<Mode>,
    /// Per-provider run serialization. Two concurrent syncs for the same
    /// provider would both see "not found" for the same external id and both
    /// insert, breaking the at-most-one-entry invariant.
    locks: DashMap<Uuid, Arc<tokio::sync::Mutex<()>>>,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            mode_override: None,
            locks: DashMap::new(),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode_override = Some(mode);
        self
    }

    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    /// Fetch and validate the provider's current catalog.
    pub async fn discover(&self, provider_id: Uuid) -> Result<Vec<RemoteService>, AppError> {
        let provider = self.resolve_provider(provider_id).await?;
        let client = self.client_for(&provider)?;
        Ok(discovery::usable(client.services().await?))
    }

    /// Discovery plus category grouping and the platform list, shaped for
    /// the admin surface.
    pub async fn discover_and_group(&self, provider_id: Uuid) -> Result<DiscoverReport, AppError> {
        let services = self.discover(provider_id).await?;
        let platforms = self.store.list_platforms().await?;
        Ok(DiscoverReport {
            services_by_category: discovery::group_by_category(&services),
            platforms,
        })
    }

    /// Run a synchronization for one provider. `selected_ids` restricts the
    /// run to those external service ids; `platform_overrides` maps external
    /// service ids to admin-chosen platforms, beating the name heuristic.
    ///
    /// Runs for the same provider are serialized; a run for provider A never
    /// waits on provider B.
    pub async fn synchronize(
        &self,
        provider_id: Uuid,
        selected_ids: Option<&[String]>,
        platform_overrides: &HashMap<String, Uuid>,
    ) -> Result<SyncReport, AppError> {
        let provider = self.resolve_provider(provider_id).await?;

        let lock = self.provider_lock(provider_id);
        let _guard = lock.lock().await;

        let client = self.client_for(&provider)?;
        let mut services = discovery::usable(client.services().await?);
        if let Some(ids) = selected_ids {
            services.retain(|s| ids.contains(&s.external_service_id));
        }

        tracing::info!(
            provider = %provider.name,
            mode = ?client.mode(),
            candidates = services.len(),
            "starting synchronization run"
        );

        engine::run_sync(self.store.as_ref(), &provider, &services, platform_overrides).await
    }

    /// Provider account balance.
    pub async fn balance(&self, provider_id: Uuid) -> Result<Balance, AppError> {
        let provider = self.resolve_provider(provider_id).await?;
        Ok(self.client_for(&provider)?.balance().await?)
    }

    /// Probe unsaved credentials by listing their services. Used by the
    /// admin surface before a provider is registered.
    pub async fn test_connection(
        &self,
        api_url: &str,
        api_key: &str,
    ) -> Result<Vec<RemoteService>, PanelError> {
        let mode = self
            .mode_override
            .unwrap_or_else(|| Mode::detect(api_url, api_key));
        let client = PanelClient::new(api_url, api_key, mode)?;
        client.services().await
    }

    /// A protocol client for ad-hoc use (the order lifecycle manager).
    pub async fn client(&self, provider_id: Uuid) -> Result<PanelClient, AppError> {
        let provider = self.resolve_provider(provider_id).await?;
        Ok(self.client_for(&provider)?)
    }

    async fn resolve_provider(&self, provider_id: Uuid) -> Result<Provider, AppError> {
        let provider = self
            .store
            .get_provider(provider_id)
            .await?
            .ok_or(AppError::ProviderNotFound)?;
        if !provider.is_active {
            return Err(AppError::ProviderDisabled);
        }
        Ok(provider)
    }

    fn client_for(&self, provider: &Provider) -> Result<PanelClient, PanelError> {
        PanelClient::for_provider(provider, self.mode_override)
    }

    fn provider_lock(&self, provider_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .entry(provider_id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}
