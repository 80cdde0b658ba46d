use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::catalog::{CatalogEntry, CatalogUpdate, NewCatalogEntry, Platform};
use crate::models::provider::{NewProvider, Provider};
use crate::store::CatalogStore;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run pending migrations from the migrations/ directory.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    // -- Provider registry --

    async fn insert_provider(&self, provider: &NewProvider) -> anyhow::Result<Uuid> {
        provider.validate()?;
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO providers (name, api_url, api_key) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&provider.name)
        .bind(&provider.api_url)
        .bind(&provider.api_key)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn get_provider(&self, id: Uuid) -> anyhow::Result<Option<Provider>> {
        let row = sqlx::query_as::<_, Provider>(
            "SELECT id, name, api_url, api_key, is_active, created_at, updated_at FROM providers WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_providers(&self) -> anyhow::Result<Vec<Provider>> {
        let rows = sqlx::query_as::<_, Provider>(
            "SELECT id, name, api_url, api_key, is_active, created_at, updated_at FROM providers ORDER BY created_at ASC"
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_provider(
        &self,
        id: Uuid,
        provider: &NewProvider,
        is_active: bool,
    ) -> anyhow::Result<bool> {
        provider.validate()?;
        let result = sqlx::query(
            "UPDATE providers SET name = $2, api_url = $3, api_key = $4, is_active = $5, updated_at = NOW() WHERE id = $1"
        )
        .bind(id)
        .bind(&provider.name)
        .bind(&provider.api_url)
        .bind(&provider.api_key)
        .bind(is_active)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_provider(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM providers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- Platform taxonomy --

    async fn list_platforms(&self) -> anyhow::Result<Vec<Platform>> {
        let rows = sqlx::query_as::<_, Platform>(
            "SELECT id, name, slug, position FROM platforms ORDER BY position ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // -- Catalog entries --

    async fn find_by_external_id(
        &self,
        provider_name: &str,
        external_service_id: &str,
    ) -> anyhow::Result<Option<CatalogEntry>> {
        let row = sqlx::query_as::<_, CatalogEntry>(
            r#"SELECT id, name, description, price_cents, platform_id, category, service_type,
                      external_product_id, external_service_id, provider_name,
                      min_quantity, max_quantity, is_active, created_at, updated_at
               FROM services
               WHERE provider_name = $1 AND external_service_id = $2"#,
        )
        .bind(provider_name)
        .bind(external_service_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_entry(&self, entry: &NewCatalogEntry) -> anyhow::Result<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO services (name, description, price_cents, platform_id, category,
                                     service_type, external_product_id, external_service_id,
                                     provider_name, min_quantity, max_quantity, is_active)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
               RETURNING id"#,
        )
        .bind(&entry.name)
        .bind(&entry.description)
        .bind(entry.price_cents)
        .bind(entry.platform_id)
        .bind(&entry.category)
        .bind(&entry.service_type)
        .bind(entry.external_product_id)
        .bind(&entry.external_service_id)
        .bind(&entry.provider_name)
        .bind(entry.min_quantity)
        .bind(entry.max_quantity)
        .bind(entry.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update_entry(&self, id: Uuid, update: &CatalogUpdate) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE services SET name = $2, price_cents = $3, min_quantity = $4, max_quantity = $5, updated_at = NOW() WHERE id = $1"
        )
        .bind(id)
        .bind(&update.name)
        .bind(update.price_cents)
        .bind(update.min_quantity)
        .bind(update.max_quantity)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_entries_for_provider(&self, provider_name: &str) -> anyhow::Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM services WHERE provider_name = $1",
        )
        .bind(provider_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
