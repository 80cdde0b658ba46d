use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform taxonomy entry. Read-only input to classification; `position`
/// is the registration order the platform matcher scans in.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Platform {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub position: i32,
}

/// A persisted catalog product, optionally linked to a provider service via
/// `external_service_id`. At most one linked entry exists per
/// (provider_name, external_service_id) pair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub platform_id: Uuid,
    pub category: String,
    pub service_type: String,
    pub external_product_id: Option<i64>,
    pub external_service_id: Option<String>,
    pub provider_name: Option<String>,
    pub min_quantity: i64,
    pub max_quantity: i64,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Insert payload produced by the synchronizer on first import.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCatalogEntry {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub platform_id: Uuid,
    pub category: String,
    pub service_type: String,
    pub external_product_id: Option<i64>,
    pub external_service_id: String,
    pub provider_name: String,
    pub min_quantity: i64,
    pub max_quantity: i64,
    pub is_active: bool,
}

/// The only fields a re-sync may overwrite on an existing entry. Category,
/// platform and active flag are set once at import and then left alone so
/// manual admin corrections survive later runs.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogUpdate {
    pub name: String,
    pub price_cents: i64,
    pub min_quantity: i64,
    pub max_quantity: i64,
}
