//! Transient shapes exchanged with a panel provider.
//!
//! Providers loosely vary field names and types (ids and rates arrive as
//! strings or numbers depending on the panel software), so everything here is
//! extracted leniently from raw JSON and every field beyond the service id is
//! optional. Validation of what is actually required happens in the
//! discovery and synchronization layers.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::models::catalog::Platform;

/// One sellable unit as reported by a provider. Produced fresh on every
/// discovery call; never persisted as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteService {
    /// Stable reconciliation key (the provider's `service` field, stringified).
    pub external_service_id: String,
    /// The provider's numeric id, when it was numeric.
    pub external_product_id: Option<i64>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub service_type: Option<String>,
    /// Decimal price string, e.g. `"10.80"`.
    pub rate: Option<String>,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl RemoteService {
    /// Lenient extraction from one element of the `services` response.
    /// Returns `None` when the record has no usable service id.
    pub fn from_value(v: &Value) -> Option<Self> {
        let id = v.get("service")?;
        let external_service_id = value_string(id)?;

        Some(Self {
            external_service_id,
            external_product_id: value_i64(id),
            name: v.get("name").and_then(value_string),
            category: v.get("category").and_then(value_string),
            service_type: v.get("type").and_then(value_string),
            rate: v.get("rate").and_then(value_string),
            min: v.get("min").and_then(value_i64),
            max: v.get("max").and_then(value_i64),
        })
    }
}

/// Provider account balance.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Balance {
    pub balance: String,
    pub currency: Option<String>,
}

impl Balance {
    pub fn from_value(v: &Value) -> Self {
        Self {
            balance: v
                .get("balance")
                .and_then(value_string)
                .unwrap_or_else(|| "0".to_string()),
            currency: v.get("currency").and_then(value_string),
        }
    }
}

/// The provider's view of a placed order. Relayed, not persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RemoteOrder {
    pub provider_order_id: String,
    pub status: Option<String>,
    pub charge: Option<String>,
    pub start_count: Option<i64>,
    pub remains: Option<i64>,
    pub currency: Option<String>,
}

impl RemoteOrder {
    pub fn from_value(provider_order_id: &str, v: &Value) -> Self {
        Self {
            provider_order_id: provider_order_id.to_string(),
            status: v.get("status").and_then(value_string),
            charge: v.get("charge").and_then(value_string),
            start_count: v.get("start_count").and_then(value_i64),
            remains: v.get("remains").and_then(value_i64),
            currency: v.get("currency").and_then(value_string),
        }
    }
}

// ── Synchronization reporting ─────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Imported,
    Updated,
    Skipped,
    Error,
}

/// One report line per remote service processed by a synchronization run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub external_service_id: String,
    pub name: String,
    pub status: ImportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ImportOutcome {
    pub fn imported(external_service_id: &str, name: &str) -> Self {
        Self::new(external_service_id, name, ImportStatus::Imported, None)
    }

    pub fn updated(external_service_id: &str, name: &str) -> Self {
        Self::new(external_service_id, name, ImportStatus::Updated, None)
    }

    pub fn skipped(external_service_id: &str, name: &str, reason: &str) -> Self {
        Self::new(
            external_service_id,
            name,
            ImportStatus::Skipped,
            Some(reason.to_string()),
        )
    }

    pub fn error(external_service_id: &str, name: &str, reason: String) -> Self {
        Self::new(external_service_id, name, ImportStatus::Error, Some(reason))
    }

    fn new(
        external_service_id: &str,
        name: &str,
        status: ImportStatus,
        reason: Option<String>,
    ) -> Self {
        Self {
            external_service_id: external_service_id.to_string(),
            name: name.to_string(),
            status,
            reason,
        }
    }
}

/// Result of one synchronization run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub imported_count: usize,
    pub results: Vec<ImportOutcome>,
}

/// A discovered service normalized for presentation to the admin surface.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedService {
    pub id: String,
    pub name: String,
    pub rate: f64,
    pub min: i64,
    pub max: i64,
    #[serde(rename = "type")]
    pub service_type: String,
    pub category: String,
}

/// Discovery output: services grouped by category plus the platform list,
/// for the admin surface to render. Nothing here is persisted.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoverReport {
    pub services_by_category: BTreeMap<String, Vec<GroupedService>>,
    pub platforms: Vec<Platform>,
}

// ── Lenient JSON field extraction ─────────────────────────────

/// String or number → owned string. Empty strings count as absent.
pub(crate) fn value_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Number or numeric string → i64.
pub(crate) fn value_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────
