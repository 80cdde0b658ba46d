//! The idempotent upsert core.
//!
//! Reconciliation is split into a pure planning step (`plan_service`) over an
//! immutable snapshot and a sequential application step (`run_sync`). The
//! planner is unit-testable without a store; the applier owns the per-item
//! failure containment: one bad service never blocks the rest of the batch.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::catalog::{CatalogEntry, CatalogUpdate, NewCatalogEntry, Platform};
use crate::models::provider::Provider;
use crate::models::remote::{ImportOutcome, ImportStatus, RemoteService, SyncReport};
use crate::store::CatalogStore;
use crate::sync::classify;

pub(crate) const DEFAULT_MIN_QUANTITY: i64 = 1;
pub(crate) const DEFAULT_MAX_QUANTITY: i64 = 10_000;

/// Decimal rate string → integer cents, rounding halves away from zero:
/// "10.80" → 1080, "5.005" → 501.
pub fn rate_to_cents(rate: &str) -> Option<i64> {
    let d = Decimal::from_str(rate.trim()).ok()?;
    (d * Decimal::from(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// What the planner decided for one remote service.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Skip(&'static str),
    Insert(NewCatalogEntry),
    Update { entry_id: Uuid, update: CatalogUpdate },
}

/// Pure reconciliation decision for one service against a snapshot of local
/// state. Checks run in contract order: required fields, then platform
/// resolution (explicit override beats the heuristic), then the existing
/// entry lookup result.
pub fn plan_service(
    provider: &Provider,
    platforms: &[Platform],
    svc: &RemoteService,
    existing: Option<&CatalogEntry>,
    platform_override: Option<Uuid>,
) -> Plan {
    let (name, rate) = match (&svc.name, &svc.rate) {
        (Some(n), Some(r)) if !n.trim().is_empty() && !r.trim().is_empty() => (n, r),
        _ => return Plan::Skip("Missing required fields"),
    };

    let platform_id = platform_override
        .or_else(|| classify::match_platform(platforms, name).map(|p| p.id));
    let Some(platform_id) = platform_id else {
        return Plan::Skip("No matching platform found");
    };

    let Some(price_cents) = rate_to_cents(rate) else {
        return Plan::Skip("Invalid rate");
    };

    if let Some(entry) = existing {
        return Plan::Update {
            entry_id: entry.id,
            update: CatalogUpdate {
                name: name.clone(),
                price_cents,
                min_quantity: svc.min.unwrap_or(DEFAULT_MIN_QUANTITY),
                max_quantity: svc.max.unwrap_or(DEFAULT_MAX_QUANTITY),
            },
        };
    }

    Plan::Insert(NewCatalogEntry {
        name: name.clone(),
        description: String::new(),
        price_cents,
        platform_id,
        category: classify::classify_category(name).as_str().to_string(),
        service_type: svc
            .service_type
            .clone()
            .unwrap_or_else(|| "Default".to_string()),
        external_product_id: svc.external_product_id,
        external_service_id: svc.external_service_id.clone(),
        provider_name: provider.name.clone(),
        min_quantity: svc.min.unwrap_or(DEFAULT_MIN_QUANTITY),
        max_quantity: svc.max.unwrap_or(DEFAULT_MAX_QUANTITY),
        is_active: true,
    })
}

/// Apply a synchronization batch strictly sequentially. Store failures for
/// an individual service are recorded, never propagated; a partial run is
/// safe to re-run thanks to the idempotent upsert keying.
pub async fn run_sync(
    store: &dyn CatalogStore,
    provider: &Provider,
    services: &[RemoteService],
    platform_overrides: &HashMap<String, Uuid>,
) -> Result<SyncReport, AppError> {
    let platforms = store.list_platforms().await?;

    let mut results = Vec::with_capacity(services.len());
    for svc in services {
        let outcome = sync_one(store, provider, &platforms, svc, platform_overrides).await;
        results.push(outcome);
    }

    let imported_count = results
        .iter()
        .filter(|o| o.status == ImportStatus::Imported)
        .count();

    tracing::info!(
        provider = %provider.name,
        total = results.len(),
        imported = imported_count,
        "synchronization run finished"
    );

    Ok(SyncReport {
        imported_count,
        results,
    })
}

async fn sync_one(
    store: &dyn CatalogStore,
    provider: &Provider,
    platforms: &[Platform],
    svc: &RemoteService,
    platform_overrides: &HashMap<String, Uuid>,
) -> ImportOutcome {
    let id = svc.external_service_id.as_str();
    let display = svc.name.clone().unwrap_or_default();

    let existing = match store.find_by_external_id(&provider.name, id).await {
        Ok(entry) => entry,
        Err(e) => {
            tracing::warn!(provider = %provider.name, service = id, error = %e, "lookup failed");
            return ImportOutcome::error(id, &display, e.to_string());
        }
    };

    let override_id = platform_overrides.get(id).copied();
    match plan_service(provider, platforms, svc, existing.as_ref(), override_id) {
        Plan::Skip(reason) => ImportOutcome::skipped(id, &display, reason),
        Plan::Insert(entry) => match store.insert_entry(&entry).await {
            Ok(_) => ImportOutcome::imported(id, &display),
            Err(e) => {
                tracing::warn!(provider = %provider.name, service = id, error = %e, "insert failed");
                ImportOutcome::error(id, &display, e.to_string())
            }
        },
        Plan::Update { entry_id, update } => match store.update_entry(entry_id, &update).await {
            Ok(_) => ImportOutcome::updated(id, &display),
            Err(e) => {
                tracing::warn!(provider = %provider.name, service = id, error = %e, "update failed");
                ImportOutcome::error(id, &display, e.to_string())
            }
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn provider() -> Provider {
        Provider {
            id: Uuid::new_v4(),
            name: "mockpanel".to_string(),
            api_url: "https://testing.example/api/v2".to_string(),
            api_key: "test-key".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn platform(name: &str, position: i32) -> Platform {
        Platform {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            position,
        }
    }

    fn service(id: &str, name: &str, rate: &str) -> RemoteService {
        RemoteService {
            external_service_id: id.to_string(),
            external_product_id: id.parse().ok(),
            name: Some(name.to_string()),
            category: None,
            service_type: Some("Default".to_string()),
            rate: Some(rate.to_string()),
            min: Some(10),
            max: Some(10_000),
        }
    }

    fn entry_for(platform_id: Uuid, external_id: &str) -> CatalogEntry {
        CatalogEntry {
            id: Uuid::new_v4(),
            name: "old name".to_string(),
            description: String::new(),
            price_cents: 1,
            platform_id,
            category: "followers".to_string(),
            service_type: "Default".to_string(),
            external_product_id: None,
            external_service_id: Some(external_id.to_string()),
            provider_name: Some("mockpanel".to_string()),
            min_quantity: 1,
            max_quantity: 100,
            is_active: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_rate_to_cents_plain() {
        assert_eq!(rate_to_cents("10.80"), Some(1080));
        assert_eq!(rate_to_cents("0"), Some(0));
        assert_eq!(rate_to_cents(" 2.5 "), Some(250));
    }

    /// Rounding rule is half-away-from-zero, pinned here.
    #[test]
    fn test_rate_to_cents_rounds_half_up() {
        assert_eq!(rate_to_cents("5.005"), Some(501));
        assert_eq!(rate_to_cents("5.004"), Some(500));
    }

    #[test]
    fn test_rate_to_cents_rejects_garbage() {
        assert_eq!(rate_to_cents("abc"), None);
        assert_eq!(rate_to_cents(""), None);
    }

    #[test]
    fn test_plan_skips_missing_fields() {
        let p = provider();
        let platforms = vec![platform("Instagram", 1)];
        let mut svc = service("1", "Instagram Followers", "10.80");
        svc.rate = None;

        assert_eq!(
            plan_service(&p, &platforms, &svc, None, None),
            Plan::Skip("Missing required fields")
        );
    }

    #[test]
    fn test_plan_skips_unmatched_platform() {
        let p = provider();
        let platforms = vec![platform("Instagram", 1)];
        let svc = service("1", "Spotify Plays", "3.00");

        assert_eq!(
            plan_service(&p, &platforms, &svc, None, None),
            Plan::Skip("No matching platform found")
        );
    }

    #[test]
    fn test_plan_override_beats_heuristic() {
        let p = provider();
        let platforms = vec![platform("Instagram", 1)];
        let forced = Uuid::new_v4();
        let svc = service("1", "Spotify Plays", "3.00");

        match plan_service(&p, &platforms, &svc, None, Some(forced)) {
            Plan::Insert(entry) => assert_eq!(entry.platform_id, forced),
            other => panic!("expected Insert, got {other:?}"),
        }
    }

    #[test]
    fn test_plan_insert_derives_category_and_price() {
        let p = provider();
        let platforms = vec![platform("Instagram", 1)];
        let svc = service("1", "Instagram Followers [Real]", "10.80");

        match plan_service(&p, &platforms, &svc, None, None) {
            Plan::Insert(entry) => {
                assert_eq!(entry.price_cents, 1080);
                assert_eq!(entry.category, "followers");
                assert_eq!(entry.platform_id, platforms[0].id);
                assert_eq!(entry.external_service_id, "1");
                assert_eq!(entry.provider_name, "mockpanel");
                assert!(entry.is_active);
            }
            other => panic!("expected Insert, got {other:?}"),
        }
    }

    /// Updates touch only name/price/min/max; category, platform and the
    /// active flag are preserved from the first import.
    #[test]
    fn test_plan_update_touches_allowed_fields_only() {
        let p = provider();
        let platforms = vec![platform("Instagram", 1)];
        let svc = service("1", "Instagram Followers v2", "11.00");
        let existing = entry_for(platforms[0].id, "1");

        match plan_service(&p, &platforms, &svc, Some(&existing), None) {
            Plan::Update { entry_id, update } => {
                assert_eq!(entry_id, existing.id);
                assert_eq!(
                    update,
                    CatalogUpdate {
                        name: "Instagram Followers v2".to_string(),
                        price_cents: 1100,
                        min_quantity: 10,
                        max_quantity: 10_000,
                    }
                );
            }
            other => panic!("expected Update, got {other:?}"),
        }
    }
}
