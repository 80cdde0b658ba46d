//! Post-processing of a discovered service list: validation and grouping.
//!
//! Nothing here persists anything; grouping exists purely so the admin
//! surface can render the provider's catalog by category before the operator
//! selects what to import.

use std::collections::BTreeMap;

use crate::models::remote::{GroupedService, RemoteService};
use crate::sync::classify;

/// Drop records the classifier cannot work with: missing name or rate.
/// Provider fields are never guaranteed present, so this runs on every
/// discovery result before anything else looks at it.
pub fn usable(services: Vec<RemoteService>) -> Vec<RemoteService> {
    let total = services.len();
    let kept: Vec<_> = services
        .into_iter()
        .filter(|s| s.name.is_some() && s.rate.is_some())
        .collect();

    if kept.len() < total {
        tracing::warn!(
            dropped = total - kept.len(),
            kept = kept.len(),
            "dropped incomplete service records from discovery"
        );
    }
    kept
}

/// Group services by category for presentation. The provider's own category
/// label wins when present; otherwise the category is inferred from the name.
pub fn group_by_category(services: &[RemoteService]) -> BTreeMap<String, Vec<GroupedService>> {
    let mut groups: BTreeMap<String, Vec<GroupedService>> = BTreeMap::new();

    for svc in services {
        let name = match &svc.name {
            Some(n) => n.clone(),
            None => continue,
        };
        let inferred = classify::classify_category(&name);
        let group_key = svc
            .category
            .clone()
            .unwrap_or_else(|| inferred.as_str().to_string());

        groups.entry(group_key).or_default().push(GroupedService {
            id: svc.external_service_id.clone(),
            name,
            rate: svc
                .rate
                .as_deref()
                .and_then(|r| r.trim().parse().ok())
                .unwrap_or(0.0),
            min: svc.min.unwrap_or(0),
            max: svc.max.unwrap_or(0),
            service_type: svc.service_type.clone().unwrap_or_else(|| "Default".to_string()),
            category: inferred.as_str().to_string(),
        });
    }

    groups
}

// ── Tests ─────────────────────────────────────────────────────
