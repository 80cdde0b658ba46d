//! Deterministic fixture served in mock mode.
//!
//! Lets discovery, classification and synchronization run end-to-end without
//! a live panel credential. The catalog is fixed: same 20 services on every
//! call, spanning every supported platform, with a couple of Turkish-named
//! entries so the bilingual classifier is exercised by the fixture itself.

use crate::models::remote::{Balance, RemoteService};

/// (id, name, category, rate, min, max)
const SAMPLE_SERVICES: &[(i64, &str, &str, &str, i64, i64)] = &[
    (1, "Instagram Followers [Real]", "Instagram", "10.80", 10, 10_000),
    (2, "Instagram Likes", "Instagram", "2.50", 20, 20_000),
    (3, "Instagram Video Views", "Instagram", "1.20", 100, 1_000_000),
    (4, "Instagram Comments [Custom]", "Instagram", "45.00", 5, 1_000),
    (5, "100 Instagram Takipçiler", "Instagram", "9.90", 100, 5_000),
    (6, "YouTube Subscribers", "YouTube", "55.00", 50, 50_000),
    (7, "YouTube Views [High Retention]", "YouTube", "4.75", 500, 500_000),
    (8, "YouTube Likes", "YouTube", "6.40", 50, 25_000),
    (9, "YouTube Yorum [Türkçe]", "YouTube", "38.00", 10, 500),
    (10, "Twitch Followers", "Twitch", "3.90", 100, 30_000),
    (11, "Twitch Channel Views", "Twitch", "12.00", 100, 10_000),
    (12, "Twitch Abone", "Twitch", "48.00", 10, 2_000),
    (13, "TikTok Followers", "TikTok", "8.25", 50, 100_000),
    (14, "TikTok Likes", "TikTok", "1.95", 50, 200_000),
    (15, "TikTok İzlenme", "TikTok", "0.85", 1_000, 5_000_000),
    (16, "Facebook Page Likes", "Facebook", "7.10", 100, 50_000),
    (17, "Facebook Followers", "Facebook", "6.80", 100, 50_000),
    (18, "Twitter Followers", "Twitter", "14.50", 50, 20_000),
    (19, "Twitter Retweets", "Twitter", "5.60", 20, 10_000),
    (20, "Kick Followers", "Kick", "4.20", 50, 25_000),
];

pub fn sample_services() -> Vec<RemoteService> {
    SAMPLE_SERVICES
        .iter()
        .map(|&(id, name, category, rate, min, max)| RemoteService {
            external_service_id: id.to_string(),
            external_product_id: Some(id),
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            service_type: Some("Default".to_string()),
            rate: Some(rate.to_string()),
            min: Some(min),
            max: Some(max),
        })
        .collect()
}

pub fn sample_balance() -> Balance {
    Balance {
        balance: "100.00".to_string(),
        currency: Some("USD".to_string()),
    }
}

/// Any queried order is reported complete.
pub fn sample_order(order_id: &str) -> crate::models::remote::RemoteOrder {
    crate::models::remote::RemoteOrder {
        provider_order_id: order_id.to_string(),
        status: Some("Completed".to_string()),
        charge: Some("0.00".to_string()),
        start_count: Some(0),
        remains: Some(0),
        currency: Some("USD".to_string()),
    }
}

// ── Tests ─────────────────────────────────────────────────────
