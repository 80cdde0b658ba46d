//! Name-matching heuristics for remote services.
//!
//! Both matchers are deliberately ordered-list scans, not maps: first match
//! wins, and the order is part of the observable behavior. A service named
//! "YouTube and Twitch Bundle" binds to whichever platform was registered
//! first — the ambiguity is known and stays until product decides otherwise.

use serde::Serialize;

use crate::models::catalog::Platform;

/// Local service category inferred from a provider service name.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Followers,
    Likes,
    Views,
    Comments,
    Subscribers,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Followers => "followers",
            Category::Likes => "likes",
            Category::Views => "views",
            Category::Comments => "comments",
            Category::Subscribers => "subscribers",
            Category::Other => "other",
        }
    }
}

/// Bilingual keyword table, scanned in order. Singular English forms cover
/// their plurals by substring. Turkish "izleyici" (viewer) is intentionally
/// absent — only "izlenme" (view count) maps to views.
const CATEGORY_KEYWORDS: &[(&str, Category)] = &[
    ("follower", Category::Followers),
    ("takipçi", Category::Followers),
    ("like", Category::Likes),
    ("beğeni", Category::Likes),
    ("view", Category::Views),
    ("izlenme", Category::Views),
    ("comment", Category::Comments),
    ("yorum", Category::Comments),
    ("subscriber", Category::Subscribers),
    ("abone", Category::Subscribers),
];

/// Lowercase folding for keyword scans. Unicode lowercases the Turkish
/// dotted capital İ (U+0130) to an ASCII `i` plus a combining dot above
/// (U+0307); the combining dot must be stripped or word-initial keywords
/// like "İzlenme" never match their table entry.
fn fold_lowercase(name: &str) -> String {
    name.to_lowercase().replace('\u{307}', "")
}

/// Substring search over the folded service name; first keyword wins.
pub fn classify_category(service_name: &str) -> Category {
    let lowered = fold_lowercase(service_name);
    for (keyword, category) in CATEGORY_KEYWORDS {
        if lowered.contains(keyword) {
            return *category;
        }
    }
    Category::Other
}

/// First platform, in registration order, whose name appears
/// (case-insensitively) in the service name.
pub fn match_platform<'a>(platforms: &'a [Platform], service_name: &str) -> Option<&'a Platform> {
    let lowered = fold_lowercase(service_name);
    platforms
        .iter()
        .find(|p| !p.name.is_empty() && lowered.contains(&fold_lowercase(&p.name)))
}

// ── Tests ─────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn platform(name: &str, position: i32) -> Platform {
        Platform {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            position,
        }
    }

    #[test]
    fn test_classify_english_keywords() {
        assert_eq!(classify_category("Instagram Followers [Real]"), Category::Followers);
        assert_eq!(classify_category("Facebook Page Likes"), Category::Likes);
        assert_eq!(classify_category("YouTube Views [High Retention]"), Category::Views);
        assert_eq!(classify_category("Instagram Comments [Custom]"), Category::Comments);
        assert_eq!(classify_category("YouTube Subscribers"), Category::Subscribers);
    }

    #[test]
    fn test_classify_turkish_keywords() {
        assert_eq!(classify_category("100 Instagram Takipçiler"), Category::Followers);
        assert_eq!(classify_category("Instagram Beğeni Paketi"), Category::Likes);
        assert_eq!(classify_category("TikTok İzlenme"), Category::Views);
        assert_eq!(classify_category("YouTube Yorum [Türkçe]"), Category::Comments);
        assert_eq!(classify_category("Twitch Abone"), Category::Subscribers);
    }

    /// "izleyici" (viewer) is not in the table; only "izlenme" is.
    #[test]
    fn test_turkish_viewer_is_not_views() {
        assert_eq!(classify_category("Twitch İzleyiciler"), Category::Other);
    }

    /// Dotted capital İ lowercases to `i` + U+0307; without the fold a
    /// word-initial "İzlenme" would never hit the keyword table.
    #[test]
    fn test_dotted_capital_i_matches_izlenme() {
        assert_eq!(classify_category("TikTok İzlenme"), Category::Views);
        assert_eq!(classify_category("İZLENME PAKETİ"), Category::Views);
    }

    #[test]
    fn test_classify_no_keyword_is_other() {
        assert_eq!(classify_category("Twitter Retweets"), Category::Other);
        assert_eq!(classify_category(""), Category::Other);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify_category("INSTAGRAM FOLLOWERS"), Category::Followers);
    }

    #[test]
    fn test_match_platform_registration_order() {
        let platforms = vec![platform("Twitch", 1), platform("YouTube", 2)];

        // Regression: first-match-wins over name containment. The bundle
        // mentions YouTube first in its name, but Twitch was registered
        // first, so Twitch wins.
        let matched = match_platform(&platforms, "YouTube and Twitch Bundle").unwrap();
        assert_eq!(matched.name, "Twitch");
    }

    #[test]
    fn test_match_platform_case_insensitive() {
        let platforms = vec![platform("Instagram", 1)];
        let matched = match_platform(&platforms, "instagram followers").unwrap();
        assert_eq!(matched.name, "Instagram");
    }

    #[test]
    fn test_match_platform_none() {
        let platforms = vec![platform("Instagram", 1), platform("Kick", 2)];
        assert!(match_platform(&platforms, "Spotify Plays").is_none());
    }
}
