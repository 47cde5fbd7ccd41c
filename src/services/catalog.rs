//! Hand-curated regional availability tables.
//!
//! Entries are matched on [`query::title_key`], so spacing, punctuation and
//! case in titles do not matter. A title is theater-only when its key and an
//! entry's key overlap in either direction; it is confirmed streaming only when
//! its key contains an entry's key.

use std::collections::HashMap;

use crate::{
    models::{OfferType, RawOffer},
    services::query,
};

/// Titles currently in theatrical release and not yet streaming in Korea
const THEATER_ONLY: &[&str] = &[
    "아바타: 불과 재",
    "Avatar: Fire and Ash",
    "주토피아 2",
    "Zootopia 2",
    "극장판 체인소 맨: 레제편",
];

/// Titles whose Korean streaming availability has been checked by hand
const CONFIRMED_STREAMING: &[&str] = &[
    "어벤져스",
    "어벤저스",
    "Avengers",
    "기생충",
    "Parasite",
    "오징어 게임",
    "Squid Game",
    "더 글로리",
    "The Glory",
    "무빙",
    "Moving",
    "범죄도시",
    "The Roundup",
    "인터스텔라",
    "Interstellar",
    "서울의 봄",
    "파묘",
    "Exhuma",
    "눈물의 여왕",
    "Queen of Tears",
    "이상한 변호사 우영우",
    "Extraordinary Attorney Woo",
    "흑백요리사",
    "Culinary Class Wars",
    "폭싹 속았수다",
    "When Life Gives You Tangerines",
    "케이팝 데몬 헌터스",
    "KPop Demon Hunters",
];

/// Platforms known to carry a title in Korea even when upstream data lags
const REGIONAL_OVERRIDES: &[(&str, &[(&str, &str, OfferType)])] = &[
    ("무빙", &[("disney", "Disney Plus", OfferType::Subscription)]),
    ("Moving", &[("disney", "Disney Plus", OfferType::Subscription)]),
    ("오징어 게임", &[("netflix", "Netflix", OfferType::Subscription)]),
    ("더 글로리", &[("netflix", "Netflix", OfferType::Subscription)]),
    ("흑백요리사", &[("netflix", "Netflix", OfferType::Subscription)]),
    ("폭싹 속았수다", &[("netflix", "Netflix", OfferType::Subscription)]),
    (
        "이상한 변호사 우영우",
        &[("netflix", "Netflix", OfferType::Subscription)],
    ),
    (
        "서울의 봄",
        &[
            ("tving", "TVING", OfferType::Subscription),
            ("coupang_play", "Coupang Play", OfferType::Subscription),
        ],
    ),
    (
        "기생충",
        &[
            ("watcha", "Watcha", OfferType::Subscription),
            ("wavve", "Wavve", OfferType::Rent),
        ],
    ),
];

/// Curated title lists consulted during provider reconciliation
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    theater_only: Vec<String>,
    confirmed_streaming: Vec<String>,
    regional_overrides: HashMap<String, Vec<RawOffer>>,
}

impl Catalog {
    /// Builds a catalog from raw titles; titles are keyed on insertion
    pub fn new<S: AsRef<str>>(
        theater_only: &[S],
        confirmed_streaming: &[S],
        regional_overrides: Vec<(S, Vec<RawOffer>)>,
    ) -> Self {
        let keys = |titles: &[S]| -> Vec<String> {
            titles
                .iter()
                .map(|t| query::title_key(t.as_ref()))
                .filter(|k| !k.is_empty())
                .collect()
        };

        let mut overrides: HashMap<String, Vec<RawOffer>> = HashMap::new();
        for (title, offers) in regional_overrides {
            overrides
                .entry(query::title_key(title.as_ref()))
                .or_default()
                .extend(offers);
        }

        Self {
            theater_only: keys(theater_only),
            confirmed_streaming: keys(confirmed_streaming),
            regional_overrides: overrides,
        }
    }

    /// The tables shipped with the service
    pub fn builtin() -> Self {
        let overrides = REGIONAL_OVERRIDES
            .iter()
            .map(|(title, offers)| {
                let offers = offers
                    .iter()
                    .map(|(id, name, offer_type)| RawOffer::new(*id, *name, *offer_type))
                    .collect();
                (*title, offers)
            })
            .collect();

        Self::new(THEATER_ONLY, CONFIRMED_STREAMING, overrides)
    }

    pub fn is_theater_only(&self, title: &str) -> bool {
        let key = query::title_key(title);
        !key.is_empty()
            && self
                .theater_only
                .iter()
                .any(|entry| key.contains(entry.as_str()) || entry.contains(key.as_str()))
    }

    pub fn is_confirmed_streaming(&self, title: &str) -> bool {
        let key = query::title_key(title);
        !key.is_empty()
            && self
                .confirmed_streaming
                .iter()
                .any(|entry| key.contains(entry.as_str()))
    }

    /// Curated offers for exactly this title, if any
    pub fn regional_overrides(&self, title: &str) -> Vec<RawOffer> {
        self.regional_overrides
            .get(&query::title_key(title))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_theater_only_ignores_case_and_punctuation() {
        let catalog = Catalog::builtin();
        assert!(catalog.is_theater_only("ZOOTOPIA 2"));
        assert!(catalog.is_theater_only("아바타 불과 재"));
        assert!(!catalog.is_theater_only("미나리"));
    }

    #[test]
    fn test_theater_only_matches_in_either_direction() {
        let catalog = Catalog::builtin();
        // Entry inside the title
        assert!(catalog.is_theater_only("주토피아 2 (더빙)"));
        // Title inside the entry
        assert!(catalog.is_theater_only("Zootopia"));
        assert!(catalog.is_theater_only("아바타"));
    }

    #[test]
    fn test_confirmed_streaming_requires_title_to_contain_entry() {
        let catalog = Catalog::builtin();
        assert!(catalog.is_confirmed_streaming("오징어 게임 시즌 2"));
        // "오징어" is shorter than the "오징어 게임" entry
        assert!(!catalog.is_confirmed_streaming("오징어"));
    }

    #[test]
    fn test_confirmed_streaming_matches_substring() {
        let catalog = Catalog::builtin();
        assert!(catalog.is_confirmed_streaming("어벤져스: 엔드게임"));
        assert!(catalog.is_confirmed_streaming("Squid Game"));
        assert!(!catalog.is_confirmed_streaming("오펜하이머"));
    }

    #[test]
    fn test_empty_title_never_matches() {
        let catalog = Catalog::builtin();
        assert!(!catalog.is_confirmed_streaming(""));
        assert!(!catalog.is_theater_only("!!"));
    }

    #[test]
    fn test_regional_overrides_exact_key() {
        let catalog = Catalog::builtin();
        let offers = catalog.regional_overrides("서울의봄");
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].platform_name, "TVING");

        assert!(catalog.regional_overrides("서울의 봄 비하인드").is_empty());
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = Catalog::new(
            &["Now Showing"],
            &["Streaming Hit"],
            vec![("Streaming Hit", vec![RawOffer::new("wavve", "Wavve", OfferType::Buy)])],
        );

        assert!(catalog.is_theater_only("now showing"));
        assert!(catalog.is_confirmed_streaming("streaming hit 2"));
        assert_eq!(catalog.regional_overrides("STREAMING HIT").len(), 1);
    }
}
