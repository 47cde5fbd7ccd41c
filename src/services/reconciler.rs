//! Provider reconciliation: merges offers from the metadata provider, the
//! streaming-availability provider and curated overrides into one list.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    models::{OfferType, ProviderOffer, RawOffer, ReconciledProviderSet},
    services::catalog::Catalog,
};

pub const THEATER_PLATFORM_ID: &str = "theater";
pub const THEATER_PLATFORM_NAME: &str = "극장 상영중";

/// How much the reconciler trusts upstream provider data
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityPolicy {
    /// Only titles on the curated confirmed-streaming list get offers
    #[default]
    Curated,
    /// Any title gets whatever the upstream sources report
    Upstream,
}

/// The synthetic offer returned for titles still in theatrical release
pub fn theater_sentinel() -> ProviderOffer {
    ProviderOffer {
        platform_id: THEATER_PLATFORM_ID.to_string(),
        platform_name: THEATER_PLATFORM_NAME.to_string(),
        logo_ref: None,
        offer_type: OfferType::Theater,
    }
}

#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    catalog: Catalog,
    policy: AvailabilityPolicy,
}

impl Reconciler {
    pub fn new(catalog: Catalog, policy: AvailabilityPolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Reconciles offers as of today (UTC)
    pub fn reconcile(
        &self,
        title: &str,
        release_date: Option<&str>,
        primary: Vec<RawOffer>,
        secondary: Vec<RawOffer>,
        regional_overrides: Vec<RawOffer>,
    ) -> ReconciledProviderSet {
        self.reconcile_on(
            Utc::now().date_naive(),
            title,
            release_date,
            primary,
            secondary,
            regional_overrides,
        )
    }

    /// Reconciles offers as of `today`.
    ///
    /// Theater-only titles short-circuit to the sentinel. Under the curated
    /// policy, titles missing from the confirmed list get nothing. Otherwise the
    /// sources are merged in order, deduplicated by case-insensitive platform
    /// name per offer type, emptied for future releases and sorted by name.
    pub fn reconcile_on(
        &self,
        today: NaiveDate,
        title: &str,
        release_date: Option<&str>,
        primary: Vec<RawOffer>,
        secondary: Vec<RawOffer>,
        regional_overrides: Vec<RawOffer>,
    ) -> ReconciledProviderSet {
        if self.catalog.is_theater_only(title) {
            tracing::debug!(title = %title, "Title is theater-only");
            return ReconciledProviderSet {
                offers: vec![theater_sentinel()],
                theater_only: true,
            };
        }

        if self.policy == AvailabilityPolicy::Curated && !self.catalog.is_confirmed_streaming(title)
        {
            tracing::debug!(title = %title, "Title not on confirmed streaming list");
            return ReconciledProviderSet::empty();
        }

        let mut offers = merge_offers(primary, secondary, regional_overrides);

        if let Some(release) = release_date.and_then(parse_release_date) {
            if release > today {
                tracing::debug!(title = %title, release = %release, "Title not yet released");
                offers.clear();
            }
        } else if let Some(raw) = release_date.filter(|d| !d.trim().is_empty()) {
            tracing::warn!(title = %title, release_date = %raw, "Unparseable release date");
        }

        offers.sort_by(|a, b| {
            a.platform_name
                .cmp(&b.platform_name)
                .then(a.offer_type.cmp(&b.offer_type))
        });

        ReconciledProviderSet {
            offers,
            theater_only: false,
        }
    }
}

/// Concatenates sources in priority order, keeping the first offer per
/// (lowercased platform name, offer type)
fn merge_offers(
    primary: Vec<RawOffer>,
    secondary: Vec<RawOffer>,
    regional_overrides: Vec<RawOffer>,
) -> Vec<ProviderOffer> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for raw in primary
        .into_iter()
        .chain(secondary)
        .chain(regional_overrides)
    {
        let key = raw.platform_name.trim().to_lowercase();
        if key.is_empty() {
            tracing::debug!(platform_id = %raw.platform_id, "Dropping offer without platform name");
            continue;
        }
        if seen.insert((key, raw.offer_type)) {
            merged.push(ProviderOffer::from(raw));
        }
    }

    merged
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component
fn parse_release_date(value: &str) -> Option<NaiveDate> {
    let date = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn offer(name: &str, offer_type: OfferType) -> RawOffer {
        RawOffer::new(name.to_lowercase(), name, offer_type)
    }

    fn reconciler() -> Reconciler {
        Reconciler::default()
    }

    #[test]
    fn test_theater_only_returns_sentinel_alone() {
        let result = reconciler().reconcile_on(
            today(),
            "Zootopia 2",
            Some("2020-01-01"),
            vec![offer("Netflix", OfferType::Subscription)],
            vec![offer("Wavve", OfferType::Rent)],
            vec![offer("TVING", OfferType::Subscription)],
        );

        assert!(result.theater_only);
        assert_eq!(result.offers, vec![theater_sentinel()]);
    }

    #[test]
    fn test_title_contained_in_theater_entry_returns_sentinel() {
        let result = reconciler().reconcile_on(
            today(),
            "Zootopia",
            None,
            vec![offer("Netflix", OfferType::Subscription)],
            vec![],
            vec![],
        );

        assert!(result.theater_only);
        assert_eq!(result.offers, vec![theater_sentinel()]);
    }

    #[test]
    fn test_title_not_on_confirmed_list_gets_nothing() {
        // Scenario C: a past release still gets no offers under the curated policy
        let result = reconciler().reconcile_on(today(), "오펜하이머", Some("2023-08-15"), vec![], vec![], vec![]);
        assert!(result.is_empty());
        assert!(!result.theater_only);

        let result = reconciler().reconcile_on(
            today(),
            "오펜하이머",
            Some("2023-08-15"),
            vec![offer("Netflix", OfferType::Subscription)],
            vec![],
            vec![],
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_upstream_policy_trusts_sources() {
        let reconciler = Reconciler::new(Catalog::builtin(), AvailabilityPolicy::Upstream);
        let result = reconciler.reconcile_on(
            today(),
            "오펜하이머",
            Some("2023-08-15"),
            vec![offer("Netflix", OfferType::Subscription)],
            vec![],
            vec![],
        );

        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_future_release_is_always_empty() {
        let result = reconciler().reconcile_on(
            today(),
            "기생충",
            Some("2024-06-02"),
            vec![offer("Netflix", OfferType::Subscription)],
            vec![offer("Watcha", OfferType::Subscription)],
            vec![offer("Wavve", OfferType::Rent)],
        );

        assert!(result.is_empty());
    }

    #[test]
    fn test_release_today_is_allowed() {
        let result = reconciler().reconcile_on(
            today(),
            "기생충",
            Some("2024-06-01"),
            vec![offer("Netflix", OfferType::Subscription)],
            vec![],
            vec![],
        );

        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_unparseable_release_date_is_ignored() {
        let result = reconciler().reconcile_on(
            today(),
            "기생충",
            Some("sometime"),
            vec![offer("Netflix", OfferType::Subscription)],
            vec![],
            vec![],
        );

        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_dedup_is_case_insensitive_and_first_wins() {
        // Scenario D
        let primary = vec![RawOffer::new("8", "Netflix", OfferType::Subscription).with_logo("/n.jpg")];
        let secondary = vec![RawOffer::new("netflix", "netflix", OfferType::Subscription)];

        let result = reconciler().reconcile_on(today(), "더 글로리", None, primary, secondary, vec![]);

        assert_eq!(result.len(), 1);
        assert_eq!(result.offers[0].platform_id, "8");
        assert_eq!(result.offers[0].platform_name, "Netflix");
        assert_eq!(result.offers[0].logo_ref.as_deref(), Some("/n.jpg"));
    }

    #[test]
    fn test_same_platform_different_offer_types_are_kept() {
        let result = reconciler().reconcile_on(
            today(),
            "기생충",
            None,
            vec![offer("Wavve", OfferType::Rent)],
            vec![offer("WAVVE", OfferType::Buy), offer("wavve", OfferType::Rent)],
            vec![],
        );

        assert_eq!(result.len(), 2);
        assert!(result.offers.iter().any(|o| o.offer_type == OfferType::Rent));
        assert!(result.offers.iter().any(|o| o.offer_type == OfferType::Buy));
    }

    #[test]
    fn test_blank_platform_names_are_dropped() {
        let result = reconciler().reconcile_on(
            today(),
            "무빙",
            None,
            vec![offer("  ", OfferType::Subscription)],
            vec![],
            vec![offer("Disney Plus", OfferType::Subscription)],
        );

        assert_eq!(result.len(), 1);
        assert_eq!(result.offers[0].platform_name, "Disney Plus");
    }

    #[test]
    fn test_output_sorted_by_platform_name() {
        let result = reconciler().reconcile_on(
            today(),
            "서울의 봄",
            None,
            vec![offer("Wavve", OfferType::Rent), offer("TVING", OfferType::Subscription)],
            vec![offer("Coupang Play", OfferType::Subscription), offer("Apple TV", OfferType::Buy)],
            vec![offer("Netflix", OfferType::Subscription)],
        );

        let names: Vec<&str> = result.offers.iter().map(|o| o.platform_name.as_str()).collect();
        assert_eq!(names, vec!["Apple TV", "Coupang Play", "Netflix", "TVING", "Wavve"]);
        assert!(result
            .offers
            .windows(2)
            .all(|w| w[0].platform_name <= w[1].platform_name));
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        let policy: AvailabilityPolicy = serde_json::from_str("\"upstream\"").unwrap();
        assert_eq!(policy, AvailabilityPolicy::Upstream);
        assert_eq!(AvailabilityPolicy::default(), AvailabilityPolicy::Curated);
    }
}
