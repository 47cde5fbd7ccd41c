use serde::{Deserialize, Serialize};

/// Commercial terms under which a platform offers a title
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum OfferType {
    Subscription,
    Rent,
    Buy,
    /// Only used by the theater-only sentinel
    Theater,
}

/// An offer as narrowed from an upstream payload, before reconciliation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawOffer {
    pub platform_id: String,
    pub platform_name: String,
    pub logo_ref: Option<String>,
    pub offer_type: OfferType,
}

impl RawOffer {
    pub fn new(
        platform_id: impl Into<String>,
        platform_name: impl Into<String>,
        offer_type: OfferType,
    ) -> Self {
        Self {
            platform_id: platform_id.into(),
            platform_name: platform_name.into(),
            logo_ref: None,
            offer_type,
        }
    }

    pub fn with_logo(mut self, logo_ref: impl Into<String>) -> Self {
        self.logo_ref = Some(logo_ref.into());
        self
    }
}

/// A single (platform, content) availability record in a reconciled result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderOffer {
    pub platform_id: String,
    pub platform_name: String,
    pub logo_ref: Option<String>,
    pub offer_type: OfferType,
}

impl From<RawOffer> for ProviderOffer {
    fn from(raw: RawOffer) -> Self {
        Self {
            platform_id: raw.platform_id,
            platform_name: raw.platform_name.trim().to_string(),
            logo_ref: raw.logo_ref,
            offer_type: raw.offer_type,
        }
    }
}

/// Output of provider reconciliation
///
/// Offers are sorted by platform name. When `theater_only` is set the set holds
/// exactly one offer, the theater sentinel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReconciledProviderSet {
    pub offers: Vec<ProviderOffer>,
    pub theater_only: bool,
}

impl ReconciledProviderSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }
}
