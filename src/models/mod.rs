use serde::Deserialize;
use std::collections::HashMap;

mod content;
mod offer;

pub use content::{
    ContentCandidate, ContentResponse, Genre, KoreanOttResponse, MediaType, ResolvedContent,
    SearchResponse, SearchResultItem,
};
pub use offer::{OfferType, ProviderOffer, RawOffer, ReconciledProviderSet};

/// Anything the best-match resolver can compare a query against
pub trait Titled {
    /// Display names in preference order (localized title first)
    fn display_names(&self) -> Vec<&str>;
}

impl Titled for ContentCandidate {
    fn display_names(&self) -> Vec<&str> {
        let mut names = vec![self.title.as_str()];
        if let Some(original) = self.original_title.as_deref() {
            if original != self.title {
                names.push(original);
            }
        }
        names
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paginated TMDB response; results stay untyped until narrowed item by item
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// Search/list hit as returned by TMDB. Movies carry `title`, TV carries `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchItem {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl TmdbSearchItem {
    /// Narrows the hit into a candidate.
    ///
    /// `fallback` supplies the media type for type-specific endpoints, which omit
    /// `media_type`. Person hits and hits without an id or any name are rejected.
    pub fn into_candidate(self, fallback: Option<MediaType>) -> Option<ContentCandidate> {
        let media_type = match self.media_type.as_deref() {
            Some("movie") => MediaType::Movie,
            Some("tv") => MediaType::Tv,
            Some(_) => return None,
            None => fallback?,
        };

        let title = non_blank(self.title).or(non_blank(self.name))?;

        Some(ContentCandidate {
            id: self.id?,
            title,
            original_title: non_blank(self.original_title).or(non_blank(self.original_name)),
            media_type,
            popularity: self.popularity.unwrap_or(0.0),
            release_date: non_blank(self.release_date).or(non_blank(self.first_air_date)),
            poster_path: non_blank(self.poster_path),
            overview: non_blank(self.overview),
        })
    }
}

impl TmdbPage {
    pub fn into_candidates(self, fallback: Option<MediaType>) -> Vec<ContentCandidate> {
        self.results
            .into_iter()
            .filter_map(|value| {
                serde_json::from_value::<TmdbSearchItem>(value)
                    .ok()
                    .and_then(|item| item.into_candidate(fallback))
            })
            .collect()
    }
}

/// GET /movie/{id} or /tv/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDetails {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl TmdbDetails {
    pub fn into_resolved(self, media_type: MediaType) -> Option<ResolvedContent> {
        let title = non_blank(self.title).or(non_blank(self.name))?;
        let runtime = self
            .runtime
            .filter(|r| *r > 0)
            .or_else(|| self.episode_run_time.first().copied());

        Some(ResolvedContent {
            id: self.id?,
            media_type,
            title,
            original_title: non_blank(self.original_title).or(non_blank(self.original_name)),
            overview: self.overview.unwrap_or_default(),
            poster_path: non_blank(self.poster_path),
            backdrop_path: non_blank(self.backdrop_path),
            release_date: non_blank(self.release_date).or(non_blank(self.first_air_date)),
            runtime,
            vote_average: self.vote_average,
            genres: self.genres,
        })
    }
}

/// GET /{type}/{id}/watch/providers, keyed by two-letter country code
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbWatchProviders {
    #[serde(default)]
    pub results: HashMap<String, TmdbRegionProviders>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbRegionProviders {
    #[serde(default)]
    pub flatrate: Vec<TmdbProviderEntry>,
    #[serde(default)]
    pub rent: Vec<TmdbProviderEntry>,
    #[serde(default)]
    pub buy: Vec<TmdbProviderEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbProviderEntry {
    #[serde(default)]
    pub provider_id: Option<u64>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub logo_path: Option<String>,
}

impl TmdbWatchProviders {
    /// Offers for one region, subscription first, then rent, then buy
    pub fn offers_for_region(&self, region: &str) -> Vec<RawOffer> {
        let Some(providers) = self.results.get(&region.to_uppercase()) else {
            return Vec::new();
        };

        let groups = [
            (&providers.flatrate, OfferType::Subscription),
            (&providers.rent, OfferType::Rent),
            (&providers.buy, OfferType::Buy),
        ];

        groups
            .into_iter()
            .flat_map(|(entries, offer_type)| {
                entries.iter().filter_map(move |entry| {
                    let name = non_blank(entry.provider_name.clone())?;
                    Some(RawOffer {
                        platform_id: entry
                            .provider_id
                            .map(|id| id.to_string())
                            .unwrap_or_else(|| name.to_lowercase()),
                        platform_name: name,
                        logo_ref: entry.logo_path.clone(),
                        offer_type,
                    })
                })
            })
            .collect()
    }
}

// ============================================================================
// Streaming Availability API Types
// ============================================================================

/// Show returned by /shows/search/title
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiShow {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub show_type: Option<String>,
    #[serde(default)]
    pub streaming_options: HashMap<String, Vec<ApiStreamingOption>>,
}

impl Titled for ApiShow {
    fn display_names(&self) -> Vec<&str> {
        let mut names = vec![self.title.as_str()];
        if let Some(original) = self.original_title.as_deref() {
            if original != self.title {
                names.push(original);
            }
        }
        names
    }
}

impl ApiShow {
    pub fn matches_media_type(&self, media_type: MediaType) -> bool {
        match (self.show_type.as_deref(), media_type) {
            (None, _) => true,
            (Some("movie"), MediaType::Movie) => true,
            (Some("series"), MediaType::Tv) => true,
            _ => false,
        }
    }

    /// Offers for one country; quality, audio and subtitle details are dropped
    pub fn offers_for_country(&self, country: &str) -> Vec<RawOffer> {
        let Some(options) = self.streaming_options.get(&country.to_lowercase()) else {
            return Vec::new();
        };

        options
            .iter()
            .filter_map(|option| {
                let offer_type = parse_availability_type(&option.availability_type)?;
                Some(RawOffer {
                    platform_id: option.service.id.clone(),
                    platform_name: option.service.name.clone(),
                    logo_ref: option
                        .service
                        .image_set
                        .as_ref()
                        .and_then(|set| set.light_theme_image.clone()),
                    offer_type,
                })
            })
            .collect()
    }
}

/// Maps a Streaming Availability option type to an offer type
pub fn parse_availability_type(value: &str) -> Option<OfferType> {
    match value.to_lowercase().as_str() {
        "subscription" | "addon" | "free" => Some(OfferType::Subscription),
        "rent" => Some(OfferType::Rent),
        "buy" => Some(OfferType::Buy),
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStreamingOption {
    pub service: ApiService,
    #[serde(rename = "type")]
    pub availability_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiService {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_set: Option<ApiImageSet>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiImageSet {
    #[serde(default)]
    pub light_theme_image: Option<String>,
}
