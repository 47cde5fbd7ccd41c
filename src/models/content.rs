use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::ReconciledProviderSet;

/// Kind of content tracked by the metadata provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Path segment used by TMDB for this media type
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }

    /// Parses the `type` query parameter accepted by the HTTP surface
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "movie" | "movies" | "film" => Some(MediaType::Movie),
            "tv" | "series" | "show" | "tv_show" => Some(MediaType::Tv),
            _ => None,
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_path())
    }
}

/// A provisional search hit, before detail resolution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentCandidate {
    pub id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    pub media_type: MediaType,
    pub popularity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// The canonical record for one title, assembled once per request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedContent {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    /// Minutes; episode runtime for TV
    pub runtime: Option<u32>,
    pub vote_average: Option<f64>,
    pub genres: Vec<Genre>,
}

/// One entry of a search page, optionally enriched with providers
#[derive(Debug, Clone, Serialize)]
pub struct SearchResultItem {
    #[serde(flatten)]
    pub candidate: ContentCandidate,
    /// Absent when the per-item provider lookup failed
    pub providers: Option<ReconciledProviderSet>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub page: u32,
    pub is_korean: bool,
    pub best_match: Option<ContentCandidate>,
    pub results: Vec<SearchResultItem>,
}

/// Detail endpoint payload: resolved content plus its reconciled providers
#[derive(Debug, Clone, Serialize)]
pub struct ContentResponse {
    #[serde(flatten)]
    pub content: ResolvedContent,
    pub providers: ReconciledProviderSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct KoreanOttResponse {
    pub title: String,
    pub media_type: MediaType,
    /// Title of the streaming-availability show the query resolved to
    pub matched_title: Option<String>,
    pub providers: ReconciledProviderSet,
}
