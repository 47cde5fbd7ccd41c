/// Upstream data provider abstraction
///
/// Two kinds of sources feed the service: a metadata provider (TMDB) that owns
/// search, details and regional watch providers, and a streaming-availability
/// provider that reports per-country streaming offers. Both sit behind traits
/// so a missing API key swaps in a disabled implementation and tests can mock
/// them.
use crate::{
    error::{AppError, AppResult},
    models::{ContentCandidate, MediaType, RawOffer, ResolvedContent},
};

pub mod streaming_availability;
pub mod tmdb;

/// One page of search or list results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePage {
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<ContentCandidate>,
}

/// Trait for movie/TV metadata providers
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Multi-type search; person results are discarded
    async fn search_multi(&self, query: &str, page: u32) -> AppResult<CandidatePage>;

    async fn search_movies(&self, query: &str, page: u32) -> AppResult<Vec<ContentCandidate>>;

    async fn search_tv(&self, query: &str, page: u32) -> AppResult<Vec<ContentCandidate>>;

    /// Full metadata for one title
    async fn details(&self, id: u64, media_type: MediaType) -> AppResult<ResolvedContent>;

    /// Watch providers for one title in one region (two-letter country code)
    async fn watch_providers(
        &self,
        id: u64,
        media_type: MediaType,
        region: &str,
    ) -> AppResult<Vec<RawOffer>>;

    async fn popular(&self, media_type: MediaType, page: u32) -> AppResult<Vec<ContentCandidate>>;

    /// Weekly trending movies and TV
    async fn trending(&self, page: u32) -> AppResult<Vec<ContentCandidate>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for streaming-availability providers
#[async_trait::async_trait]
pub trait AvailabilityProvider: Send + Sync {
    /// Searches by title and returns the offers of the best matching show,
    /// with that show's title
    async fn offers_by_title(
        &self,
        title: &str,
        media_type: MediaType,
    ) -> AppResult<Option<(String, Vec<RawOffer>)>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Stand-in used when no TMDB API key is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMetadata;

#[async_trait::async_trait]
impl MetadataProvider for DisabledMetadata {
    async fn search_multi(&self, _query: &str, page: u32) -> AppResult<CandidatePage> {
        Ok(CandidatePage {
            page,
            total_pages: 0,
            results: Vec::new(),
        })
    }

    async fn search_movies(&self, _query: &str, _page: u32) -> AppResult<Vec<ContentCandidate>> {
        Ok(Vec::new())
    }

    async fn search_tv(&self, _query: &str, _page: u32) -> AppResult<Vec<ContentCandidate>> {
        Ok(Vec::new())
    }

    async fn details(&self, id: u64, media_type: MediaType) -> AppResult<ResolvedContent> {
        Err(AppError::NotFound(format!(
            "{} {} (metadata provider not configured)",
            media_type, id
        )))
    }

    async fn watch_providers(
        &self,
        _id: u64,
        _media_type: MediaType,
        _region: &str,
    ) -> AppResult<Vec<RawOffer>> {
        Ok(Vec::new())
    }

    async fn popular(&self, _media_type: MediaType, _page: u32) -> AppResult<Vec<ContentCandidate>> {
        Ok(Vec::new())
    }

    async fn trending(&self, _page: u32) -> AppResult<Vec<ContentCandidate>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Stand-in used when no Streaming Availability API key is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAvailability;

#[async_trait::async_trait]
impl AvailabilityProvider for DisabledAvailability {
    async fn offers_by_title(
        &self,
        _title: &str,
        _media_type: MediaType,
    ) -> AppResult<Option<(String, Vec<RawOffer>)>> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_disabled_metadata_yields_no_data() {
        let provider = DisabledMetadata;
        assert!(provider.search_multi("기생충", 1).await.unwrap().results.is_empty());
        assert!(provider.popular(MediaType::Tv, 1).await.unwrap().is_empty());
        assert!(provider
            .watch_providers(1, MediaType::Movie, "KR")
            .await
            .unwrap()
            .is_empty());

        let err = provider.details(1, MediaType::Movie).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_disabled_availability_yields_no_offers() {
        let provider = DisabledAvailability;
        assert!(provider
            .offers_by_title("기생충", MediaType::Movie)
            .await
            .unwrap()
            .is_none());
    }
}
