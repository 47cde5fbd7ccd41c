/// TMDB (The Movie Database) metadata provider, API v3
///
/// Endpoints used:
/// - /search/multi, /search/movie, /search/tv
/// - /{movie|tv}/{id} and /{movie|tv}/{id}/watch/providers
/// - /{movie|tv}/popular, /trending/all/week
use crate::{
    error::{AppError, AppResult},
    models::{
        ContentCandidate, MediaType, RawOffer, ResolvedContent, TmdbDetails, TmdbPage,
        TmdbWatchProviders,
    },
    services::providers::{CandidatePage, MetadataProvider},
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const PROVIDER_NAME: &str = "tmdb";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let mut all_params = vec![
            ("api_key", self.api_key.as_str()),
            ("language", self.language.as_str()),
        ];
        all_params.extend_from_slice(params);

        let url = self.url(path);
        tracing::debug!(path = %path, provider = PROVIDER_NAME, "TMDB request");

        let response = self
            .http_client
            .get(&url)
            .query(&all_params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_upstream_status("TMDB", status, body));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(error = %e, path = %path, "Failed to deserialize TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }

    async fn search_page(
        &self,
        path: &str,
        query: &str,
        page: u32,
        fallback: Option<MediaType>,
    ) -> AppResult<CandidatePage> {
        let page_param = page.to_string();
        let raw: TmdbPage = self
            .get_json(
                path,
                &[
                    ("query", query),
                    ("page", page_param.as_str()),
                    ("include_adult", "false"),
                ],
            )
            .await?;

        let page = raw.page;
        let total_pages = raw.total_pages;
        let results = raw.into_candidates(fallback);

        tracing::info!(
            query = %query,
            path = %path,
            results = results.len(),
            provider = PROVIDER_NAME,
            "Title search completed"
        );

        Ok(CandidatePage {
            page,
            total_pages,
            results,
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_multi(&self, query: &str, page: u32) -> AppResult<CandidatePage> {
        self.search_page("/search/multi", query, page, None).await
    }

    async fn search_movies(&self, query: &str, page: u32) -> AppResult<Vec<ContentCandidate>> {
        Ok(self
            .search_page("/search/movie", query, page, Some(MediaType::Movie))
            .await?
            .results)
    }

    async fn search_tv(&self, query: &str, page: u32) -> AppResult<Vec<ContentCandidate>> {
        Ok(self
            .search_page("/search/tv", query, page, Some(MediaType::Tv))
            .await?
            .results)
    }

    async fn details(&self, id: u64, media_type: MediaType) -> AppResult<ResolvedContent> {
        let path = format!("/{}/{}", media_type.as_path(), id);
        let details: TmdbDetails = self.get_json(&path, &[]).await?;

        details.into_resolved(media_type).ok_or_else(|| {
            AppError::ExternalApi(format!("TMDB {} {} is missing id or title", media_type, id))
        })
    }

    async fn watch_providers(
        &self,
        id: u64,
        media_type: MediaType,
        region: &str,
    ) -> AppResult<Vec<RawOffer>> {
        let path = format!("/{}/{}/watch/providers", media_type.as_path(), id);
        let providers: TmdbWatchProviders = self.get_json(&path, &[]).await?;
        let offers = providers.offers_for_region(region);

        tracing::debug!(
            id = id,
            media_type = %media_type,
            region = %region,
            offers = offers.len(),
            provider = PROVIDER_NAME,
            "Watch providers fetched"
        );

        Ok(offers)
    }

    async fn popular(&self, media_type: MediaType, page: u32) -> AppResult<Vec<ContentCandidate>> {
        let path = format!("/{}/popular", media_type.as_path());
        let page_param = page.to_string();
        let raw: TmdbPage = self.get_json(&path, &[("page", page_param.as_str())]).await?;
        Ok(raw.into_candidates(Some(media_type)))
    }

    async fn trending(&self, page: u32) -> AppResult<Vec<ContentCandidate>> {
        let page_param = page.to_string();
        let raw: TmdbPage = self
            .get_json("/trending/all/week", &[("page", page_param.as_str())])
            .await?;
        Ok(raw.into_candidates(None))
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
