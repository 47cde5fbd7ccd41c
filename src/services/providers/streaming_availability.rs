/// Streaming Availability API provider (via RapidAPI)
///
/// Supplies per-country streaming offers as a second source next to TMDB's
/// watch providers. Only the offer list for the configured country is kept.
use crate::{
    error::{AppError, AppResult},
    models::{ApiShow, MediaType, RawOffer},
    services::{providers::AvailabilityProvider, resolver},
};
use reqwest::Client as HttpClient;

const SEARCH_COUNTRY: &str = "kr";
const RAPIDAPI_HOST: &str = "streaming-availability.p.rapidapi.com";
const PROVIDER_NAME: &str = "streaming_availability";

#[derive(Clone)]
pub struct StreamingAvailabilityProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    country: String,
}

impl StreamingAvailabilityProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            country: SEARCH_COUNTRY.to_string(),
        }
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> AppResult<reqwest::Response> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http_client
            .get(&url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", RAPIDAPI_HOST)
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_upstream_status(
                "Streaming Availability API",
                status,
                body,
            ));
        }

        Ok(response)
    }

    /// Narrows the search payload, dropping shows that fail to deserialize
    fn parse_search_results(&self, results: Vec<serde_json::Value>) -> Vec<ApiShow> {
        results
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<ApiShow>(value) {
                Ok(show) => Some(show),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping malformed show in search results");
                    None
                }
            })
            .collect()
    }

    /// Picks the show best matching `title` among those of the requested type.
    ///
    /// Shows that are neither an exact nor a close match are never picked.
    fn select_show(&self, title: &str, media_type: MediaType, shows: Vec<ApiShow>) -> Option<ApiShow> {
        let typed: Vec<ApiShow> = shows
            .into_iter()
            .filter(|show| show.matches_media_type(media_type))
            .collect();

        resolver::find_good_match(title, &typed).cloned()
    }
}

#[async_trait::async_trait]
impl AvailabilityProvider for StreamingAvailabilityProvider {
    async fn offers_by_title(
        &self,
        title: &str,
        media_type: MediaType,
    ) -> AppResult<Option<(String, Vec<RawOffer>)>> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search title cannot be empty".to_string(),
            ));
        }

        let show_type = match media_type {
            MediaType::Movie => "movie",
            MediaType::Tv => "series",
        };

        let response = self
            .get(
                "/shows/search/title",
                &[
                    ("title", title),
                    ("country", self.country.as_str()),
                    ("show_type", show_type),
                ],
            )
            .await?;

        let results: Vec<serde_json::Value> = response.json().await?;
        let shows = self.parse_search_results(results);
        let found = shows.len();

        let Some(show) = self.select_show(title, media_type, shows) else {
            tracing::info!(title = %title, found = found, provider = PROVIDER_NAME, "No matching show");
            return Ok(None);
        };

        let offers = show.offers_for_country(&self.country);

        tracing::info!(
            title = %title,
            matched = %show.title,
            offers = offers.len(),
            provider = PROVIDER_NAME,
            "Availability fetched"
        );

        Ok(Some((show.title, offers)))
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OfferType;
    use serde_json::json;

    fn create_test_provider() -> StreamingAvailabilityProvider {
        StreamingAvailabilityProvider::new("test_key".to_string(), "http://test.local/".to_string())
    }

    fn search_payload() -> Vec<serde_json::Value> {
        vec![
            json!({
                "id": "100",
                "title": "Moving Pictures",
                "showType": "movie",
                "streamingOptions": {}
            }),
            json!({ "id": "broken" }),
            json!({
                "id": "200",
                "title": "Moving",
                "originalTitle": "무빙",
                "showType": "series",
                "streamingOptions": {
                    "kr": [
                        { "service": { "id": "disney", "name": "Disney+" }, "type": "subscription" }
                    ],
                    "us": [
                        { "service": { "id": "hulu", "name": "Hulu" }, "type": "subscription" }
                    ]
                }
            }),
        ]
    }

    #[test]
    fn test_parse_search_results_skips_malformed() {
        let provider = create_test_provider();
        let shows = provider.parse_search_results(search_payload());
        assert_eq!(shows.len(), 2);
        assert_eq!(provider.api_url, "http://test.local");
    }

    #[test]
    fn test_select_show_filters_type_and_matches_original_title() {
        let provider = create_test_provider();
        let shows = provider.parse_search_results(search_payload());

        let show = provider.select_show("무빙", MediaType::Tv, shows).unwrap();
        assert_eq!(show.id, "200");

        let offers = show.offers_for_country("kr");
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].platform_name, "Disney+");
        assert_eq!(offers[0].offer_type, OfferType::Subscription);
    }

    #[test]
    fn test_select_show_none_when_type_mismatch() {
        let provider = create_test_provider();
        let shows = provider.parse_search_results(vec![json!({
            "id": "1",
            "title": "Only A Movie",
            "showType": "movie"
        })]);

        assert!(provider.select_show("Only A Movie", MediaType::Tv, shows).is_none());
    }

    #[test]
    fn test_select_show_none_when_nothing_matches_title() {
        let provider = create_test_provider();
        let shows = provider.parse_search_results(search_payload());

        assert!(provider.select_show("오펜하이머", MediaType::Movie, shows).is_none());
    }

    #[tokio::test]
    async fn test_empty_title_is_rejected() {
        let provider = create_test_provider();
        let result = provider.offers_by_title("  ", MediaType::Movie).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
