use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{ContentCandidate, ContentResponse, KoreanOttResponse, MediaType, SearchResponse},
    services::{content, search},
};

use super::AppState;

/// TMDB serves at most 500 pages for any list
const MAX_PAGE: u32 = 500;

// Request types. Every field is optional so malformed input reaches the
// handler and is rejected with the JSON error shape.

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailParams {
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentParams {
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KoreanOttParams {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

fn parse_id(raw: &str) -> AppResult<u64> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid content id: {}", raw)))
}

fn parse_page(raw: Option<&str>) -> AppResult<u32> {
    let Some(raw) = raw.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(1);
    };

    raw.parse::<u32>()
        .ok()
        .filter(|page| (1..=MAX_PAGE).contains(page))
        .ok_or_else(|| {
            AppError::InvalidInput(format!("Page must be between 1 and {}", MAX_PAGE))
        })
}

fn parse_media_type(raw: Option<&str>) -> AppResult<Option<MediaType>> {
    match raw.map(str::trim).filter(|t| !t.is_empty()) {
        None => Ok(None),
        Some(value) => MediaType::parse(value)
            .map(Some)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid content type: {}", value))),
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Search movies and TV shows, enriched with Korean providers
pub async fn search_content(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResponse>> {
    let query = params.query.unwrap_or_default();
    let page = parse_page(params.page.as_deref())?;

    tracing::info!(request_id = %request_id, query = %query, page = page, "Processing search request");

    let response = search::search(
        state.metadata.clone(),
        state.reconciler.clone(),
        &state.region,
        &query,
        page,
    )
    .await?;

    Ok(Json(response))
}

/// Movie details with providers
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DetailParams>,
) -> AppResult<Json<ContentResponse>> {
    let id = parse_id(&id)?;
    detail(&state, id, MediaType::Movie, params.title.as_deref()).await
}

/// TV show details with providers
pub async fn get_tv(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DetailParams>,
) -> AppResult<Json<ContentResponse>> {
    let id = parse_id(&id)?;
    detail(&state, id, MediaType::Tv, params.title.as_deref()).await
}

/// Details for either media type; without `type` the movie lookup is tried first
pub async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ContentParams>,
) -> AppResult<Json<ContentResponse>> {
    let id = parse_id(&id)?;
    let title = params.title.as_deref();

    match parse_media_type(params.media_type.as_deref())? {
        Some(media_type) => detail(&state, id, media_type, title).await,
        None => {
            let response = content::content_any_type(
                state.metadata.as_ref(),
                state.availability.as_ref(),
                &state.reconciler,
                &state.region,
                id,
                title,
            )
            .await?;
            Ok(Json(response))
        }
    }
}

async fn detail(
    state: &AppState,
    id: u64,
    media_type: MediaType,
    title: Option<&str>,
) -> AppResult<Json<ContentResponse>> {
    let response = content::content_with_providers(
        state.metadata.as_ref(),
        state.availability.as_ref(),
        &state.reconciler,
        &state.region,
        id,
        media_type,
        title,
    )
    .await?;

    Ok(Json(response))
}

pub async fn popular_movies(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Vec<ContentCandidate>>> {
    let page = parse_page(params.page.as_deref())?;
    Ok(Json(state.metadata.popular(MediaType::Movie, page).await?))
}

pub async fn popular_tv(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Vec<ContentCandidate>>> {
    let page = parse_page(params.page.as_deref())?;
    Ok(Json(state.metadata.popular(MediaType::Tv, page).await?))
}

pub async fn trending(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Vec<ContentCandidate>>> {
    let page = parse_page(params.page.as_deref())?;
    Ok(Json(state.metadata.trending(page).await?))
}

/// Korean OTT platforms for a title; `type` defaults to movie
pub async fn korean_ott(
    State(state): State<AppState>,
    Query(params): Query<KoreanOttParams>,
) -> AppResult<Json<KoreanOttResponse>> {
    let media_type = parse_media_type(params.media_type.as_deref())?.unwrap_or(MediaType::Movie);
    let title = params.title.unwrap_or_default();

    let response = content::korean_ott(
        state.availability.as_ref(),
        &state.reconciler,
        &title,
        media_type,
    )
    .await?;

    Ok(Json(response))
}
