use crate::{
    error::{AppError, AppResult},
    models::{ContentResponse, KoreanOttResponse, MediaType, RawOffer},
    services::{
        providers::{AvailabilityProvider, MetadataProvider},
        reconciler::Reconciler,
    },
};

/// Details for one title plus its reconciled providers.
///
/// The detail fetch is mandatory and its failure propagates. Provider sources
/// are optional: their failures are logged and count as no offers.
/// `title_override` replaces the resolved title for provider lookups.
pub async fn content_with_providers(
    metadata: &dyn MetadataProvider,
    availability: &dyn AvailabilityProvider,
    reconciler: &Reconciler,
    region: &str,
    id: u64,
    media_type: MediaType,
    title_override: Option<&str>,
) -> AppResult<ContentResponse> {
    let content = metadata.details(id, media_type).await?;

    let lookup_title = title_override
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(&content.title)
        .to_string();

    let (primary, secondary) = tokio::join!(
        metadata.watch_providers(id, media_type, region),
        availability.offers_by_title(&lookup_title, media_type)
    );

    let primary = primary.unwrap_or_else(|e| {
        tracing::warn!(error = %e, id = id, provider = metadata.name(), "Watch provider fetch failed");
        Vec::new()
    });
    let secondary = secondary_offers(availability, &lookup_title, secondary);
    let overrides = reconciler.catalog().regional_overrides(&lookup_title);

    let providers = reconciler.reconcile(
        &lookup_title,
        content.release_date.as_deref(),
        primary,
        secondary,
        overrides,
    );

    tracing::info!(
        id = id,
        media_type = %media_type,
        title = %lookup_title,
        offers = providers.len(),
        theater_only = providers.theater_only,
        "Content assembled"
    );

    Ok(ContentResponse { content, providers })
}

/// Like [`content_with_providers`] when the media type is unknown: movie first,
/// then TV if the movie lookup is not found
pub async fn content_any_type(
    metadata: &dyn MetadataProvider,
    availability: &dyn AvailabilityProvider,
    reconciler: &Reconciler,
    region: &str,
    id: u64,
    title_override: Option<&str>,
) -> AppResult<ContentResponse> {
    match content_with_providers(
        metadata,
        availability,
        reconciler,
        region,
        id,
        MediaType::Movie,
        title_override,
    )
    .await
    {
        Err(AppError::NotFound(_)) => {
            tracing::debug!(id = id, "No movie with this id, trying TV");
            content_with_providers(
                metadata,
                availability,
                reconciler,
                region,
                id,
                MediaType::Tv,
                title_override,
            )
            .await
        }
        other => other,
    }
}

/// Korean OTT availability for a title, from the streaming-availability source
/// and the curated overrides only
pub async fn korean_ott(
    availability: &dyn AvailabilityProvider,
    reconciler: &Reconciler,
    title: &str,
    media_type: MediaType,
) -> AppResult<KoreanOttResponse> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Title is required".to_string()));
    }

    let (matched_title, secondary) = match availability.offers_by_title(title, media_type).await {
        Ok(Some((matched, offers))) => (Some(matched), offers),
        Ok(None) => (None, Vec::new()),
        Err(e) => {
            tracing::warn!(error = %e, title = %title, provider = availability.name(), "OTT lookup failed");
            (None, Vec::new())
        }
    };

    let overrides = reconciler.catalog().regional_overrides(title);
    let providers = reconciler.reconcile(title, None, Vec::new(), secondary, overrides);

    Ok(KoreanOttResponse {
        title: title.to_string(),
        media_type,
        matched_title,
        providers,
    })
}

fn secondary_offers(
    availability: &dyn AvailabilityProvider,
    title: &str,
    result: AppResult<Option<(String, Vec<RawOffer>)>>,
) -> Vec<RawOffer> {
    match result {
        Ok(Some((_, offers))) => offers,
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, title = %title, provider = availability.name(), "OTT lookup failed");
            Vec::new()
        }
    }
}
