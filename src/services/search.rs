use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{ContentCandidate, SearchResponse, SearchResultItem, Titled},
    services::{
        providers::MetadataProvider,
        query::{self, NormalizedQuery},
        reconciler::Reconciler,
        resolver,
    },
};

/// Upstream metadata lookup for a normalized query.
///
/// Korean queries run movie and TV searches concurrently and interleave them,
/// moving candidates whose name contains the query to the front. Other queries
/// use a single multi-type search.
pub async fn lookup(
    metadata: &dyn MetadataProvider,
    query: &NormalizedQuery,
    page: u32,
) -> AppResult<Vec<ContentCandidate>> {
    if query.is_korean {
        let (movies, shows) = tokio::join!(
            metadata.search_movies(&query.cleaned, page),
            metadata.search_tv(&query.cleaned, page)
        );

        let (movies, shows) = match (movies, shows) {
            (Ok(movies), Ok(shows)) => (movies, shows),
            (Ok(movies), Err(e)) => {
                tracing::warn!(error = %e, "TV search failed, using movie results only");
                (movies, Vec::new())
            }
            (Err(e), Ok(shows)) => {
                tracing::warn!(error = %e, "Movie search failed, using TV results only");
                (Vec::new(), shows)
            }
            (Err(e), Err(_)) => return Err(e),
        };

        Ok(prioritize_containing(&query.cleaned, interleave(movies, shows)))
    } else {
        Ok(metadata.search_multi(&query.cleaned, page).await?.results)
    }
}

fn interleave<T>(first: Vec<T>, second: Vec<T>) -> Vec<T> {
    let mut merged = Vec::with_capacity(first.len() + second.len());
    let mut first = first.into_iter();
    let mut second = second.into_iter();

    loop {
        match (first.next(), second.next()) {
            (None, None) => break,
            (a, b) => merged.extend(a.into_iter().chain(b)),
        }
    }

    merged
}

/// Stable partition: candidates whose display name contains `query` first
fn prioritize_containing(query: &str, candidates: Vec<ContentCandidate>) -> Vec<ContentCandidate> {
    let needle = query.to_lowercase();
    let (mut containing, rest): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|c| {
        c.display_names()
            .iter()
            .any(|name| name.to_lowercase().contains(&needle))
    });

    containing.extend(rest);
    containing
}

/// Search page for `raw`, resolved to a best match and enriched with providers
pub async fn search(
    metadata: Arc<dyn MetadataProvider>,
    reconciler: Arc<Reconciler>,
    region: &str,
    raw: &str,
    page: u32,
) -> AppResult<SearchResponse> {
    let query = query::normalize(raw);
    if query.is_empty() {
        return Err(AppError::InvalidInput("Search query is required".to_string()));
    }

    let candidates = lookup(metadata.as_ref(), &query, page).await?;

    let best_match = if candidates.is_empty() {
        None
    } else {
        resolver::resolve_with_keywords(metadata.as_ref(), &query.cleaned, candidates.clone()).await
    };

    tracing::info!(
        query = %query.cleaned,
        is_korean = query.is_korean,
        results = candidates.len(),
        best_match = best_match.as_ref().map(|c| c.title.as_str()).unwrap_or("-"),
        "Search completed"
    );

    let results = enrich_with_providers(metadata, reconciler, region, candidates).await;

    Ok(SearchResponse {
        query: query.cleaned,
        page,
        is_korean: query.is_korean,
        best_match,
        results,
    })
}

/// Attaches a reconciled provider set to each candidate.
///
/// One task per candidate; a failed fetch leaves that item without providers
/// and never fails the batch. Output keeps input order.
pub async fn enrich_with_providers(
    metadata: Arc<dyn MetadataProvider>,
    reconciler: Arc<Reconciler>,
    region: &str,
    candidates: Vec<ContentCandidate>,
) -> Vec<SearchResultItem> {
    let mut tasks = Vec::with_capacity(candidates.len());

    for candidate in &candidates {
        let metadata = metadata.clone();
        let reconciler = reconciler.clone();
        let region = region.to_string();
        let candidate = candidate.clone();

        let task = tokio::spawn(async move {
            let primary = metadata
                .watch_providers(candidate.id, candidate.media_type, &region)
                .await?;
            let overrides = reconciler.catalog().regional_overrides(&candidate.title);
            Ok::<_, AppError>(reconciler.reconcile(
                &candidate.title,
                candidate.release_date.as_deref(),
                primary,
                Vec::new(),
                overrides,
            ))
        });
        tasks.push(task);
    }

    let mut results = Vec::with_capacity(candidates.len());
    let mut failures = 0usize;

    for (candidate, task) in candidates.into_iter().zip(tasks) {
        let providers = match task.await {
            Ok(Ok(providers)) => Some(providers),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, id = candidate.id, "Provider enrichment failed");
                failures += 1;
                None
            }
            Err(e) => {
                tracing::error!(error = %e, id = candidate.id, "Task join error");
                failures += 1;
                None
            }
        };
        results.push(SearchResultItem {
            candidate,
            providers,
        });
    }

    if failures > 0 {
        tracing::warn!(
            success_count = results.len() - failures,
            error_count = failures,
            "Partial provider enrichment failure"
        );
    }

    results
}
