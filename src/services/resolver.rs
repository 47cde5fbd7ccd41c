//! Best-match resolution of a free-text query against ranked candidates.
//!
//! Layers, in priority order: exact (case-insensitive) name match, substring
//! similarity above [`GOOD_MATCH_THRESHOLD`], keyword re-search, and finally the
//! first upstream candidate. Ties always go to upstream order.

use crate::{
    models::{ContentCandidate, Titled},
    services::{providers::MetadataProvider, query, search},
};

/// Similarity a substring match must exceed to count as good
pub const GOOD_MATCH_THRESHOLD: f64 = 0.6;

/// Length ratio of two strings when one contains the other, otherwise 0.
///
/// Compared lowercase and measured in characters. Empty input scores 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let len_a = a.chars().count();
    let len_b = b.chars().count();

    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    if !a.contains(&b) && !b.contains(&a) {
        return 0.0;
    }

    len_a.min(len_b) as f64 / len_a.max(len_b) as f64
}

fn is_exact_match<T: Titled>(query: &str, candidate: &T) -> bool {
    let query = query.to_lowercase();
    candidate
        .display_names()
        .iter()
        .any(|name| name.to_lowercase() == query)
}

fn best_similarity<T: Titled>(query: &str, candidate: &T) -> f64 {
    candidate
        .display_names()
        .iter()
        .map(|name| similarity(query, name))
        .fold(0.0, f64::max)
}

/// Exact match, or substring similarity above the threshold
pub fn is_good_match<T: Titled>(query: &str, candidate: &T) -> bool {
    is_exact_match(query, candidate) || best_similarity(query, candidate) > GOOD_MATCH_THRESHOLD
}

/// First exact match, else first good similarity match
pub fn find_good_match<'a, T: Titled>(query: &str, candidates: &'a [T]) -> Option<&'a T> {
    candidates
        .iter()
        .find(|c| is_exact_match(query, *c))
        .or_else(|| {
            candidates
                .iter()
                .find(|c| best_similarity(query, *c) > GOOD_MATCH_THRESHOLD)
        })
}

/// Picks the best candidate; falls back to the first one.
///
/// Returns `None` only when `candidates` is empty.
pub fn resolve<'a, T: Titled>(query: &str, candidates: &'a [T]) -> Option<&'a T> {
    find_good_match(query, candidates).or_else(|| candidates.first())
}

/// [`resolve`] with a keyword re-search when nothing in `candidates` is good.
///
/// Each keyword of the query is looked up in turn; the first keyword whose
/// results hold a good match for that keyword wins. Lookup failures are logged
/// and skipped. Without any good match the first original candidate is returned.
pub async fn resolve_with_keywords(
    metadata: &dyn MetadataProvider,
    query: &str,
    candidates: Vec<ContentCandidate>,
) -> Option<ContentCandidate> {
    if let Some(found) = find_good_match(query, &candidates) {
        return Some(found.clone());
    }

    let keywords = query::keywords(query);
    // A single keyword equal to the query would repeat the original search
    let retry: Vec<String> = keywords
        .into_iter()
        .filter(|k| k.to_lowercase() != query.trim().to_lowercase())
        .collect();

    for keyword in retry {
        let normalized = query::normalize(&keyword);
        match search::lookup(metadata, &normalized, 1).await {
            Ok(results) => {
                if let Some(found) = find_good_match(&keyword, &results) {
                    tracing::info!(
                        query = %query,
                        keyword = %keyword,
                        matched = %found.title,
                        "Resolved query through keyword retry"
                    );
                    return Some(found.clone());
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, keyword = %keyword, "Keyword lookup failed");
            }
        }
    }

    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;

    fn candidate(id: u64, title: &str) -> ContentCandidate {
        ContentCandidate {
            id,
            title: title.to_string(),
            original_title: None,
            media_type: MediaType::Movie,
            popularity: 10.0,
            release_date: None,
            poster_path: None,
            overview: None,
        }
    }

    #[test]
    fn test_similarity_substring_ratio() {
        assert_eq!(similarity("avengers", "avengers"), 1.0);
        assert_eq!(similarity("the avengers", "avengers"), 8.0 / 12.0);
        assert_eq!(similarity("avengers", "batman"), 0.0);
    }

    #[test]
    fn test_similarity_counts_characters_not_bytes() {
        // 4 syllables inside 6 characters
        assert_eq!(similarity("어벤저스", "어벤저스 2"), 4.0 / 6.0);
    }

    #[test]
    fn test_similarity_is_symmetric_and_case_insensitive() {
        let pairs = [
            ("Avengers", "The AVENGERS"),
            ("Dune", "dune: part two"),
            ("기생충", "기생충"),
            ("Matrix", "Inception"),
        ];

        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
            assert_eq!(
                similarity(a, b),
                similarity(&a.to_uppercase(), &b.to_uppercase())
            );
        }
    }

    #[test]
    fn test_similarity_empty_is_zero() {
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("", "dune"), 0.0);
    }

    #[test]
    fn test_exact_match_beats_earlier_similarity_match() {
        // Scenario B: "The Avengers" comes first but "Avengers" is exact
        let candidates = vec![candidate(1, "The Avengers"), candidate(2, "Avengers")];
        assert_eq!(resolve("Avengers", &candidates).unwrap().id, 2);
    }

    #[test]
    fn test_exact_match_is_case_insensitive_and_checks_original_title() {
        let mut localized = candidate(7, "기생충");
        localized.original_title = Some("Parasite".to_string());
        let candidates = vec![candidate(1, "Parasite Eve"), localized];

        assert_eq!(resolve("PARASITE", &candidates).unwrap().id, 7);
    }

    #[test]
    fn test_similarity_match_takes_first_above_threshold() {
        let candidates = vec![
            candidate(1, "인터스텔라 메이킹 필름 다큐멘터리"),
            candidate(2, "인터스텔라 2"),
            candidate(3, "인터스텔라 3"),
        ];

        assert_eq!(resolve("인터스텔라", &candidates).unwrap().id, 2);
    }

    #[test]
    fn test_similarity_at_threshold_is_not_good() {
        // 3 / 5 = 0.6 exactly
        let c = candidate(1, "abcde");
        assert!(!is_good_match("abc", &c));
        assert!(is_good_match("abcd", &c));
    }

    #[test]
    fn test_fallback_returns_first_candidate() {
        let candidates = vec![candidate(9, "Totally Different"), candidate(10, "Other")];
        assert_eq!(resolve("matrix", &candidates).unwrap().id, 9);
    }

    #[test]
    fn test_resolve_always_returns_member_of_list() {
        let candidates = vec![
            candidate(1, "Dune"),
            candidate(2, "Dune: Part Two"),
            candidate(3, "Dunkirk"),
        ];

        for query in ["dune", "part two", "Dunkirk", "zzz", "", "d"] {
            let picked = resolve(query, &candidates).unwrap();
            assert!(candidates.iter().any(|c| c == picked), "query {query}");
        }
    }

    #[test]
    fn test_resolve_empty_list_is_none() {
        let candidates: Vec<ContentCandidate> = Vec::new();
        assert!(resolve("anything", &candidates).is_none());
    }
}
