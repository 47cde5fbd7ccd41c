//! Query normalization shared by search, resolution and the curated catalog.

const HANGUL_SYLLABLES: std::ops::RangeInclusive<char> = '\u{AC00}'..='\u{D7A3}';

/// A cleaned search query plus the script hint used to pick a search strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub cleaned: String,
    pub is_korean: bool,
}

impl NormalizedQuery {
    pub fn is_empty(&self) -> bool {
        self.cleaned.is_empty()
    }
}

pub fn is_hangul_syllable(c: char) -> bool {
    HANGUL_SYLLABLES.contains(&c)
}

fn is_kept(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c.is_whitespace() || is_hangul_syllable(c)
}

/// Strips punctuation and symbols, collapses whitespace runs and trims.
pub fn normalize(raw: &str) -> NormalizedQuery {
    let stripped: String = raw.chars().filter(|c| is_kept(*c)).collect();
    let cleaned = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let is_korean = cleaned.chars().any(is_hangul_syllable);

    NormalizedQuery { cleaned, is_korean }
}

/// Distinct whitespace-delimited keywords of at least two characters, in query order.
pub fn keywords(query: &str) -> Vec<String> {
    let cleaned = normalize(query).cleaned;
    let mut seen = std::collections::HashSet::new();

    cleaned
        .split(' ')
        .filter(|word| word.chars().count() >= 2)
        .filter(|word| seen.insert(word.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Lookup key for curated per-title tables: lowercase, no punctuation, no spaces.
pub fn title_key(title: &str) -> String {
    normalize(title)
        .cleaned
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
