//! Derives the stock-photo search query from a generated pack.

use crate::domain::GeneratedAdventurePack;

const MAX_QUERY_TOKENS: usize = 6;
const MAX_PROMPT_TOKENS: usize = 3;
const MIN_PROMPT_TOKEN_CHARS: usize = 4;
const FIXED_SUFFIX: [&str; 2] = ["children", "adventure"];

/// Builds a bounded keyword query: adventure type, place and tone (when
/// present), up to three significant words from the image prompt, then the
/// fixed suffix, truncated to six tokens. Never returns an empty string.
pub fn build_search_query(pack: &GeneratedAdventurePack) -> String {
    let mut tokens: Vec<String> = Vec::with_capacity(MAX_QUERY_TOKENS + 2);

    if let Some(kind) = pack.adventure_type {
        tokens.push(kind.as_str().to_string());
    }
    if let Some(place) = pack.place {
        tokens.push(place.as_str().to_string());
    }
    if let Some(tone) = pack.tone {
        tokens.push(tone.as_str().to_string());
    }

    tokens.extend(
        pack.image
            .prompt
            .to_lowercase()
            .split_whitespace()
            .filter(|word| word.chars().count() >= MIN_PROMPT_TOKEN_CHARS)
            .take(MAX_PROMPT_TOKENS)
            .map(str::to_string),
    );

    tokens.extend(FIXED_SUFFIX.iter().map(|s| s.to_string()));
    tokens.truncate(MAX_QUERY_TOKENS);
    tokens.join(" ")
}
