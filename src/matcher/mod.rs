//! Free-text track lookup.
//!
//! A query is split into tokens; a track matches when every token appears
//! somewhere in its label, ignoring case. When several tracks match, the
//! pick prefers original versions over remixes and acapellas, but only when
//! that still leaves a real choice.

use rand::Rng;
use rand::seq::IndexedRandom;
use smallvec::SmallVec;

use crate::catalogue::Catalogue;

/// Token that matches every track.
pub const WILDCARD: &str = "***";

/// Characters removed from each query token.
const STRIPPED: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')', '\'', '"',
];

/// Label fragments marking an alternate version of a track.
const ALTERNATE_MARKERS: &[&str] = &["remix", "acapella"];

/// Normalized query tokens.
pub type QueryTokens = SmallVec<[String; 4]>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("query has no search terms")]
    EmptyQuery,
}

/// Normalize a raw query into tokens.
///
/// A word made only of punctuation becomes an empty token, which every
/// label contains. Only blank input yields no tokens at all.
pub fn tokenize(raw: &str) -> QueryTokens {
    raw.split_whitespace()
        .map(|word| {
            if word == WILDCARD {
                return WILDCARD.to_string();
            }
            word.chars()
                .filter(|c| !STRIPPED.contains(c))
                .flat_map(char::to_lowercase)
                .collect()
        })
        .collect()
}

/// Indices of every track whose label contains all tokens, in catalogue order.
pub fn find_candidates(catalogue: &Catalogue, tokens: &[String]) -> Result<Vec<usize>, MatchError> {
    if tokens.is_empty() {
        return Err(MatchError::EmptyQuery);
    }

    let terms: SmallVec<[&str; 4]> = tokens
        .iter()
        .map(String::as_str)
        .filter(|t| *t != WILDCARD)
        .collect();

    Ok(catalogue
        .iter()
        .filter(|entry| terms.iter().all(|t| entry.folded().contains(t)))
        .map(|entry| entry.index)
        .collect())
}

/// Whether a candidate is an original version (not a remix or acapella).
fn is_original(catalogue: &Catalogue, index: usize) -> bool {
    catalogue
        .get(index)
        .is_some_and(|e| !ALTERNATE_MARKERS.iter().any(|m| e.folded().contains(m)))
}

/// Candidates the pick draws from.
///
/// This is the remix-free subset when it holds at least two tracks, and the
/// full candidate list otherwise.
pub fn preferred_pool(catalogue: &Catalogue, candidates: &[usize]) -> Vec<usize> {
    if candidates.len() <= 1 {
        return candidates.to_vec();
    }
    let originals: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&i| is_original(catalogue, i))
        .collect();
    if originals.len() > 1 {
        originals
    } else {
        candidates.to_vec()
    }
}

/// Pick one track among the candidates, or `None` when there are none.
pub fn choose_candidate<R: Rng + ?Sized>(
    catalogue: &Catalogue,
    candidates: &[usize],
    rng: &mut R,
) -> Option<usize> {
    match candidates {
        [] => None,
        [only] => Some(*only),
        _ => preferred_pool(catalogue, candidates).choose(rng).copied(),
    }
}
