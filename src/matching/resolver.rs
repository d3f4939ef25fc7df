//! Best-candidate selection over a provider batch.
//!
//! Scans candidates in batch order, scores each against the query, and
//! keeps the maximum. Ties keep the earliest-seen record, so results
//! are deterministic for a given batch ordering. Anything under
//! `MIN_CONFIDENCE` is treated as not found, which is an expected
//! outcome for misspelled or absent names, not a failure.

use tracing::debug;

use crate::matching::scorer::{match_score, MIN_CONFIDENCE};

/// The winning candidate of a resolution scan and its confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult<'a, T> {
    pub record: &'a T,
    pub score: u32,
}

/// Find the best-scoring candidate for `query`, or `None` when nothing
/// reaches the confidence threshold. `name_of` projects each record to
/// the display name being matched.
pub fn resolve<'a, T>(
    candidates: &'a [T],
    query: &str,
    name_of: impl Fn(&T) -> &str,
) -> Option<MatchResult<'a, T>> {
    let mut best: Option<MatchResult<'a, T>> = None;

    for candidate in candidates {
        let score = match_score(name_of(candidate), query);
        let improved = match &best {
            None => score > 0,
            Some(current) => score > current.score,
        };
        if improved {
            debug!(
                candidate = name_of(candidate),
                score,
                query,
                "new best match"
            );
            best = Some(MatchResult { record: candidate, score });
        }
    }

    match best {
        Some(result) if result.score >= MIN_CONFIDENCE => Some(result),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
