//! Confidence scoring for candidate/query name pairs.
//!
//! The score is an ordinal ranking heuristic on [0, 100], not a
//! probability. Full first+last agreement scores highest; a bare
//! surname query is deliberately demoted so common surnames ("Allen",
//! "Jackson") cannot produce false confidence. The individual branch
//! constants below are empirically tuned cut-offs, not derived values;
//! adjust them together with the resolver threshold.

use crate::matching::normalize::{normalize, parts};

/// Minimum score the resolver accepts as a match.
pub const MIN_CONFIDENCE: u32 = 50;

/// Score for exact equality after normalisation.
const EXACT: u32 = 100;

/// Similarity for containment when the shorter part has >= 4 chars.
const CONTAIN_LONG: u32 = 90;

/// Similarity for containment when the shorter part has exactly 3 chars.
const CONTAIN_SHORT: u32 = 70;

/// Interior parts of 3+ part names must each reach this similarity.
const MIDDLE_PART_FLOOR: u32 = 70;

/// Surname-only queries need at least this similarity to count at all.
const SURNAME_FLOOR: u32 = 90;

/// Demotion applied to surname-only matches.
const SURNAME_PENALTY: u32 = 30;

/// Fallback when the candidate contains the whole query string.
const RAW_CONTAINS_QUERY: u32 = 40;

/// Fallback when the query contains the whole candidate string.
const QUERY_CONTAINS_RAW: u32 = 35;

/// Scale factor for common-prefix similarity.
const PREFIX_WEIGHT: f64 = 60.0;

/// Score how well a candidate display name matches a user query.
pub fn match_score(candidate: &str, query: &str) -> u32 {
    let cand_norm = normalize(candidate);
    let query_norm = normalize(query);

    if cand_norm == query_norm && !cand_norm.is_empty() {
        return EXACT;
    }

    let cand_parts = parts(&cand_norm);
    let query_parts = parts(&query_norm);

    if cand_parts.len() >= 2 && query_parts.len() >= 2 {
        // Multi-part vs multi-part: part counts must agree exactly, so a
        // two-part query can never claim a three-part name at full
        // confidence ("josh allen" vs "josh hines allen").
        if cand_parts.len() != query_parts.len() {
            return 0;
        }

        let first = cand_parts[0];
        let last = cand_parts[cand_parts.len() - 1];
        let q_first = query_parts[0];
        let q_last = query_parts[query_parts.len() - 1];

        let first_match = first.contains(q_first) || q_first.contains(first);
        let last_match = last.contains(q_last) || q_last.contains(last);

        if first_match && last_match {
            if cand_parts.len() >= 3 {
                for i in 1..cand_parts.len() - 1 {
                    if part_similarity(cand_parts[i], query_parts[i]) < MIDDLE_PART_FLOOR {
                        return 0;
                    }
                }
            }
            let first_score = part_similarity(first, q_first);
            let last_score = part_similarity(last, q_last);
            return (first_score + last_score) / 2;
        }
    }

    // Surname-only search against a full name.
    if query_parts.len() == 1 && cand_parts.len() >= 2 {
        let last = cand_parts[cand_parts.len() - 1];
        let last_score = part_similarity(last, query_parts[0]);
        if last_score >= SURNAME_FLOOR {
            return last_score - SURNAME_PENALTY;
        }
    }

    // Fallback: whole-string containment on the raw (case-folded) input.
    let cand_raw = candidate.to_lowercase();
    let query_raw = query.to_lowercase();
    if !query_raw.is_empty() && cand_raw.contains(&query_raw) {
        return RAW_CONTAINS_QUERY;
    }
    if !cand_raw.is_empty() && query_raw.contains(&cand_raw) {
        return QUERY_CONTAINS_RAW;
    }

    0
}

/// Similarity between two single name parts, on [0, 100].
///
/// Identical parts score 100; containment scores by the length of the
/// shorter part; otherwise the longest shared prefix of length >= 3
/// scores proportionally to how much of the shorter part it covers.
pub fn part_similarity(a: &str, b: &str) -> u32 {
    if a == b {
        return EXACT;
    }

    if a.contains(b) || b.contains(a) {
        let shorter = a.len().min(b.len());
        if shorter >= 4 {
            return CONTAIN_LONG;
        }
        if shorter >= 3 {
            return CONTAIN_SHORT;
        }
    }

    let min_len = a.len().min(b.len());
    if min_len >= 3 {
        let a_bytes = a.as_bytes();
        let b_bytes = b.as_bytes();
        for i in (3..=min_len).rev() {
            if a_bytes[..i] == b_bytes[..i] {
                return (i as f64 / min_len as f64 * PREFIX_WEIGHT).round() as u32;
            }
        }
    }

    0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
