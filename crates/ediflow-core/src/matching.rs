//! Reference matching over an owner-scoped candidate set
//!
//! The caller has already filtered candidates by owner (typically in the
//! query predicate); ownership is not re-checked here. Input order is the
//! only tie-break: the first candidate whose primary or secondary key equals
//! the target key wins.

use crate::types::{Candidate, MatchRequest, MatchResult};
use tracing::{debug, trace};

/// Return the first candidate whose primary or secondary key equals the target key.
///
/// Returns [`MatchResult::NoMatch`] immediately when the request lacks a target
/// key or an owner id, even if the candidates contain a true match.
pub fn match_reference(request: &MatchRequest, candidates: &[Candidate]) -> MatchResult {
    if request.target_key.is_empty() {
        debug!("Target key is empty, skipping match");
        return MatchResult::NoMatch;
    }
    if request.owner_id.is_empty() {
        debug!("Owner id is empty, skipping match");
        return MatchResult::NoMatch;
    }

    debug!(
        target_key = %request.target_key,
        owner_id = %request.owner_id,
        candidates = candidates.len(),
        "Matching reference against candidates"
    );

    for candidate in candidates {
        trace!(
            candidate_id = %candidate.id,
            primary_key = ?candidate.primary_key,
            secondary_key = ?candidate.secondary_key,
            "Checking candidate"
        );

        if candidate.matches_key(&request.target_key) {
            debug!(candidate_id = %candidate.id, "Match found");
            return MatchResult::Matched {
                candidate_id: candidate.id.clone(),
            };
        }
    }

    debug!(target_key = %request.target_key, "No candidate matched");
    MatchResult::NoMatch
}
