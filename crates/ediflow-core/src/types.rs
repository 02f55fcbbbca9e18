//! Core data types for reference matching and record linking

use serde::{Deserialize, Serialize};

/// Maximum number of candidate rows a single owner-scoped query returns
pub const CANDIDATE_PAGE_LIMIT: usize = 1000;

/// Field written on the originating record when a match is found
pub const DEFAULT_RELATED_FIELD: &str = "related_record";

/// Key material taken from the inbound document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    /// Reference the candidates are matched against (e.g. a PO number)
    pub target_key: String,
    /// Owner/context the candidate set is scoped to (e.g. a customer id)
    pub owner_id: String,
}

impl MatchRequest {
    pub fn new(target_key: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            target_key: target_key.into(),
            owner_id: owner_id.into(),
        }
    }

    /// Both the target key and the owner id are non-empty
    pub fn is_complete(&self) -> bool {
        !self.target_key.is_empty() && !self.owner_id.is_empty()
    }
}

/// One retrieved record eligible for matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    #[serde(default)]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub secondary_key: Option<String>,
}

impl Candidate {
    pub fn new(
        id: impl Into<String>,
        primary_key: Option<&str>,
        secondary_key: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            primary_key: primary_key.map(str::to_string),
            secondary_key: secondary_key.map(str::to_string),
        }
    }

    /// Exact equality on either key; an absent key never matches
    pub fn matches_key(&self, key: &str) -> bool {
        self.primary_key.as_deref() == Some(key) || self.secondary_key.as_deref() == Some(key)
    }
}

/// Outcome of a single match request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MatchResult {
    Matched {
        #[serde(rename = "candidateId")]
        candidate_id: String,
    },
    NoMatch,
}

impl MatchResult {
    pub fn candidate_id(&self) -> Option<&str> {
        match self {
            Self::Matched { candidate_id } => Some(candidate_id),
            Self::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// A candidate together with the owner it belongs to, as stored by a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedCandidate {
    pub owner_id: String,
    #[serde(flatten)]
    pub candidate: Candidate,
}

/// Owner-scoped query handed to a candidate source.
///
/// Selects rows where `owner == owner_id AND (primary == target_key OR secondary == target_key)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    pub owner_id: String,
    pub target_key: String,
    pub limit: usize,
}

impl CandidateQuery {
    pub fn for_request(request: &MatchRequest, limit: usize) -> Self {
        Self {
            owner_id: request.owner_id.clone(),
            target_key: request.target_key.clone(),
            limit,
        }
    }
}

/// Single-field partial update of the originating record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedUpdate {
    pub record_id: String,
    pub field: String,
    pub value: String,
}

/// The inbound document whose related-record field gets populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundDocument {
    pub id: String,
    #[serde(default)]
    pub target_key: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
}

impl InboundDocument {
    pub fn match_request(&self) -> MatchRequest {
        MatchRequest::new(
            self.target_key.clone().unwrap_or_default(),
            self.owner_id.clone().unwrap_or_default(),
        )
    }
}
