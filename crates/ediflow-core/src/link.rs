//! Related-record linking around the reference matcher
//!
//! `link_related_record` is the host flow for an inbound document: check the
//! key material, fetch owner-scoped candidates, match, and write the matched
//! id back with a single-field partial update. Fetching and writing sit
//! behind [`CandidateSource`] and [`RelatedRecordWriter`].

use crate::error::{Error, Result};
use crate::matching::match_reference;
use crate::types::{
    Candidate, CandidateQuery, InboundDocument, MatchResult, OwnedCandidate, RelatedUpdate,
    CANDIDATE_PAGE_LIMIT, DEFAULT_RELATED_FIELD,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Source of owner-scoped candidate records
pub trait CandidateSource {
    /// Run the owner-scoped query. Results are returned in the source's order.
    fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<Candidate>>;
}

/// Sink for the single-field partial update of the originating record
pub trait RelatedRecordWriter {
    fn write_related(&mut self, update: &RelatedUpdate) -> Result<()>;
}

/// Options for the link workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkOptions {
    /// Field on the originating record that receives the matched id
    pub related_field: String,
    /// Maximum number of candidates requested from the source
    pub page_limit: usize,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            related_field: DEFAULT_RELATED_FIELD.to_string(),
            page_limit: CANDIDATE_PAGE_LIMIT,
        }
    }
}

/// Why a document was not processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingTargetKey,
    MissingOwnerId,
}

/// Outcome of linking one inbound document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LinkOutcome {
    /// Key material missing; nothing was fetched or written
    Skipped { reason: SkipReason },
    /// A candidate matched and the partial update was written
    Linked { update: RelatedUpdate },
    /// No candidate matched; the related field is left blank
    Unlinked { candidates_checked: usize },
    /// A candidate matched but the write failed
    WriteFailed { update: RelatedUpdate, message: String },
}

impl LinkOutcome {
    pub fn is_linked(&self) -> bool {
        matches!(self, Self::Linked { .. })
    }
}

/// Link an inbound document to the first matching candidate record.
///
/// Fetch failures are logged and treated as an empty candidate set, so the
/// document ends up `Unlinked` rather than failing the caller.
#[instrument(skip(source, writer, options), fields(document = %document.id))]
pub fn link_related_record<S, W>(
    document: &InboundDocument,
    source: &S,
    writer: &mut W,
    options: &LinkOptions,
) -> LinkOutcome
where
    S: CandidateSource + ?Sized,
    W: RelatedRecordWriter + ?Sized,
{
    let request = document.match_request();

    if request.target_key.is_empty() {
        debug!("Target key is empty, skipping processing");
        return LinkOutcome::Skipped { reason: SkipReason::MissingTargetKey };
    }
    if request.owner_id.is_empty() {
        debug!("Owner id is empty, skipping processing");
        return LinkOutcome::Skipped { reason: SkipReason::MissingOwnerId };
    }

    let query = CandidateQuery::for_request(&request, options.page_limit);
    let candidates = match source.fetch_candidates(&query) {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(error = %e, "Candidate fetch failed, treating as no candidates");
            Vec::new()
        }
    };
    debug!(count = candidates.len(), "Fetched candidates");

    match match_reference(&request, &candidates) {
        MatchResult::Matched { candidate_id } => {
            let update = RelatedUpdate {
                record_id: document.id.clone(),
                field: options.related_field.clone(),
                value: candidate_id,
            };
            match writer.write_related(&update) {
                Ok(()) => {
                    info!(
                        candidate_id = %update.value,
                        field = %update.field,
                        "Related record set"
                    );
                    LinkOutcome::Linked { update }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to write related record");
                    LinkOutcome::WriteFailed {
                        message: e.to_string(),
                        update,
                    }
                }
            }
        }
        MatchResult::NoMatch => {
            info!(
                target_key = %request.target_key,
                owner_id = %request.owner_id,
                "No matching record found, field left blank"
            );
            LinkOutcome::Unlinked { candidates_checked: candidates.len() }
        }
    }
}

/// Candidate source backed by an in-memory list of owned rows.
///
/// Applies the same predicate an external query would and keeps insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCandidateSource {
    rows: Vec<OwnedCandidate>,
}

impl InMemoryCandidateSource {
    pub fn new(rows: Vec<OwnedCandidate>) -> Self {
        Self { rows }
    }

    /// Load rows from a JSON array of owned candidates
    pub fn from_json(json: &str) -> Result<Self> {
        let rows: Vec<OwnedCandidate> = serde_json::from_str(json)?;
        Ok(Self::new(rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl CandidateSource for InMemoryCandidateSource {
    fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<Candidate>> {
        Ok(self
            .rows
            .iter()
            .filter(|row| row.owner_id == query.owner_id)
            .filter(|row| row.candidate.matches_key(&query.target_key))
            .take(query.limit)
            .map(|row| row.candidate.clone())
            .collect())
    }
}

/// Writer that records updates in memory instead of applying them
#[derive(Debug, Clone, Default)]
pub struct RecordingWriter {
    pub updates: Vec<RelatedUpdate>,
}

impl RelatedRecordWriter for RecordingWriter {
    fn write_related(&mut self, update: &RelatedUpdate) -> Result<()> {
        self.updates.push(update.clone());
        Ok(())
    }
}

impl<F> RelatedRecordWriter for F
where
    F: FnMut(&RelatedUpdate) -> Result<()>,
{
    fn write_related(&mut self, update: &RelatedUpdate) -> Result<()> {
        self(update)
    }
}

/// Source that always fails; used where the upstream query is unavailable
#[derive(Debug, Clone, Default)]
pub struct UnavailableSource {
    pub message: String,
}

impl CandidateSource for UnavailableSource {
    fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<Candidate>> {
        Err(Error::candidate_fetch(query.owner_id.clone(), self.message.clone()))
    }
}
