//! Ediflow Core - Reference matching for inbound EDI documents
//!
//! This crate correlates an inbound transactional document (for example a
//! purchase-order change) with the record it refers to (for example a sales
//! order), using a reference key that may live in either of two fields on
//! the candidate records.
//!
//! # Main Components
//!
//! - **Matching**: [`match_reference`], a pure first-match-wins scan over an
//!   owner-scoped candidate list
//! - **Linking**: [`link_related_record`], the host flow that fetches
//!   candidates, matches, and writes a single-field partial update
//! - **Error Handling**: [`Error`] for the fetch and write collaborators
//!
//! # Example
//!
//! ```
//! use ediflow_core::{match_reference, Candidate, MatchRequest, MatchResult};
//!
//! let request = MatchRequest::new("PO-100", "CUST-1");
//! let candidates = vec![
//!     Candidate::new("SO-1", Some("PO-099"), None),
//!     Candidate::new("SO-2", None, Some("PO-100")),
//! ];
//!
//! assert_eq!(
//!     match_reference(&request, &candidates),
//!     MatchResult::Matched { candidate_id: "SO-2".to_string() }
//! );
//! ```

pub mod error;
pub mod link;
pub mod matching;
pub mod types;

pub use error::{Error, Result};
pub use link::{
    link_related_record, CandidateSource, InMemoryCandidateSource, LinkOptions, LinkOutcome,
    RecordingWriter, RelatedRecordWriter, SkipReason, UnavailableSource,
};
pub use matching::match_reference;
pub use types::{
    Candidate, CandidateQuery, InboundDocument, MatchRequest, MatchResult, OwnedCandidate,
    RelatedUpdate, CANDIDATE_PAGE_LIMIT, DEFAULT_RELATED_FIELD,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
