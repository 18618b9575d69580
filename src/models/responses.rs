use serde::{Deserialize, Serialize};
use crate::models::domain::Candidate;

/// Body of `GET /next-pet`
///
/// The backend answers either `{"no_more": true}` or a bare candidate object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NextPetResponse {
    Exhausted { no_more: bool },
    Candidate(Candidate),
}

/// What the feed has to offer next
#[derive(Debug, Clone, PartialEq)]
pub enum NextCandidate {
    Available(Candidate),
    Exhausted,
}

/// Acknowledgement sent by the backend for AJAX decision requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionAck {
    pub status: String,
}
