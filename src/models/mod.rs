// Model exports
pub mod domain;
pub mod responses;

pub use domain::{Candidate, CandidateId, DecisionKind, Direction, PageMode};
pub use responses::{DecisionAck, NextCandidate, NextPetResponse};
