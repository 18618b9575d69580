//! Petswipe - swipe-style decision client for the pet adoption browser
//!
//! The crate couples a card's exit animation to the backend decision request
//! and rolls the card back when that request fails. Pages are held in a small
//! in-memory document model so the same state machine can be driven from a
//! terminal, a test, or an embedding UI.

pub mod config;
pub mod core;
pub mod dom;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{ActionController, CardRenderer, DecisionOutcome, EventBinder, RenderOutcome, Session};
pub use crate::models::{Candidate, CandidateId, DecisionKind, PageMode};
pub use crate::services::{DecisionBackend, HttpBackend, Notifier, Severity};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Root re-exports reach the model types
        assert_eq!(DecisionKind::Heart.endpoint(), "adopt");
        assert_eq!(CandidateId::from(7).as_str(), "7");
    }
}
