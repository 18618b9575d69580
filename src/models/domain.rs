use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque candidate identifier
///
/// The backend sends integer ids, the markup carries them as strings. Both
/// forms deserialize into the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawCandidateId", into = "String")]
pub struct CandidateId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCandidateId {
    Text(String),
    Number(i64),
}

impl From<RawCandidateId> for CandidateId {
    fn from(raw: RawCandidateId) -> Self {
        match raw {
            RawCandidateId::Text(s) => CandidateId(s),
            RawCandidateId::Number(n) => CandidateId(n.to_string()),
        }
    }
}

impl From<CandidateId> for String {
    fn from(id: CandidateId) -> Self {
        id.0
    }
}

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<i64> for CandidateId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

/// A pet presented to the user for a decision
///
/// Read-only on the client; only the backend decides what comes next.
/// Every field but the id may be null or missing in a feed body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Candidate {
    /// A card can only be decided on if it names its candidate
    pub fn verify(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("empty candidate id".to_string());
        }
        Ok(())
    }
}

/// Which page the controls live on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Single-card browsing page that advances to the next candidate
    Index,
    /// Hearted/previous list where each card is removed on its own
    List,
}

/// Direction of the exit animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ExitLeft,
    ExitRight,
}

impl Direction {
    /// CSS class that plays this animation
    pub fn class(self) -> &'static str {
        match self {
            Direction::ExitLeft => crate::dom::contract::SWIPE_LEFT_CLASS,
            Direction::ExitRight => crate::dom::contract::SWIPE_RIGHT_CLASS,
        }
    }

    pub fn from_class(class: &str) -> Option<Self> {
        match class {
            crate::dom::contract::SWIPE_LEFT_CLASS => Some(Direction::ExitLeft),
            crate::dom::contract::SWIPE_RIGHT_CLASS => Some(Direction::ExitRight),
            _ => None,
        }
    }
}

/// The user's choice for a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Skip,
    Heart,
}

impl DecisionKind {
    pub fn direction(self) -> Direction {
        match self {
            DecisionKind::Skip => Direction::ExitLeft,
            DecisionKind::Heart => Direction::ExitRight,
        }
    }

    /// First path segment of the decision endpoint
    pub fn endpoint(self) -> &'static str {
        match self {
            DecisionKind::Skip => "skip",
            DecisionKind::Heart => "adopt",
        }
    }

    /// Message shown when the backend answers with a non-success status
    pub fn rejected_message(self) -> &'static str {
        match self {
            DecisionKind::Skip => "Error skipping pet.",
            DecisionKind::Heart => "Error hearting pet.",
        }
    }

    /// Message shown when the request never completed
    pub fn unreachable_message(self) -> &'static str {
        match self {
            DecisionKind::Skip => "Failed to skip pet.",
            DecisionKind::Heart => "Failed to heart pet.",
        }
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionKind::Skip => f.write_str("skip"),
            DecisionKind::Heart => f.write_str("heart"),
        }
    }
}

impl FromStr for DecisionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(DecisionKind::Skip),
            "heart" => Ok(DecisionKind::Heart),
            other => Err(other.to_string()),
        }
    }
}
