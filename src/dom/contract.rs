//! Names shared with the page markup.
//!
//! The markup is produced elsewhere; these are the only hooks the client
//! relies on.

/// Wrapper around the single card on the index page
pub const CONTAINER_ID: &str = "pet-container";

/// The single card on the index page
pub const CARD_ID: &str = "pet-card";

pub const SKIP_BUTTON_ID: &str = "skip-btn";
pub const HEART_BUTTON_ID: &str = "heart-btn";

/// Class marker of list-page skip controls
pub const SKIP_BUTTON_CLASS: &str = "skip-btn";
/// Class marker of list-page heart controls
pub const HEART_BUTTON_CLASS: &str = "heart-btn";

/// Attribute holding the candidate id on cards and list controls
pub const CANDIDATE_ID_ATTR: &str = "data-pet-id";

pub const SWIPE_LEFT_CLASS: &str = "swipe-left";
pub const SWIPE_RIGHT_CLASS: &str = "swipe-right";

pub const EXHAUSTED_MESSAGE: &str = "No more pets available. Come back later!";

/// Element id of a list-page card
pub fn list_card_id(candidate_id: &str) -> String {
    format!("pet-{}", candidate_id)
}
