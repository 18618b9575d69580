use crate::dom::Element;
use crate::models::Direction;

/// Visible interaction state of a card
///
/// Never stored: it is read off the card's classes, and a card that is no
/// longer in the page has been committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Animating(Direction),
    Committed,
}

impl InteractionState {
    pub fn of(card: Option<&Element>) -> Self {
        let Some(card) = card else {
            return InteractionState::Committed;
        };
        card.classes()
            .iter()
            .find_map(|class| Direction::from_class(class))
            .map_or(InteractionState::Idle, InteractionState::Animating)
    }

    pub fn is_idle(self) -> bool {
        self == InteractionState::Idle
    }
}

/// Why a decision was rolled back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionFailure {
    /// The backend answered with a non-success status
    Rejected { status: Option<u16> },
    /// The request never completed
    Unreachable,
}

/// How a single `decide` call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// The backend accepted the decision and the card was removed or replaced
    Committed,
    /// The request failed and the card is back to idle
    RolledBack(DecisionFailure),
    /// No request was sent because the card had no identifier left to send
    Dropped,
    /// The pending task was cancelled
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_read_from_classes() {
        let idle = Element::new("div").with_class("pet-card");
        let left = Element::new("div").with_class("pet-card").with_class("swipe-left");
        let right = Element::new("div").with_class("swipe-right");

        assert_eq!(InteractionState::of(Some(&idle)), InteractionState::Idle);
        assert_eq!(
            InteractionState::of(Some(&left)),
            InteractionState::Animating(Direction::ExitLeft)
        );
        assert_eq!(
            InteractionState::of(Some(&right)),
            InteractionState::Animating(Direction::ExitRight)
        );
        assert_eq!(InteractionState::of(None), InteractionState::Committed);
    }
}
