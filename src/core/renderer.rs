use crate::core::binder::EventBinder;
use crate::dom::contract::{
    list_card_id, CANDIDATE_ID_ATTR, CARD_ID, CONTAINER_ID, EXHAUSTED_MESSAGE, HEART_BUTTON_CLASS,
    HEART_BUTTON_ID, SKIP_BUTTON_CLASS, SKIP_BUTTON_ID,
};
use crate::dom::{Element, SharedDocument};
use crate::models::{Candidate, CandidateId, NextCandidate};
use crate::services::DecisionBackend;
use std::sync::Arc;

/// Result of asking the feed for the next candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A new card for this candidate is mounted and bound
    Mounted(CandidateId),
    /// The feed is empty; the container shows the exhaustion message
    Exhausted,
    /// The page has no card container
    NoContainer,
    /// The feed could not be fetched; the page is unchanged
    Failed,
}

/// Fetches the next candidate and mounts its card on the index page
pub struct CardRenderer {
    document: SharedDocument,
    backend: Arc<dyn DecisionBackend>,
    binder: EventBinder,
}

impl CardRenderer {
    pub fn new(
        document: SharedDocument,
        backend: Arc<dyn DecisionBackend>,
        binder: EventBinder,
    ) -> Self {
        Self {
            document,
            backend,
            binder,
        }
    }

    pub fn binder(&self) -> &EventBinder {
        &self.binder
    }

    /// Replace the index card with the next candidate from the feed
    ///
    /// Fetch failures are only logged: nothing was changed optimistically,
    /// so there is nothing to roll back.
    pub async fn load_next(&self) -> RenderOutcome {
        let next = match self.backend.next_candidate().await {
            Ok(next) => next,
            Err(e) => {
                tracing::error!("Error loading next pet: {}", e);
                return RenderOutcome::Failed;
            }
        };

        let (content, outcome) = match next {
            NextCandidate::Exhausted => (render_exhausted(), RenderOutcome::Exhausted),
            NextCandidate::Available(candidate) => (
                render_card(&candidate),
                RenderOutcome::Mounted(candidate.id),
            ),
        };

        let mounted = self.document.update(|doc| match doc.get_element_by_id_mut(CONTAINER_ID) {
            Some(container) => {
                container.replace_children(vec![content]);
                true
            }
            None => false,
        });

        if !mounted {
            tracing::warn!("No #{} on the page, dropping the next pet", CONTAINER_ID);
            return RenderOutcome::NoContainer;
        }

        match &outcome {
            RenderOutcome::Mounted(id) => {
                self.binder.bind();
                tracing::info!("Mounted next pet {}", id);
            }
            _ => tracing::info!("No more pets available"),
        }

        outcome
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn bubble(label: &str, value: &Option<String>) -> Element {
    Element::new("p")
        .with_class("bubble")
        .with_text(format!("{}: {}", label, field(value)))
}

/// Card markup for the index page
pub fn render_card(candidate: &Candidate) -> Element {
    let id = candidate.id.as_str();

    let mut details = vec![
        Element::new("img")
            .with_attr("src", field(&candidate.image_url))
            .with_attr("alt", field(&candidate.name)),
        Element::new("h2").with_text(field(&candidate.name)),
        bubble("Gender", &candidate.gender),
        bubble("Age", &candidate.age),
        bubble("Size", &candidate.size),
    ];
    if candidate.breed.is_some() {
        details.push(bubble("Breed", &candidate.breed));
    }
    details.push(Element::new("p").with_text(field(&candidate.description)));

    let buttons = Element::new("div")
        .with_class("btns")
        .with_child(
            Element::new("a")
                .with_id(SKIP_BUTTON_ID)
                .with_class("btn")
                .with_class("btn-danger")
                .with_attr("href", format!("/skip/{}", id))
                .with_text("❌"),
        )
        .with_child(
            Element::new("a")
                .with_id(HEART_BUTTON_ID)
                .with_class("btn")
                .with_class("btn-success")
                .with_class("me-2")
                .with_attr("href", format!("/adopt/{}", id))
                .with_text("❤️"),
        );

    Element::new("div")
        .with_id(CARD_ID)
        .with_class("pet-card")
        .with_attr(CANDIDATE_ID_ATTR, id)
        .with_children(details)
        .with_child(buttons)
}

/// Card markup for the hearted and previous list pages
pub fn render_list_card(candidate: &Candidate) -> Element {
    let id = candidate.id.as_str();

    let control = |class: &str, endpoint: &str, label: &str| {
        Element::new("a")
            .with_class("btn")
            .with_class(class)
            .with_attr(CANDIDATE_ID_ATTR, id)
            .with_attr("href", format!("/{}/{}", endpoint, id))
            .with_text(label)
    };

    Element::new("div")
        .with_id(list_card_id(id))
        .with_class("pet-card")
        .with_attr(CANDIDATE_ID_ATTR, id)
        .with_child(
            Element::new("img")
                .with_attr("src", field(&candidate.image_url))
                .with_attr("alt", field(&candidate.name)),
        )
        .with_child(Element::new("h2").with_text(field(&candidate.name)))
        .with_child(Element::new("p").with_text(field(&candidate.description)))
        .with_child(
            Element::new("div")
                .with_class("btns")
                .with_child(control(SKIP_BUTTON_CLASS, "skip", "❌"))
                .with_child(control(HEART_BUTTON_CLASS, "adopt", "❤️")),
        )
}

/// Terminal empty state of the index page
pub fn render_exhausted() -> Element {
    Element::new("p").with_text(EXHAUSTED_MESSAGE)
}
