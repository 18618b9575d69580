use crate::config::InteractionSettings;
use crate::core::controller::ActionController;
use crate::core::renderer::{render_card, render_list_card, RenderOutcome};
use crate::dom::contract::{
    CANDIDATE_ID_ATTR, CONTAINER_ID, HEART_BUTTON_CLASS, HEART_BUTTON_ID, SKIP_BUTTON_CLASS,
    SKIP_BUTTON_ID,
};
use crate::dom::{ClickEvent, Document, Element, SharedDocument};
use crate::models::{Candidate, CandidateId, DecisionKind, PageMode};
use crate::services::{DecisionBackend, Notifier};
use std::sync::Arc;

/// One open page: its document, the controller acting on it, and its mode
pub struct Session {
    document: SharedDocument,
    controller: Arc<ActionController>,
    mode: PageMode,
}

impl Session {
    pub fn new(
        document: Document,
        mode: PageMode,
        backend: Arc<dyn DecisionBackend>,
        notifier: Arc<dyn Notifier>,
        settings: &InteractionSettings,
    ) -> Self {
        let document = SharedDocument::new(document);
        let controller = ActionController::new(
            document.clone(),
            backend,
            notifier,
            settings.transition_delay(),
        );
        let session = Self {
            document,
            controller,
            mode,
        };
        session.bootstrap();
        session
    }

    /// Index page, optionally with a server-rendered first card
    pub fn index(
        first: Option<&Candidate>,
        backend: Arc<dyn DecisionBackend>,
        notifier: Arc<dyn Notifier>,
        settings: &InteractionSettings,
    ) -> Self {
        let container = Element::new("div")
            .with_id(CONTAINER_ID)
            .with_children(first.map(render_card));
        Self::new(
            Document::with_body(vec![container]),
            PageMode::Index,
            backend,
            notifier,
            settings,
        )
    }

    /// Hearted/previous page listing already-decided candidates
    pub fn list(
        candidates: &[Candidate],
        backend: Arc<dyn DecisionBackend>,
        notifier: Arc<dyn Notifier>,
        settings: &InteractionSettings,
    ) -> Self {
        let list = Element::new("div")
            .with_class("pet-list")
            .with_children(candidates.iter().map(render_list_card));
        Self::new(
            Document::with_body(vec![list]),
            PageMode::List,
            backend,
            notifier,
            settings,
        )
    }

    /// Initial bind once the page is loaded
    pub fn bootstrap(&self) -> usize {
        self.controller.binder().bind()
    }

    /// Fetch a card for an index page that was served empty
    pub async fn load_first(&self) -> RenderOutcome {
        self.controller.renderer().load_next().await
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn controller(&self) -> &Arc<ActionController> {
        &self.controller
    }

    pub fn mode(&self) -> PageMode {
        self.mode
    }

    /// Click the skip or heart control, the way a user would
    ///
    /// On the index page `candidate_id` is ignored; on a list page it picks
    /// the card. Returns `None` when no such control is on the page.
    pub fn click(&self, kind: DecisionKind, candidate_id: Option<&CandidateId>) -> Option<ClickEvent> {
        let node = self.document.read(|doc| match self.mode {
            PageMode::Index => {
                let id = match kind {
                    DecisionKind::Skip => SKIP_BUTTON_ID,
                    DecisionKind::Heart => HEART_BUTTON_ID,
                };
                doc.get_element_by_id(id).map(Element::node_id)
            }
            PageMode::List => {
                let class = match kind {
                    DecisionKind::Skip => SKIP_BUTTON_CLASS,
                    DecisionKind::Heart => HEART_BUTTON_CLASS,
                };
                let wanted = candidate_id?.as_str();
                doc.query_class(class).into_iter().find(|node| {
                    doc.get_element(*node)
                        .and_then(|el| el.attr(CANDIDATE_ID_ATTR))
                        == Some(wanted)
                })
            }
        })?;
        self.document.click(node)
    }

    /// Ids of the candidates whose cards are on the page, in page order
    pub fn visible_candidates(&self) -> Vec<CandidateId> {
        self.document.read(|doc| {
            let mut cards = Vec::new();
            doc.body().find_all(
                &|el: &Element| el.has_class("pet-card") && el.attr(CANDIDATE_ID_ATTR).is_some(),
                &mut cards,
            );
            cards
                .into_iter()
                .filter_map(|el| el.attr(CANDIDATE_ID_ATTR))
                .map(CandidateId::new)
                .collect()
        })
    }

    /// Text of the index container (or the whole page in list mode)
    pub fn describe(&self) -> String {
        self.document.read(|doc| {
            doc.get_element_by_id(CONTAINER_ID)
                .unwrap_or_else(|| doc.body())
                .text_content()
        })
    }
}
