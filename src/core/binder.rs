use crate::core::controller::ActionController;
use crate::dom::contract::{
    CANDIDATE_ID_ATTR, CARD_ID, HEART_BUTTON_CLASS, HEART_BUTTON_ID, SKIP_BUTTON_CLASS,
    SKIP_BUTTON_ID,
};
use crate::dom::{ClickEvent, Document, Element, Listener, NodeId, SharedDocument};
use crate::models::{CandidateId, DecisionKind, PageMode};
use std::sync::{Arc, Weak};

/// Key under which the decision handler is attached to a control
pub const DECISION_LISTENER: &str = "decision";

/// A control found on the page and what clicking it should do
#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    node: NodeId,
    kind: DecisionKind,
    mode: PageMode,
    candidate_id: Option<CandidateId>,
}

/// Attaches click handlers to whatever controls the page currently holds
///
/// Rendering never carries handlers over, so this runs after every render.
/// Controls that already have the decision handler are left alone.
pub struct EventBinder {
    document: SharedDocument,
    controller: Weak<ActionController>,
}

impl EventBinder {
    pub fn new(document: SharedDocument, controller: Weak<ActionController>) -> Self {
        Self {
            document,
            controller,
        }
    }

    /// Bind every unbound control; returns how many controls were newly bound
    pub fn bind(&self) -> usize {
        self.document.update(|doc| {
            let bindings = discover(doc);
            let mut bound = 0;
            for binding in bindings {
                let Some(control) = doc.get_element_mut(binding.node) else {
                    continue;
                };
                let node = binding.node;
                if control.add_listener(DECISION_LISTENER, self.handler(binding)) {
                    bound += 1;
                } else {
                    tracing::trace!("Control {:?} already bound", node);
                }
            }
            tracing::debug!("Bound {} decision controls", bound);
            bound
        })
    }

    fn handler(&self, binding: Binding) -> Listener {
        let controller = self.controller.clone();
        Arc::new(move |event: &mut ClickEvent| {
            event.prevent_default();
            match controller.upgrade() {
                Some(controller) => {
                    // The pending task runs on its own; nothing to wait for here
                    let _ = controller.decide(binding.candidate_id.clone(), binding.kind, binding.mode);
                }
                None => tracing::debug!("Click on {:?} after the page was torn down", event.target()),
            }
        })
    }
}

fn discover(doc: &Document) -> Vec<Binding> {
    let mut bindings = Vec::new();

    // Index page: fixed controls, only meaningful while the card is mounted
    if doc.get_element_by_id(CARD_ID).is_some() {
        let skip = doc.get_element_by_id(SKIP_BUTTON_ID).map(Element::node_id);
        let heart = doc.get_element_by_id(HEART_BUTTON_ID).map(Element::node_id);
        if let (Some(skip), Some(heart)) = (skip, heart) {
            bindings.push(Binding {
                node: skip,
                kind: DecisionKind::Skip,
                mode: PageMode::Index,
                candidate_id: None,
            });
            bindings.push(Binding {
                node: heart,
                kind: DecisionKind::Heart,
                mode: PageMode::Index,
                candidate_id: None,
            });
        }
    }

    // List pages: any number of marked controls, each naming its candidate
    for (class, kind) in [
        (SKIP_BUTTON_CLASS, DecisionKind::Skip),
        (HEART_BUTTON_CLASS, DecisionKind::Heart),
    ] {
        for node in doc.query_class(class) {
            let candidate_id = doc
                .get_element(node)
                .and_then(|el| el.attr(CANDIDATE_ID_ATTR))
                .map(CandidateId::new);
            match candidate_id {
                Some(id) if !id.is_empty() => bindings.push(Binding {
                    node,
                    kind,
                    mode: PageMode::List,
                    candidate_id: Some(id),
                }),
                _ => tracing::debug!("Skipping {} control without {}", class, CANDIDATE_ID_ATTR),
            }
        }
    }

    bindings
}
