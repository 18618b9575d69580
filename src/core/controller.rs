use crate::core::binder::EventBinder;
use crate::core::renderer::CardRenderer;
use crate::core::state::{DecisionFailure, DecisionOutcome};
use crate::dom::contract::{list_card_id, CANDIDATE_ID_ATTR, CARD_ID};
use crate::dom::{Document, Element, NodeId, SharedDocument};
use crate::models::{CandidateId, DecisionKind, PageMode};
use crate::services::{BackendError, DecisionBackend, Notifier, Severity};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Errors returned by the controller's entry points
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("Unknown decision kind: {0}")]
    UnknownKind(String),
}

/// Outcome of the synchronous first phase of `decide`
enum Start {
    Missing,
    Busy(NodeId),
    Animating(NodeId, u64),
}

/// Handle to a decision whose request has not resolved yet
///
/// Dropping the handle detaches the task; it still runs to completion.
pub struct PendingDecision {
    card: NodeId,
    kind: DecisionKind,
    token: u64,
    controller: Arc<ActionController>,
    task: JoinHandle<DecisionOutcome>,
}

impl fmt::Debug for PendingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingDecision")
            .field("card", &self.card)
            .field("kind", &self.kind)
            .field("token", &self.token)
            .field("finished", &self.task.is_finished())
            .finish()
    }
}

impl PendingDecision {
    pub fn card(&self) -> NodeId {
        self.card
    }

    pub fn kind(&self) -> DecisionKind {
        self.kind
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Abort the decision and put the card back to rest
    ///
    /// Only acts while this decision still owns the card. Once it has
    /// settled the card is left as is, even if a later decision is now
    /// animating it.
    pub fn cancel(&self) {
        self.task.abort();
        let class = self.kind.direction().class();
        if self.controller.settle(self.card, self.token, Some(class)) {
            tracing::debug!("Cancelled {} for card {:?}", self.kind, self.card);
        }
    }

    /// Wait for the decision to settle
    pub async fn outcome(self) -> DecisionOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => DecisionOutcome::Cancelled,
            Err(e) => {
                tracing::error!("Decision task for {:?} failed: {}", self.card, e);
                DecisionOutcome::Dropped
            }
        }
    }
}

/// Drives one card from idle through its exit animation to commit or rollback
///
/// # Phases
/// 1. Animating: the exit class is applied as soon as `decide` is called
/// 2. Committing: after the transition delay the decision is sent; success
///    removes (list) or replaces (index) the card, failure notifies the user
///    and clears the exit class again
pub struct ActionController {
    document: SharedDocument,
    backend: Arc<dyn DecisionBackend>,
    notifier: Arc<dyn Notifier>,
    renderer: CardRenderer,
    transition_delay: Duration,
    /// Cards with a decision between click and settlement, by token
    in_flight: Mutex<HashMap<NodeId, u64>>,
    next_token: AtomicU64,
}

impl ActionController {
    pub fn new(
        document: SharedDocument,
        backend: Arc<dyn DecisionBackend>,
        notifier: Arc<dyn Notifier>,
        transition_delay: Duration,
    ) -> Arc<Self> {
        Arc::new_cyclic(|controller| {
            let binder = EventBinder::new(document.clone(), controller.clone());
            Self {
                renderer: CardRenderer::new(document.clone(), Arc::clone(&backend), binder),
                document,
                backend,
                notifier,
                transition_delay,
                in_flight: Mutex::new(HashMap::new()),
                next_token: AtomicU64::new(1),
            }
        })
    }

    pub fn binder(&self) -> &EventBinder {
        self.renderer.binder()
    }

    pub fn renderer(&self) -> &CardRenderer {
        &self.renderer
    }

    pub fn transition_delay(&self) -> Duration {
        self.transition_delay
    }

    /// `decide` for callers holding the kind as text
    pub fn decide_named(
        self: &Arc<Self>,
        candidate_id: Option<CandidateId>,
        kind: &str,
        mode: PageMode,
    ) -> Result<Option<PendingDecision>, ActionError> {
        let kind = kind.parse::<DecisionKind>().map_err(|unknown| {
            tracing::warn!("Unknown animation type: {}", unknown);
            ActionError::UnknownKind(unknown)
        })?;
        Ok(self.decide(candidate_id, kind, mode))
    }

    /// Start a decision for a card
    ///
    /// Returns `None` without touching the page when the card is not
    /// present or another decision for it has not settled yet. A card whose
    /// decision committed but whose successor never arrived stays on the
    /// page and accepts a new decision.
    pub fn decide(
        self: &Arc<Self>,
        candidate_id: Option<CandidateId>,
        kind: DecisionKind,
        mode: PageMode,
    ) -> Option<PendingDecision> {
        let class = kind.direction().class();

        let start = self.document.update(|doc| {
            let Some(card) = resolve_card(doc, candidate_id.as_ref(), mode) else {
                return Start::Missing;
            };
            let node = card.node_id();
            let mut in_flight = self.in_flight();
            if in_flight.contains_key(&node) {
                return Start::Busy(node);
            }
            let token = self.next_token.fetch_add(1, Ordering::Relaxed);
            in_flight.insert(node, token);
            card.add_class(class);
            Start::Animating(node, token)
        });

        let (card, token) = match start {
            Start::Missing => {
                tracing::debug!("No card for {} {:?} in {:?} mode", kind, candidate_id, mode);
                return None;
            }
            Start::Busy(node) => {
                tracing::debug!("Card {:?} has a decision in flight, ignoring {}", node, kind);
                return None;
            }
            Start::Animating(node, token) => (node, token),
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!("Cannot schedule {} decision: {}", kind, e);
                self.settle(card, token, Some(class));
                return None;
            }
        };

        let controller = Arc::clone(self);
        let task = runtime.spawn(async move {
            let outcome = controller.commit(card, candidate_id, kind, mode).await;
            // A committed card keeps its exit class until it is replaced
            let leftover = match outcome {
                DecisionOutcome::Committed => None,
                _ => Some(class),
            };
            controller.settle(card, token, leftover);
            outcome
        });

        Some(PendingDecision {
            card,
            kind,
            token,
            controller: Arc::clone(self),
            task,
        })
    }

    async fn commit(
        &self,
        card: NodeId,
        candidate_id: Option<CandidateId>,
        kind: DecisionKind,
        mode: PageMode,
    ) -> DecisionOutcome {
        // Let the exit animation finish before anything else changes
        tokio::time::sleep(self.transition_delay).await;

        let candidate_id = match candidate_id.or_else(|| self.card_identifier(card)) {
            Some(id) => id,
            None => {
                tracing::warn!("Card {:?} has no candidate id, dropping {}", card, kind);
                return DecisionOutcome::Dropped;
            }
        };

        match self.backend.submit_decision(kind, &candidate_id).await {
            Ok(()) => {
                tracing::info!("Committed {} for pet {}", kind, candidate_id);
                match mode {
                    PageMode::Index => {
                        self.renderer.load_next().await;
                    }
                    PageMode::List => {
                        self.document.update(|doc| doc.remove_element(card));
                    }
                }
                DecisionOutcome::Committed
            }
            Err(e) => {
                let failure = classify(&e);
                let message = match failure {
                    DecisionFailure::Rejected { .. } => kind.rejected_message(),
                    DecisionFailure::Unreachable => kind.unreachable_message(),
                };
                tracing::warn!("{} for pet {} failed: {}", kind, candidate_id, e);
                self.notifier.notify(Severity::Error, message);
                DecisionOutcome::RolledBack(failure)
            }
        }
    }

    /// Read at request time so ids assigned after binding are honoured
    fn card_identifier(&self, card: NodeId) -> Option<CandidateId> {
        self.document
            .read(|doc| {
                doc.get_element(card)
                    .and_then(|el| el.attr(CANDIDATE_ID_ATTR))
                    .map(CandidateId::new)
            })
            .filter(|id| !id.is_empty())
    }

    /// Release the card if `token` still owns it, clearing `class` when given
    ///
    /// Takes the page lock before the in-flight table, like `decide`.
    fn settle(&self, card: NodeId, token: u64, class: Option<&str>) -> bool {
        self.document.update(|doc| {
            {
                let mut in_flight = self.in_flight();
                if in_flight.get(&card) != Some(&token) {
                    return false;
                }
                in_flight.remove(&card);
            }
            if let (Some(class), Some(el)) = (class, doc.get_element_mut(card)) {
                el.remove_class(class);
            }
            true
        })
    }

    fn in_flight(&self) -> MutexGuard<'_, HashMap<NodeId, u64>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn resolve_card<'a>(
    doc: &'a mut Document,
    candidate_id: Option<&CandidateId>,
    mode: PageMode,
) -> Option<&'a mut Element> {
    match mode {
        PageMode::Index => doc.get_element_by_id_mut(CARD_ID),
        PageMode::List => doc.get_element_by_id_mut(&list_card_id(candidate_id?.as_str())),
    }
}

fn classify(error: &BackendError) -> DecisionFailure {
    match error {
        e if e.is_transport() => DecisionFailure::Unreachable,
        BackendError::Rejected { status } => DecisionFailure::Rejected {
            status: Some(*status),
        },
        BackendError::RequestError(e) => DecisionFailure::Rejected {
            status: e.status().map(|s| s.as_u16()),
        },
        _ => DecisionFailure::Rejected { status: None },
    }
}
