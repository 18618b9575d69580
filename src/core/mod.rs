// Interaction core exports
pub mod binder;
pub mod controller;
pub mod renderer;
pub mod session;
pub mod state;

pub use binder::EventBinder;
pub use controller::{ActionController, ActionError, PendingDecision};
pub use renderer::{render_card, render_exhausted, render_list_card, CardRenderer, RenderOutcome};
pub use session::Session;
pub use state::{DecisionFailure, DecisionOutcome, InteractionState};
