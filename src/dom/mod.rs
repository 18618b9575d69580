// In-memory page model
pub mod contract;
pub mod document;

pub use document::{ClickEvent, Document, Element, Listener, NodeId, SharedDocument};
