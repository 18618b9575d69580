// Service exports
pub mod backend;
pub mod notifier;

pub use backend::{BackendError, DecisionBackend, HttpBackend};
pub use notifier::{ConsoleNotifier, LogNotifier, MemoryNotifier, Notifier, NotifierKind, Severity};
