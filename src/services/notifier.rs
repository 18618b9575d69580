use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// How loud a notification is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Surfaces a message to the user
///
/// Implementations present the message before returning; there is no
/// failure mode and no return value.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Which notifier the binary installs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    Console,
    Log,
}

/// Writes notifications to stderr and flushes before returning
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        let prefix = match severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        let mut stderr = std::io::stderr().lock();
        // Nowhere left to report a failing stderr
        let _ = writeln!(stderr, "[{}] {}", prefix, message);
        let _ = stderr.flush();
    }
}

/// Routes notifications into the tracing pipeline
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::info!(target: "petswipe::notify", "{}", message),
            Severity::Warning => tracing::warn!(target: "petswipe::notify", "{}", message),
            Severity::Error => tracing::error!(target: "petswipe::notify", "{}", message),
        }
    }
}

/// Keeps every notification in memory, for embedders that render their own toasts
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|(_, m)| m).collect()
    }

    pub fn take(&self) -> Vec<(Severity, String)> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((severity, message.to_string()));
    }
}
