//! Abstractions over the editor, connection, transport and parser.
//!
//! The evaluator owns none of these concerns. Editor integrations implement
//! the traits on top of their own nREPL client and UI, and tests inject
//! recording doubles.

use std::error::Error;
use std::fmt;

use async_trait::async_trait;
use camino::Utf8Path;
use thiserror::Error;

use crate::response::{ResponseObject, StacktraceInfo};
use crate::session::Session;

/// Errors reported by collaborator implementations.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CollaboratorError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl CollaboratorError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-friendly description without the optional source.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// nREPL operations the evaluator sends over an established connection.
///
/// Each evaluation resolves to the ordered responses the server produced
/// before reporting `done`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends an `eval` op with raw code.
    async fn evaluate_text(
        &self,
        text: &str,
        session: &str,
    ) -> Result<Vec<ResponseObject>, CollaboratorError>;

    /// Sends a `load-file` op so stacktraces point at the real file.
    async fn evaluate_file(
        &self,
        text: &str,
        file: &Utf8Path,
        session: &str,
    ) -> Result<Vec<ResponseObject>, CollaboratorError>;

    /// Requests the stacktrace of the last exception raised in `session`.
    async fn fetch_stacktrace(
        &self,
        session: &str,
    ) -> Result<Vec<StacktraceInfo>, CollaboratorError>;

    /// Closes `session`. Failures are the transport's to log.
    async fn close_session(&self, session: &str);
}

/// Connection manager that hands out sessions.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Whether a live nREPL connection exists.
    fn is_connected(&self) -> bool;

    /// Returns a fresh session suited to `file` (Clojure or ClojureScript).
    async fn session_for_file(&self, file: &Utf8Path) -> Result<Session, CollaboratorError>;
}

/// Reads the namespace declared by a Clojure source text.
pub trait NamespaceParser: Send + Sync {
    /// Namespace of `text`, e.g. `my.app.core`.
    fn namespace_of(&self, text: &str) -> String;
}

/// Severity of a transient editor notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Informational toast.
    Info,
    /// Warning toast.
    Warning,
    /// Error toast.
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        formatter.write_str(label)
    }
}

/// Editor UI the evaluator writes to: an append-only output pane plus toasts.
pub trait EditorSurface: Send + Sync {
    /// Appends raw text to the output pane.
    fn append(&self, text: &str);

    /// Appends text followed by a line break.
    fn append_line(&self, line: &str);

    /// Brings the output pane into view.
    fn show(&self);

    /// Shows a transient notification.
    fn notify(&self, level: NotificationLevel, message: &str);
}

impl fmt::Debug for dyn Transport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Transport")
    }
}

impl fmt::Debug for dyn Connection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Connection")
    }
}
