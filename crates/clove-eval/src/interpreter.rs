//! Interpretation of evaluation responses.
//!
//! Successful evaluations are rendered line by line in arrival order.
//! Exceptions trigger a stacktrace request whose positions are mapped back
//! onto the document before rendering. Both paths end by closing the
//! session used for the cycle.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::collaborator::{CollaboratorError, NotificationLevel, Transport};
use crate::context::SelectionRange;
use crate::errors::EvalError;
use crate::output::{OutputBatch, OutputChannel};
use crate::response::{ResponseObject, StacktraceInfo};
use crate::settings::EvalSettings;

/// Toast shown for a failed silent evaluation.
pub const COMPILATION_ERROR_MESSAGE: &str = "Compilation error";
/// Toast shown for a successful silent evaluation.
pub const COMPILATION_SUCCESS_MESSAGE: &str = "Successfully compiled";

/// Zero-based document position of a reported exception.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorPosition {
    /// Line in the document.
    pub line: u32,
    /// Column in the document.
    pub column: u32,
}

impl ErrorPosition {
    /// Converts the server's 1-based position, defaulting missing parts to 0.
    #[must_use]
    pub fn from_reported(line: Option<u32>, column: Option<u32>) -> Self {
        Self {
            line: line.map_or(0, |value| value.saturating_sub(1)),
            column: column.map_or(0, |value| value.saturating_sub(1)),
        }
    }

    /// Shifts the position by the start of the evaluated selection.
    ///
    /// The column shift is only exact for exceptions on the selection's first
    /// line.
    #[must_use]
    pub fn rebase(self, selection: Option<SelectionRange>) -> Self {
        match selection.filter(|range| !range.is_empty()) {
            Some(range) => {
                let (line, column) = range.start();
                Self {
                    line: self.line.saturating_add(line),
                    column: self.column.saturating_add(column),
                }
            }
            None => self,
        }
    }
}

impl fmt::Display for ErrorPosition {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.line, self.column)
    }
}

/// Formats an exception as output lines.
///
/// Only frames flagged `tooling` are listed, in reported order.
#[must_use]
pub fn render_stacktrace(info: &StacktraceInfo, position: ErrorPosition) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", info.class, info.message),
        format!(" at {}:{position}", info.file),
    ];
    lines.extend(
        info.frames
            .iter()
            .filter(|frame| frame.is_tooling())
            .map(|frame| {
                let line = frame
                    .line
                    .map_or_else(|| String::from("?"), |value| value.to_string());
                format!(
                    "    {}.{} ({}:{line})",
                    frame.class, frame.method, frame.file
                )
            }),
    );
    lines
}

/// Renders responses and tears sessions down.
pub struct ResponseInterpreter {
    transport: Arc<dyn Transport>,
    output: OutputChannel,
    settings: Arc<dyn EvalSettings>,
}

impl ResponseInterpreter {
    /// Builds an interpreter writing to `output`.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        output: OutputChannel,
        settings: Arc<dyn EvalSettings>,
    ) -> Self {
        Self {
            transport,
            output,
            settings,
        }
    }

    fn alerts_replace_output(&self, emit_results_always: bool) -> bool {
        !emit_results_always && self.settings.effective_alert_on_eval()
    }

    /// Renders the exception raised in `session` and closes the session.
    ///
    /// The session is closed only after the stacktrace has been fetched. When
    /// the fetch fails the session is left open and the error is returned.
    pub async fn handle_error(
        &self,
        selection: Option<SelectionRange>,
        emit_results_always: bool,
        session: &str,
    ) -> Result<(), EvalError> {
        if self.alerts_replace_output(emit_results_always) {
            self.output
                .notify(NotificationLevel::Error, COMPILATION_ERROR_MESSAGE);
        }

        let info = match self.fetch_stacktrace(session).await {
            Ok(info) => info,
            Err(error) => {
                warn!(session, %error, "stacktrace fetch failed; session left open");
                return Err(error);
            }
        };

        let position = ErrorPosition::from_reported(info.line, info.column).rebase(selection);
        let mut batch = OutputBatch::default();
        for line in render_stacktrace(&info, position) {
            batch.append_line(line);
        }
        self.output.flush(batch).await;
        debug!(session, class = %info.class, %position, "rendered evaluation exception");

        self.close(session).await;
        Ok(())
    }

    /// Renders a successful response sequence and closes its session.
    ///
    /// The session closed is the one reported by the last response.
    pub async fn handle_success(&self, emit_results_always: bool, responses: &[ResponseObject]) {
        if self.alerts_replace_output(emit_results_always) {
            self.output
                .notify(NotificationLevel::Info, COMPILATION_SUCCESS_MESSAGE);
        } else {
            self.output.present(render_responses(responses)).await;
        }

        match responses.last().and_then(ResponseObject::session_id) {
            Some(session) => self.close(session).await,
            None => warn!("responses carried no session id; nothing to close"),
        }
    }

    /// Closes a session.
    pub async fn close(&self, session: &str) {
        self.transport.close_session(session).await;
        debug!(session, "session closed");
    }

    async fn fetch_stacktrace(&self, session: &str) -> Result<StacktraceInfo, EvalError> {
        let reports = self
            .transport
            .fetch_stacktrace(session)
            .await
            .map_err(|source| EvalError::stacktrace_fetch(session, source))?;
        reports.into_iter().next().ok_or_else(|| {
            EvalError::stacktrace_fetch(
                session,
                CollaboratorError::new("server returned no stacktrace"),
            )
        })
    }
}

impl fmt::Debug for ResponseInterpreter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ResponseInterpreter")
            .field("transport", &self.transport)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

fn render_responses(responses: &[ResponseObject]) -> OutputBatch {
    let mut batch = OutputBatch::default();
    for response in responses {
        if let Some(out) = response.stdout() {
            batch.append(out);
        }
        if let Some(err) = response.stderr() {
            batch.append(err);
        }
        if let Some(value) = response.printed_value() {
            batch.append_line(format!("=> {value}"));
        }
    }
    batch
}
