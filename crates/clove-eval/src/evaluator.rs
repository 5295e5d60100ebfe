//! Evaluation orchestrator that mediates between the editor and nREPL.

use std::fmt;
use std::sync::Arc;

use camino::Utf8Path;
use tracing::debug;

use crate::collaborator::{Connection, EditorSurface, NamespaceParser, NotificationLevel, Transport};
use crate::context::{EvalContext, SelectionRange};
use crate::errors::{EvalError, EvalOperation};
use crate::interpreter::ResponseInterpreter;
use crate::output::OutputChannel;
use crate::payload::{DispatchRoute, EvalPayload};
use crate::response::ResponseObject;
use crate::session::Session;
use crate::settings::EvalSettings;

/// Warning shown when an evaluation is requested without a connection.
pub const CONNECT_TO_EVALUATE_MESSAGE: &str = "You should connect to nREPL first to evaluate code.";
/// Warning shown when a reload is requested without a connection.
pub const CONNECT_TO_RELOAD_MESSAGE: &str =
    "You should connect to nREPL first to reload namespace.";

/// How an evaluation cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    /// The code evaluated; results were rendered or a success toast shown.
    Succeeded {
        /// Session closed at the end of the cycle.
        session: String,
    },
    /// The code raised; the stacktrace was rendered.
    Failed {
        /// Session closed at the end of the cycle.
        session: String,
    },
}

impl EvalOutcome {
    /// Session closed at the end of the cycle.
    #[must_use]
    pub fn session(&self) -> &str {
        match self {
            Self::Succeeded { session } | Self::Failed { session } => session.as_str(),
        }
    }
}

/// Collaborators supplied by the editor integration.
pub struct Collaborators {
    /// Connection manager issuing sessions.
    pub connection: Arc<dyn Connection>,
    /// nREPL operations.
    pub transport: Arc<dyn Transport>,
    /// Namespace reader.
    pub parser: Arc<dyn NamespaceParser>,
    /// Output pane and toasts.
    pub surface: Arc<dyn EditorSurface>,
    /// Configuration flags.
    pub settings: Arc<dyn EvalSettings>,
}

#[derive(Debug, Clone, Copy)]
enum CyclePhase {
    RequestBuilt,
    Dispatched,
    SuccessRendered,
    ErrorRendered,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RequestBuilt => "request-built",
            Self::Dispatched => "dispatched",
            Self::SuccessRendered => "success-rendered",
            Self::ErrorRendered => "error-rendered",
        };
        formatter.write_str(label)
    }
}

fn trace_phase(phase: CyclePhase, session: &str) {
    debug!(%phase, session, "evaluation cycle advanced");
}

/// Runs evaluation cycles against an nREPL connection.
///
/// Every cycle resolves its own session and closes it before returning,
/// whether the code succeeded or raised. Cycles may run concurrently; the
/// connection is expected to hand each one a distinct session.
pub struct Evaluator {
    connection: Arc<dyn Connection>,
    transport: Arc<dyn Transport>,
    parser: Arc<dyn NamespaceParser>,
    settings: Arc<dyn EvalSettings>,
    output: OutputChannel,
    interpreter: ResponseInterpreter,
}

impl Evaluator {
    /// Builds an evaluator from the editor's collaborators.
    #[must_use]
    pub fn new(collaborators: Collaborators) -> Self {
        let Collaborators {
            connection,
            transport,
            parser,
            surface,
            settings,
        } = collaborators;
        let output = OutputChannel::new(surface);
        let interpreter =
            ResponseInterpreter::new(Arc::clone(&transport), output.clone(), Arc::clone(&settings));
        Self {
            connection,
            transport,
            parser,
            settings,
            output,
            interpreter,
        }
    }

    /// Evaluates and always renders results in the output pane.
    pub async fn evaluate_and_show(&self, context: &EvalContext) -> Result<EvalOutcome, EvalError> {
        self.evaluate(context, true).await
    }

    /// Evaluates, replacing rendered results with toasts when alerts are on.
    pub async fn evaluate_silently(&self, context: &EvalContext) -> Result<EvalOutcome, EvalError> {
        self.evaluate(context, false).await
    }

    /// Evaluates the selection, or the whole document, in a fresh session.
    ///
    /// Exceptions raised by the code are rendered and reported as
    /// [`EvalOutcome::Failed`]. Connection and transport failures are
    /// returned as errors.
    pub async fn evaluate(
        &self,
        context: &EvalContext,
        emit_results_always: bool,
    ) -> Result<EvalOutcome, EvalError> {
        self.ensure_connected(EvalOperation::Evaluate, CONNECT_TO_EVALUATE_MESSAGE)?;

        let session = self.resolve_session(context.file()).await?;
        let payload = EvalPayload::build(context, self.parser.as_ref());
        if session.kind() != context.session_kind() {
            debug!(
                expected = %context.session_kind(),
                actual = %session.kind(),
                "connection returned a different session kind"
            );
        }
        trace_phase(CyclePhase::RequestBuilt, session.id());

        let route = DispatchRoute::choose(&payload, session.kind());
        let responses = self
            .dispatch(route, &payload, context.file(), &session)
            .await?;
        trace_phase(CyclePhase::Dispatched, session.id());

        self.route_responses(responses, &session, context.active_selection(), emit_results_always)
            .await
    }

    /// Reloads the namespace declared in `full_text`.
    ///
    /// Successful reloads render nothing; exceptions go through the same
    /// rendering as a silent evaluation of the whole document.
    pub async fn reload_namespace(
        &self,
        file: &Utf8Path,
        full_text: &str,
    ) -> Result<EvalOutcome, EvalError> {
        self.ensure_connected(EvalOperation::Reload, CONNECT_TO_RELOAD_MESSAGE)?;

        let session = self.resolve_session(file).await?;
        let namespace = self.parser.namespace_of(full_text);
        let payload = EvalPayload::reload(&namespace);
        trace_phase(CyclePhase::RequestBuilt, session.id());

        let responses = self
            .transport
            .evaluate_text(payload.text(), session.id())
            .await
            .map_err(|source| EvalError::transport(EvalOperation::Reload, source))?;
        trace_phase(CyclePhase::Dispatched, session.id());
        let responses = with_session_ids(responses, &session);

        if let Some(first) = responses.first().filter(|first| first.is_exception()) {
            let failed = first.session_id().unwrap_or(session.id()).to_owned();
            self.interpreter.handle_error(None, false, &failed).await?;
            trace_phase(CyclePhase::ErrorRendered, &failed);
            return Ok(EvalOutcome::Failed { session: failed });
        }

        let closed = last_session(&responses, &session);
        self.interpreter.close(&closed).await;
        debug!(%namespace, session = closed, "namespace reloaded");
        Ok(EvalOutcome::Succeeded { session: closed })
    }

    /// Save hook: reloads the namespace when `auto_reload_namespace_on_save`
    /// is enabled, otherwise does nothing and returns `Ok(None)`.
    pub async fn on_document_saved(
        &self,
        file: &Utf8Path,
        full_text: &str,
    ) -> Result<Option<EvalOutcome>, EvalError> {
        if !self.settings.auto_reload_namespace_on_save() {
            return Ok(None);
        }
        self.reload_namespace(file, full_text).await.map(Some)
    }

    fn ensure_connected(&self, operation: EvalOperation, warning: &str) -> Result<(), EvalError> {
        if self.connection.is_connected() {
            return Ok(());
        }
        self.output.notify(NotificationLevel::Warning, warning);
        Err(EvalError::not_connected(operation))
    }

    async fn resolve_session(&self, file: &Utf8Path) -> Result<Session, EvalError> {
        self.connection
            .session_for_file(file)
            .await
            .map_err(|source| EvalError::session_resolution(file.to_path_buf(), source))
    }

    async fn dispatch(
        &self,
        route: DispatchRoute,
        payload: &EvalPayload,
        file: &Utf8Path,
        session: &Session,
    ) -> Result<Vec<ResponseObject>, EvalError> {
        debug!(?route, kind = %session.kind(), session = session.id(), "dispatching payload");
        let result = match route {
            DispatchRoute::Text => {
                self.transport
                    .evaluate_text(payload.text(), session.id())
                    .await
            }
            DispatchRoute::File => {
                self.transport
                    .evaluate_file(payload.text(), file, session.id())
                    .await
            }
        };
        result
            .map(|responses| with_session_ids(responses, session))
            .map_err(|source| EvalError::transport(route.operation(), source))
    }

    async fn route_responses(
        &self,
        responses: Vec<ResponseObject>,
        session: &Session,
        selection: Option<SelectionRange>,
        emit_results_always: bool,
    ) -> Result<EvalOutcome, EvalError> {
        if let Some(first) = responses.first().filter(|first| first.is_exception()) {
            let failed = first.session_id().unwrap_or(session.id()).to_owned();
            self.interpreter
                .handle_error(selection, emit_results_always, &failed)
                .await?;
            trace_phase(CyclePhase::ErrorRendered, &failed);
            return Ok(EvalOutcome::Failed { session: failed });
        }

        if responses.is_empty() {
            self.interpreter.close(session.id()).await;
            return Ok(EvalOutcome::Succeeded {
                session: session.id().to_owned(),
            });
        }

        self.interpreter
            .handle_success(emit_results_always, &responses)
            .await;
        let closed = last_session(&responses, session);
        trace_phase(CyclePhase::SuccessRendered, &closed);
        Ok(EvalOutcome::Succeeded { session: closed })
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Evaluator")
            .field("connection", &self.connection)
            .field("transport", &self.transport)
            .field("interpreter", &self.interpreter)
            .finish_non_exhaustive()
    }
}

/// Fills in the cycle's session id on responses that omitted it.
fn with_session_ids(mut responses: Vec<ResponseObject>, session: &Session) -> Vec<ResponseObject> {
    for response in &mut responses {
        if response.session_id().is_none() {
            response.session = Some(session.id().to_owned());
        }
    }
    responses
}

fn last_session(responses: &[ResponseObject], session: &Session) -> String {
    responses
        .last()
        .and_then(ResponseObject::session_id)
        .unwrap_or(session.id())
        .to_owned()
}
