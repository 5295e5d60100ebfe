//! BDD test world encapsulating the evaluator and its doubles.

use camino::Utf8PathBuf;
use clove_config::Config;
use tokio::runtime::{Builder, Runtime};

use crate::context::{EvalContext, SelectionRange};
use crate::errors::EvalError;
use crate::evaluator::EvalOutcome;
use crate::response::ResponseObject;
use crate::session::{Session, SessionKind};

use super::{
    Harness, RecordingConnection, RecordingSurface, RecordingTransportHandle, ResponseSet,
    SAMPLE_FILE, SAMPLE_NAMESPACE, sample_document, sample_stacktrace,
};

/// Shared state exercised by BDD step implementations.
pub struct TestWorld {
    runtime: Runtime,
    /// Whether the connection is live.
    pub connected: bool,
    /// Session issued by the connection.
    pub session: Session,
    /// Namespace reported by the parser.
    pub namespace: String,
    /// Document text.
    pub document: String,
    /// Document path.
    pub file: Utf8PathBuf,
    /// Settings seen by the evaluator.
    pub config: Config,
    /// Canned transport answers.
    pub responses: ResponseSet,
    /// Selected text of the last selection evaluation.
    pub last_selection: Option<String>,
    /// Outcome of the last command.
    pub last_outcome: Option<EvalOutcome>,
    /// Whether the last save triggered a reload.
    pub last_save_reloaded: Option<bool>,
    /// Error of the last command.
    pub last_error: Option<EvalError>,
    transport: Option<RecordingTransportHandle>,
    surface: Option<RecordingSurface>,
}

impl TestWorld {
    /// Builds a disconnected world around the sample document.
    ///
    /// # Panics
    ///
    /// Panics when the test runtime cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let runtime = Builder::new_current_thread()
            .build()
            .unwrap_or_else(|error| panic!("failed to build test runtime: {error}"));
        Self {
            runtime,
            connected: false,
            session: Session::new("unused", SessionKind::Clojure),
            namespace: String::from(SAMPLE_NAMESPACE),
            document: sample_document(),
            file: Utf8PathBuf::from(SAMPLE_FILE),
            config: Config::default(),
            responses: ResponseSet::default(),
            last_selection: None,
            last_outcome: None,
            last_save_reloaded: None,
            last_error: None,
            transport: None,
            surface: None,
        }
    }

    /// Connects the world with a session of the given kind.
    pub fn connect(&mut self, id: &str, kind: SessionKind) {
        self.connected = true;
        self.session = Session::new(id, kind);
    }

    /// Makes the server answer evaluations with a single value.
    pub fn answer_value(&mut self, value: &str) {
        self.responses.evaluation = vec![
            ResponseObject::default()
                .with_value(value)
                .with_session(self.session.id()),
        ];
    }

    /// Makes the server raise and report the given stacktrace.
    pub fn raise(&mut self, class: &str, message: &str, file: &str, line: u32, column: u32) {
        self.responses.evaluation = vec![
            ResponseObject::default()
                .with_exception(class)
                .with_session(self.session.id()),
        ];
        let mut report = sample_stacktrace(class, message, file, Some(line));
        report.column = Some(column);
        self.responses.stacktraces = vec![report];
    }

    /// Evaluates the whole document.
    pub fn evaluate_document(&mut self, emit_results_always: bool) {
        let context = EvalContext::new(self.document.clone(), self.file.clone(), self.session.kind());
        self.evaluate(&context, emit_results_always);
    }

    /// Appends `text` to the document on its own line and evaluates it.
    pub fn evaluate_selection(&mut self, text: &str, emit_results_always: bool) {
        let line = u32::try_from(self.document.lines().count())
            .unwrap_or_else(|error| panic!("document too long: {error}"));
        let width = u32::try_from(text.chars().count())
            .unwrap_or_else(|error| panic!("selection too long: {error}"));
        self.document.push_str(text);
        self.document.push('\n');
        self.last_selection = Some(text.to_owned());
        let context = EvalContext::new(self.document.clone(), self.file.clone(), self.session.kind())
            .with_selection(SelectionRange::new(line, 0, line, width));
        self.evaluate(&context, emit_results_always);
    }

    /// Evaluates a selection of `(/ 1 0)` placed at `line`/`character`.
    pub fn evaluate_selection_at(&mut self, line: u32, character: u32) {
        let form = "(/ 1 0)";
        let mut document = String::from("(ns my.ns)\n");
        for _ in 1..line {
            document.push('\n');
        }
        document.push_str(&" ".repeat(usize::try_from(character).unwrap_or_default()));
        document.push_str(form);
        document.push('\n');
        self.document = document;
        self.last_selection = Some(form.to_owned());
        let end = character + 7;
        let context = EvalContext::new(self.document.clone(), self.file.clone(), self.session.kind())
            .with_selection(SelectionRange::new(line, character, line, end));
        self.evaluate(&context, true);
    }

    /// Runs the namespace reload command.
    pub fn reload(&mut self) {
        let harness = self.harness();
        let result = self
            .runtime
            .block_on(harness.evaluator.reload_namespace(&self.file, &self.document));
        self.record(result);
    }

    /// Runs the save hook.
    pub fn save(&mut self) {
        let harness = self.harness();
        let result = self
            .runtime
            .block_on(harness.evaluator.on_document_saved(&self.file, &self.document));
        match result {
            Ok(outcome) => {
                self.last_save_reloaded = Some(outcome.is_some());
                self.last_outcome = outcome;
            }
            Err(error) => self.last_error = Some(error),
        }
    }

    /// Transport call log of the last command.
    ///
    /// # Panics
    ///
    /// Panics when no command has run.
    pub fn transport(&self) -> &RecordingTransportHandle {
        self.transport
            .as_ref()
            .unwrap_or_else(|| panic!("no command has run"))
    }

    /// Output pane of the last command.
    ///
    /// # Panics
    ///
    /// Panics when no command has run.
    pub fn surface(&self) -> &RecordingSurface {
        self.surface
            .as_ref()
            .unwrap_or_else(|| panic!("no command has run"))
    }

    fn evaluate(&mut self, context: &EvalContext, emit_results_always: bool) {
        let harness = self.harness();
        let result = self
            .runtime
            .block_on(harness.evaluator.evaluate(context, emit_results_always));
        self.record(result);
    }

    fn record(&mut self, result: Result<EvalOutcome, EvalError>) {
        self.last_outcome = None;
        self.last_error = None;
        match result {
            Ok(outcome) => self.last_outcome = Some(outcome),
            Err(error) => self.last_error = Some(error),
        }
    }

    fn harness(&mut self) -> Harness {
        let connection = if self.connected {
            RecordingConnection::connected(vec![self.session.clone()])
        } else {
            RecordingConnection::disconnected()
        };
        let harness = Harness::new(
            connection,
            self.responses.clone(),
            &self.namespace,
            self.config.clone(),
        );
        self.transport = Some(harness.transport.clone());
        self.surface = Some(harness.surface.clone());
        harness
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}
