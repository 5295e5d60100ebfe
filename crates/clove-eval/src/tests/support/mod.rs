//! Shared fixtures and helpers for evaluator tests.

mod recording_surface;
mod world;

use std::sync::Arc;

use clove_config::Config;
use rstest::fixture;

use crate::evaluator::{Collaborators, Evaluator};
use crate::response::{StacktraceFrame, StacktraceInfo};
use crate::session::Session;

pub use recording_surface::{FixedNamespaceParser, RecordingSurface, SurfaceEvent};
pub use recording_transport::{
    RecordingConnection, RecordingTransport, RecordingTransportHandle, ResponseSet, TransportCall,
};
pub use world::TestWorld;

/// Path of the document used across tests.
pub const SAMPLE_FILE: &str = "src/my/ns.clj";

/// Namespace declared by [`sample_document`].
pub const SAMPLE_NAMESPACE: &str = "my.ns";

/// Small Clojure document.
#[fixture]
pub fn sample_document() -> String {
    String::from("(ns my.ns)\n\n(defn f [x]\n  (+ x 1))\n")
}

/// Stacktrace with one tooling frame and one library frame.
#[must_use]
pub fn sample_stacktrace(class: &str, message: &str, file: &str, line: Option<u32>) -> StacktraceInfo {
    StacktraceInfo {
        class: class.to_owned(),
        message: message.to_owned(),
        file: file.to_owned(),
        line,
        column: line.map(|_| 1),
        frames: vec![
            StacktraceFrame {
                class: String::from("core"),
                method: String::from("f"),
                file: String::from("core.clj"),
                line: Some(5),
                flags: vec![String::from("clj"), String::from("tooling")],
            },
            StacktraceFrame {
                class: String::from("clojure.lang.Compiler"),
                method: String::from("eval"),
                file: String::from("Compiler.java"),
                line: Some(7177),
                flags: vec![String::from("java")],
            },
        ],
    }
}

/// Doubles wired into an [`Evaluator`], with handles for assertions.
pub struct Harness {
    /// Evaluator under test.
    pub evaluator: Evaluator,
    /// Transport call log.
    pub transport: RecordingTransportHandle,
    /// Output pane.
    pub surface: RecordingSurface,
    /// Namespace parser.
    pub parser: FixedNamespaceParser,
}

impl Harness {
    /// Builds an evaluator over the supplied doubles.
    pub fn new(
        connection: RecordingConnection,
        responses: ResponseSet,
        namespace: &str,
        config: Config,
    ) -> Self {
        let transport = RecordingTransport::new(responses);
        let handle = transport.handle();
        let surface = RecordingSurface::default();
        let parser = FixedNamespaceParser::new(namespace);
        let evaluator = Evaluator::new(Collaborators {
            connection: Arc::new(connection),
            transport: Arc::new(transport),
            parser: Arc::new(parser.clone()),
            surface: Arc::new(surface.clone()),
            settings: Arc::new(config),
        });
        Self {
            evaluator,
            transport: handle,
            surface,
            parser,
        }
    }

    /// Connected harness with a single session and default settings.
    pub fn connected(session: Session, responses: ResponseSet) -> Self {
        Self::new(
            RecordingConnection::connected(vec![session]),
            responses,
            SAMPLE_NAMESPACE,
            Config::default(),
        )
    }
}
