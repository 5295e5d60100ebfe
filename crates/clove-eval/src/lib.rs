//! nREPL evaluation core for Clojure editor integrations.
//!
//! The crate turns editor state into nREPL evaluation requests and renders
//! what the server sends back. It builds the payload for a document or a
//! selection, picks the right nREPL operation for the session, renders
//! output and values in arrival order, and on exceptions fetches the
//! stacktrace and maps its position back onto the document. The editor,
//! connection manager, wire transport and namespace parser stay behind the
//! traits in [`collaborator`] so hosts and tests can inject their own.

#![deny(missing_docs)]

pub mod collaborator;
mod context;
mod errors;
mod evaluator;
mod interpreter;
mod output;
mod payload;
mod response;
mod session;
mod settings;
pub mod telemetry;

pub use collaborator::{
    CollaboratorError, Connection, EditorSurface, NamespaceParser, NotificationLevel, Transport,
};
pub use context::{EvalContext, SelectionRange};
pub use errors::{EvalError, EvalOperation};
pub use evaluator::{
    CONNECT_TO_EVALUATE_MESSAGE, CONNECT_TO_RELOAD_MESSAGE, Collaborators, EvalOutcome, Evaluator,
};
pub use interpreter::{
    COMPILATION_ERROR_MESSAGE, COMPILATION_SUCCESS_MESSAGE, ErrorPosition, ResponseInterpreter,
    render_stacktrace,
};
pub use output::{OutputBatch, OutputChannel};
pub use payload::{DispatchRoute, EvalPayload};
pub use response::{ExceptionMarker, ResponseObject, StacktraceFrame, StacktraceInfo, TOOLING_FLAG};
pub use session::{Session, SessionKind, SessionKindParseError};
pub use settings::EvalSettings;
