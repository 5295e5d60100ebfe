//! Error types surfaced by the evaluator.

use std::fmt;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::collaborator::CollaboratorError;

/// Operation being executed when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalOperation {
    /// Raw code evaluation (`eval`).
    Evaluate,
    /// File evaluation (`load-file`).
    EvaluateFile,
    /// Stacktrace retrieval after an exception.
    Stacktrace,
    /// Namespace reload command.
    Reload,
}

impl fmt::Display for EvalOperation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Evaluate => "evaluate",
            Self::EvaluateFile => "evaluate-file",
            Self::Stacktrace => "stacktrace",
            Self::Reload => "reload",
        };
        formatter.write_str(label)
    }
}

/// Errors returned by [`crate::Evaluator`].
///
/// Exceptions raised by the evaluated code are not errors: they are rendered
/// and reported as [`crate::EvalOutcome::Failed`].
#[derive(Debug, Error)]
pub enum EvalError {
    /// No nREPL connection is live; nothing was sent.
    #[error("cannot {operation}: no nREPL connection")]
    NotConnected {
        /// Command that was refused.
        operation: EvalOperation,
    },

    /// The connection could not provide a session for the document.
    #[error("failed to resolve an nREPL session for '{file}': {source}")]
    SessionResolution {
        /// Document the session was requested for.
        file: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: CollaboratorError,
    },

    /// The stacktrace for a failed evaluation could not be fetched.
    ///
    /// The session stays open in this case.
    #[error("failed to fetch the stacktrace for session '{session}': {source}")]
    StacktraceFetch {
        /// Session the exception was raised in.
        session: String,
        /// Underlying error.
        #[source]
        source: CollaboratorError,
    },

    /// Any other transport failure.
    #[error("nREPL transport failed during {operation}: {source}")]
    Transport {
        /// Operation that failed.
        operation: EvalOperation,
        /// Underlying error.
        #[source]
        source: CollaboratorError,
    },
}

impl EvalError {
    pub(crate) fn not_connected(operation: EvalOperation) -> Self {
        Self::NotConnected { operation }
    }

    pub(crate) fn session_resolution(file: Utf8PathBuf, source: CollaboratorError) -> Self {
        Self::SessionResolution { file, source }
    }

    pub(crate) fn stacktrace_fetch(session: &str, source: CollaboratorError) -> Self {
        Self::StacktraceFetch {
            session: session.to_owned(),
            source,
        }
    }

    pub(crate) fn transport(operation: EvalOperation, source: CollaboratorError) -> Self {
        Self::Transport { operation, source }
    }
}
