//! Construction of the code sent to the server.

use crate::collaborator::NamespaceParser;
use crate::context::EvalContext;
use crate::errors::EvalOperation;
use crate::session::SessionKind;

/// Code sent to the server for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalPayload {
    text: String,
    from_selection: bool,
}

impl EvalPayload {
    /// Builds the payload for an evaluation command.
    ///
    /// A selection is prefixed with an `ns` form naming the document's
    /// namespace so its forms evaluate where they were written; otherwise the
    /// whole document is sent verbatim.
    #[must_use]
    pub fn build(context: &EvalContext, parser: &dyn NamespaceParser) -> Self {
        match context.selected_text() {
            Some(selected) => {
                let namespace = parser.namespace_of(context.full_text());
                Self {
                    text: format!("(ns {namespace})\n{selected}"),
                    from_selection: true,
                }
            }
            None => Self {
                text: context.full_text().to_owned(),
                from_selection: false,
            },
        }
    }

    /// Builds the `require ... :reload` form for a namespace.
    #[must_use]
    pub fn reload(namespace: &str) -> Self {
        Self {
            text: format!("(require '{namespace} :reload)"),
            from_selection: false,
        }
    }

    /// Code to evaluate.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Whether the payload wraps a selection.
    #[must_use]
    pub fn is_selection(&self) -> bool {
        self.from_selection
    }
}

/// Transport operation used to send a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchRoute {
    /// `eval` with raw text.
    Text,
    /// `load-file` with the text and the document path.
    File,
}

impl DispatchRoute {
    /// Chooses the operation for a payload and the session it runs in.
    ///
    /// Piggieback's `load-file` ignores the transmitted text and reloads the
    /// file from disk, so a ClojureScript selection must go through `eval`.
    #[must_use]
    pub fn choose(payload: &EvalPayload, kind: SessionKind) -> Self {
        if payload.is_selection() && kind == SessionKind::ClojureScript {
            Self::Text
        } else {
            Self::File
        }
    }

    /// Operation label used in errors and traces.
    #[must_use]
    pub fn operation(self) -> EvalOperation {
        match self {
            Self::Text => EvalOperation::Evaluate,
            Self::File => EvalOperation::EvaluateFile,
        }
    }
}
