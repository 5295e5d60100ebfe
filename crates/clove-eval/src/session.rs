//! nREPL sessions issued by the connection collaborator.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Runtime that evaluates code sent over a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// A JVM Clojure session.
    Clojure,
    /// A ClojureScript session, typically bridged through Piggieback.
    ClojureScript,
}

impl SessionKind {
    /// Returns the short identifier used by editors and file extensions.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clojure => "clj",
            Self::ClojureScript => "cljs",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Errors raised when parsing session kind identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported session kind '{0}'")]
pub struct SessionKindParseError(String);

impl SessionKindParseError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for SessionKind {
    type Err = SessionKindParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "clj" | "clojure" => Ok(Self::Clojure),
            "cljs" | "clojurescript" => Ok(Self::ClojureScript),
            other => Err(SessionKindParseError(other.to_owned())),
        }
    }
}

/// Server-side evaluation context valid for a single evaluation cycle.
///
/// The evaluator never caches sessions: each cycle asks the connection for
/// one and closes it once the responses have been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    kind: SessionKind,
}

impl Session {
    /// Wraps a session id reported by the connection.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: SessionKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Opaque session identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Runtime behind the session.
    #[must_use]
    pub fn kind(&self) -> SessionKind {
        self.kind
    }
}
