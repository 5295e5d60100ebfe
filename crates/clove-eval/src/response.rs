//! Response objects reported by the nREPL server.

use serde::{Deserialize, Serialize};

/// Frame flag marking tooling-relevant frames in a stacktrace.
pub const TOOLING_FLAG: &str = "tooling";

/// Exception marker carried by the `ex` field.
///
/// Servers report the exception class name; some middleware only sends a
/// boolean flag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ExceptionMarker {
    /// Fully qualified exception class.
    Class(String),
    /// Bare exception flag.
    Flag(bool),
}

impl ExceptionMarker {
    /// Whether the marker signals an exception.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        match self {
            Self::Class(class) => !class.is_empty(),
            Self::Flag(flag) => *flag,
        }
    }
}

/// One server-reported event belonging to an evaluation.
///
/// Every field is independently optional and a single object may carry
/// several of them. Fields holding an empty string count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponseObject {
    /// Text written to standard output.
    pub out: Option<String>,
    /// Text written to standard error.
    pub err: Option<String>,
    /// Printed evaluation result.
    pub value: Option<String>,
    /// Exception marker.
    pub ex: Option<ExceptionMarker>,
    /// Session the event belongs to.
    pub session: Option<String>,
}

impl ResponseObject {
    /// Sets the stdout text.
    #[must_use]
    pub fn with_out(mut self, out: impl Into<String>) -> Self {
        self.out = Some(out.into());
        self
    }

    /// Sets the stderr text.
    #[must_use]
    pub fn with_err(mut self, err: impl Into<String>) -> Self {
        self.err = Some(err.into());
        self
    }

    /// Sets the printed value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Marks the response as an exception of the given class.
    #[must_use]
    pub fn with_exception(mut self, class: impl Into<String>) -> Self {
        self.ex = Some(ExceptionMarker::Class(class.into()));
        self
    }

    /// Sets the session id.
    #[must_use]
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Stdout text, if any.
    #[must_use]
    pub fn stdout(&self) -> Option<&str> {
        non_empty(self.out.as_deref())
    }

    /// Stderr text, if any.
    #[must_use]
    pub fn stderr(&self) -> Option<&str> {
        non_empty(self.err.as_deref())
    }

    /// Printed value, if any.
    #[must_use]
    pub fn printed_value(&self) -> Option<&str> {
        non_empty(self.value.as_deref())
    }

    /// Session id, if the server reported one.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        non_empty(self.session.as_deref())
    }

    /// Whether this response reports an evaluation exception.
    #[must_use]
    pub fn is_exception(&self) -> bool {
        self.ex.as_ref().is_some_and(ExceptionMarker::is_raised)
    }
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.filter(|text| !text.is_empty())
}

/// One call site in a reported exception.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StacktraceFrame {
    /// Class (or namespace) owning the frame.
    pub class: String,
    /// Method (or function) name.
    pub method: String,
    /// Source file name.
    pub file: String,
    /// 1-based source line, when known.
    pub line: Option<u32>,
    /// Classification tags such as `tooling`, `clj` or `java`.
    pub flags: Vec<String>,
}

impl StacktraceFrame {
    /// Whether the frame carries the tooling flag.
    #[must_use]
    pub fn is_tooling(&self) -> bool {
        self.flags.iter().any(|flag| flag == TOOLING_FLAG)
    }
}

/// Exception details returned by the stacktrace operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StacktraceInfo {
    /// Exception class.
    pub class: String,
    /// Exception message.
    pub message: String,
    /// File the server attributes the exception to.
    pub file: String,
    /// 1-based line relative to the evaluated payload.
    pub line: Option<u32>,
    /// 1-based column relative to the evaluated payload.
    pub column: Option<u32>,
    /// Call chain, innermost frame first.
    #[serde(rename = "stacktrace")]
    pub frames: Vec<StacktraceFrame>,
}
