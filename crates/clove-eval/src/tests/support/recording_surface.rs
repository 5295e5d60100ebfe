//! Editor-side doubles: output pane, toasts and namespace parser.

use std::sync::{Arc, Mutex};

use crate::collaborator::{EditorSurface, NamespaceParser, NotificationLevel};

/// Event observed by the recording surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Raw text appended to the pane.
    Append(String),
    /// Line appended to the pane.
    AppendLine(String),
    /// Pane brought into view.
    Show,
    /// Toast shown.
    Notify(NotificationLevel, String),
}

/// Output pane that records every write.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl RecordingSurface {
    fn record(&self, event: SurfaceEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }

    /// Every event, in order.
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Text of the pane as the user would see it.
    pub fn transcript(&self) -> String {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::Append(text) => Some(text),
                SurfaceEvent::AppendLine(line) => Some(format!("{line}\n")),
                SurfaceEvent::Show | SurfaceEvent::Notify(..) => None,
            })
            .collect()
    }

    /// Lines written with `append_line`, in order.
    pub fn lines(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::AppendLine(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    /// Toasts shown, in order.
    pub fn notifications(&self) -> Vec<(NotificationLevel, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::Notify(level, message) => Some((level, message)),
                _ => None,
            })
            .collect()
    }

    /// Number of times the pane was shown.
    pub fn show_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, SurfaceEvent::Show))
            .count()
    }
}

impl EditorSurface for RecordingSurface {
    fn append(&self, text: &str) {
        self.record(SurfaceEvent::Append(text.to_owned()));
    }

    fn append_line(&self, line: &str) {
        self.record(SurfaceEvent::AppendLine(line.to_owned()));
    }

    fn show(&self) {
        self.record(SurfaceEvent::Show);
    }

    fn notify(&self, level: NotificationLevel, message: &str) {
        self.record(SurfaceEvent::Notify(level, message.to_owned()));
    }
}

/// Parser reporting a fixed namespace and remembering what it was asked.
#[derive(Clone)]
pub struct FixedNamespaceParser {
    namespace: String,
    inputs: Arc<Mutex<Vec<String>>>,
}

impl FixedNamespaceParser {
    /// Parser answering `namespace` for any text.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Texts passed to `namespace_of`.
    pub fn inputs(&self) -> Vec<String> {
        self.inputs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl NamespaceParser for FixedNamespaceParser {
    fn namespace_of(&self, text: &str) -> String {
        self.inputs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(text.to_owned());
        self.namespace.clone()
    }
}
