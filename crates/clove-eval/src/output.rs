//! Ordered writes to the shared output pane.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::collaborator::{EditorSurface, NotificationLevel};

#[derive(Debug, Clone, PartialEq, Eq)]
enum OutputEntry {
    Text(String),
    Line(String),
}

/// Writes produced by one evaluation cycle, flushed as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBatch {
    entries: Vec<OutputEntry>,
}

impl OutputBatch {
    /// Queues raw text.
    pub fn append(&mut self, text: impl Into<String>) {
        self.entries.push(OutputEntry::Text(text.into()));
    }

    /// Queues a line.
    pub fn append_line(&mut self, line: impl Into<String>) {
        self.entries.push(OutputEntry::Line(line.into()));
    }

    /// Whether nothing has been queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serialised access to the editor's output pane.
///
/// Concurrent cycles share one channel; each flush holds the lock for the
/// whole batch so blocks from different cycles never interleave.
#[derive(Clone)]
pub struct OutputChannel {
    surface: Arc<dyn EditorSurface>,
    write_lock: Arc<Mutex<()>>,
}

impl OutputChannel {
    /// Wraps the editor surface.
    #[must_use]
    pub fn new(surface: Arc<dyn EditorSurface>) -> Self {
        Self {
            surface,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Writes `batch` in order, then shows the pane when anything was written.
    pub async fn flush(&self, batch: OutputBatch) {
        if batch.is_empty() {
            return;
        }
        self.present(batch).await;
    }

    /// Writes `batch` in order and shows the pane, even for an empty batch.
    pub async fn present(&self, batch: OutputBatch) {
        let _guard = self.write_lock.lock().await;
        for entry in batch.entries {
            match entry {
                OutputEntry::Text(text) => self.surface.append(&text),
                OutputEntry::Line(line) => self.surface.append_line(&line),
            }
        }
        self.surface.show();
    }

    /// Shows a toast. Toasts are not part of the ordered output.
    pub fn notify(&self, level: NotificationLevel, message: &str) {
        self.surface.notify(level, message);
    }
}

impl fmt::Debug for OutputChannel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("OutputChannel")
            .finish_non_exhaustive()
    }
}
