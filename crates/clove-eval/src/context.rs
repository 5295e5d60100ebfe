//! Editor state captured for a single evaluation.

use camino::{Utf8Path, Utf8PathBuf};

use crate::session::SessionKind;

/// Zero-based selection in document coordinates, end exclusive.
///
/// Characters are counted in Unicode scalar values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionRange {
    /// Line the selection starts on.
    pub start_line: u32,
    /// Character offset of the start within its line.
    pub start_char: u32,
    /// Line the selection ends on.
    pub end_line: u32,
    /// Character offset of the end within its line.
    pub end_char: u32,
}

impl SelectionRange {
    /// Builds a range from its start and end positions.
    #[must_use]
    pub const fn new(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Self {
        Self {
            start_line,
            start_char,
            end_line,
            end_char,
        }
    }

    /// Whether the range selects nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start_line == self.end_line && self.start_char == self.end_char
    }

    /// Earlier endpoint as `(line, character)`, whichever way the range was
    /// drawn.
    #[must_use]
    pub fn start(&self) -> (u32, u32) {
        self.ordered().0
    }

    /// Later endpoint as `(line, character)`.
    #[must_use]
    pub fn end(&self) -> (u32, u32) {
        self.ordered().1
    }

    fn ordered(&self) -> ((u32, u32), (u32, u32)) {
        let anchor = (self.start_line, self.start_char);
        let head = (self.end_line, self.end_char);
        if anchor <= head {
            (anchor, head)
        } else {
            (head, anchor)
        }
    }

    /// Returns the selected slice of `text`.
    ///
    /// Positions beyond the end of a line clamp to the line end and lines
    /// beyond the document clamp to the document end.
    #[must_use]
    pub fn extract<'a>(&self, text: &'a str) -> &'a str {
        let ((start_line, start_char), (end_line, end_char)) = self.ordered();
        let from = byte_offset(text, start_line, start_char);
        let to = byte_offset(text, end_line, end_char);
        text.get(from..to).unwrap_or_default()
    }
}

fn byte_offset(text: &str, line: u32, character: u32) -> usize {
    let target_line = usize::try_from(line).unwrap_or(usize::MAX);
    let target_char = usize::try_from(character).unwrap_or(usize::MAX);
    let mut line_start = 0;

    for (index, segment) in text.split_inclusive('\n').enumerate() {
        if index == target_line {
            let content = segment
                .strip_suffix('\n')
                .map_or(segment, |body| body.strip_suffix('\r').unwrap_or(body));
            let within = content
                .char_indices()
                .nth(target_char)
                .map_or(content.len(), |(offset, _)| offset);
            return line_start + within;
        }
        line_start += segment.len();
    }

    text.len()
}

/// Snapshot of the editor taken when an evaluation command fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalContext {
    full_text: String,
    selection: Option<SelectionRange>,
    file: Utf8PathBuf,
    session_kind: SessionKind,
}

impl EvalContext {
    /// Captures a whole-document evaluation.
    #[must_use]
    pub fn new(
        full_text: impl Into<String>,
        file: impl Into<Utf8PathBuf>,
        session_kind: SessionKind,
    ) -> Self {
        Self {
            full_text: full_text.into(),
            selection: None,
            file: file.into(),
            session_kind,
        }
    }

    /// Restricts the evaluation to a selection.
    #[must_use]
    pub fn with_selection(mut self, selection: SelectionRange) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Full document text.
    #[must_use]
    pub fn full_text(&self) -> &str {
        self.full_text.as_str()
    }

    /// Selection as reported by the editor, possibly empty.
    #[must_use]
    pub fn selection(&self) -> Option<SelectionRange> {
        self.selection
    }

    /// Selection when it covers at least one character.
    #[must_use]
    pub fn active_selection(&self) -> Option<SelectionRange> {
        self.selection.filter(|range| !range.is_empty())
    }

    /// Text of the active selection.
    #[must_use]
    pub fn selected_text(&self) -> Option<&str> {
        self.active_selection()
            .map(|range| range.extract(self.full_text.as_str()))
    }

    /// Path of the document being evaluated.
    #[must_use]
    pub fn file(&self) -> &Utf8Path {
        self.file.as_path()
    }

    /// Session kind the editor associates with the document.
    #[must_use]
    pub fn session_kind(&self) -> SessionKind {
        self.session_kind
    }
}
