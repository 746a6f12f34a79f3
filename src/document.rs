//! Editable documents that transcriptions are written into
//!
//! The host decides which document (if any) has focus. The session asks for
//! it fresh on every inbound transcription and never keeps the reference.

use std::ops::Range;

/// An editable text surface
pub trait DocumentSink {
    /// Replace the current selection with `text`, or insert it at the caret
    /// if nothing is selected. The caret ends up after the inserted text.
    fn replace_selection(&mut self, text: &str);
}

/// Host view of which document currently has focus
pub trait Workspace {
    fn active_document(&mut self) -> Option<&mut dyn DocumentSink>;
}

/// In-memory document with a single selection
///
/// Offsets are byte offsets into `text`, always on char boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    selection: Range<usize>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with the caret at the end
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            selection: end..end,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn selected_text(&self) -> &str {
        &self.text[self.selection.clone()]
    }

    /// Caret position (end of the selection)
    pub fn cursor(&self) -> usize {
        self.selection.end
    }

    /// Select `range`, clamped to the buffer and snapped back to char boundaries
    pub fn select(&mut self, range: Range<usize>) {
        let start = self.floor_boundary(range.start.min(range.end));
        let end = self.floor_boundary(range.start.max(range.end));
        self.selection = start..end;
    }

    /// Move the caret, clearing any selection
    pub fn set_cursor(&mut self, offset: usize) {
        self.select(offset..offset);
    }

    fn floor_boundary(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

impl DocumentSink for TextBuffer {
    fn replace_selection(&mut self, text: &str) {
        let start = self.selection.start;
        self.text.replace_range(self.selection.clone(), text);
        let caret = start + text.len();
        self.selection = caret..caret;
    }
}

/// Workspace with one buffer that can gain or lose focus
#[derive(Debug, Clone, Default)]
pub struct SingleDocumentWorkspace {
    document: TextBuffer,
    focused: bool,
}

impl SingleDocumentWorkspace {
    /// Focused workspace around `document`
    pub fn new(document: TextBuffer) -> Self {
        Self {
            document,
            focused: true,
        }
    }

    /// Workspace with nothing focused
    pub fn unfocused() -> Self {
        Self::default()
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn document(&self) -> &TextBuffer {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut TextBuffer {
        &mut self.document
    }
}

impl Workspace for SingleDocumentWorkspace {
    fn active_document(&mut self) -> Option<&mut dyn DocumentSink> {
        if self.focused {
            Some(&mut self.document)
        } else {
            None
        }
    }
}
