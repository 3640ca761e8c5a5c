use ropey::Rope;

use crate::text::{
    self, INDENT, Selection, indent_line, outdent_line, select_block, transform_block,
};

/// A note buffer backed by a rope, with the current selection.
///
/// Every edit goes through the line-block and punctuation transforms and
/// leaves the selection where a text area would show it afterwards.
pub struct EditorBuffer {
    rope: Rope,
    selection: Selection,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string, caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: Selection::caret(0),
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current selection.
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Move the selection, clamped to the buffer.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamped(self.rope.len_chars());
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Length of the buffer in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Indent every line the selection touches by two spaces.
    pub fn indent(&mut self) {
        self.transform_lines(indent_line);
    }

    /// Remove up to two leading spaces from every line the selection touches.
    pub fn outdent(&mut self) {
        self.transform_lines(outdent_line);
    }

    /// Replace the selection with two spaces (Tab key).
    pub fn insert_soft_tab(&mut self) {
        let Selection { start, end } = self.selection;
        self.rope.remove(start..end);
        self.rope.insert(start, INDENT);
        self.selection = Selection::caret(start + INDENT.len());
        self.dirty = true;
    }

    /// Rewrite the whole buffer in normalized punctuation.
    pub fn normalize_punctuation(&mut self) {
        let current = self.text();
        let normalized = text::normalize_punctuation(&current);
        if normalized != current {
            self.rope = Rope::from_str(&normalized);
            self.dirty = true;
        }
        self.selection = self.selection.clamped(self.rope.len_chars());
    }

    // --- Private helpers ---

    fn transform_lines(&mut self, transform: fn(&str) -> String) {
        let current = self.text();
        let block = select_block(&current, self.selection);
        let updated = transform_block(&current, block, transform);

        if self.rope.slice(block.start..block.end) != updated.as_str() {
            self.rope.remove(block.start..block.end);
            self.rope.insert(block.start, &updated);
            self.dirty = true;
        }
        self.selection = Selection::new(block.start, block.start + updated.chars().count());
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("selection", &self.selection)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.text(), "");
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = EditorBuffer::from_text("hello\nworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.text(), "hello\nworld");
    }

    #[test]
    fn test_selection_starts_at_origin() {
        let buf = EditorBuffer::from_text("hello");
        assert_eq!(buf.selection(), Selection::caret(0));
    }

    #[test]
    fn test_set_selection_clamps() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.set_selection(Selection::new(9, 2));
        assert_eq!(buf.selection(), Selection::new(2, 5));
    }

    // --- Dirty tracking ---

    #[test]
    fn test_new_buffer_is_clean() {
        let buf = EditorBuffer::from_text("hello");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_indent_marks_dirty() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.indent();
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_mark_clean_resets_dirty() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.indent();
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_outdent_without_spaces_stays_clean() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.set_selection(Selection::new(0, 11));
        buf.outdent();
        assert!(!buf.is_dirty());
        assert_eq!(buf.selection(), Selection::new(0, 11));
    }

    // --- Line block editing ---

    #[test]
    fn test_indent_caret_line() {
        let mut buf = EditorBuffer::from_text("abc\ndef");
        buf.set_selection(Selection::caret(1));
        buf.indent();
        assert_eq!(buf.text(), "  abc\ndef");
        assert_eq!(buf.selection(), Selection::new(0, 5));
    }

    #[test]
    fn test_indent_then_outdent_round_trip() {
        let mut buf = EditorBuffer::from_text("one\ntwo\nthree");
        buf.set_selection(Selection::new(5, 9));
        buf.indent();
        assert_eq!(buf.text(), "one\n  two\n  three");
        buf.outdent();
        assert_eq!(buf.text(), "one\ntwo\nthree");
        assert_eq!(buf.selection(), Selection::new(4, 13));
    }

    #[test]
    fn test_outdent_mixed_spaces() {
        let mut buf = EditorBuffer::from_text(" a\n  b");
        buf.set_selection(Selection::new(0, 6));
        buf.outdent();
        assert_eq!(buf.text(), "a\nb");
        assert_eq!(buf.selection(), Selection::new(0, 3));
    }

    #[test]
    fn test_indent_multibyte_lines() {
        let mut buf = EditorBuffer::from_text("café\nthé");
        buf.set_selection(Selection::new(2, 7));
        buf.indent();
        assert_eq!(buf.text(), "  café\n  thé");
        assert_eq!(buf.selection(), Selection::new(0, 12));
    }

    // --- Soft tab ---

    #[test]
    fn test_soft_tab_inserts_two_spaces() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.set_selection(Selection::caret(1));
        buf.insert_soft_tab();
        assert_eq!(buf.text(), "a  b");
        assert_eq!(buf.selection(), Selection::caret(3));
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_soft_tab_replaces_selection() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.set_selection(Selection::new(0, 5));
        buf.insert_soft_tab();
        assert_eq!(buf.text(), "   world");
        assert_eq!(buf.selection(), Selection::caret(2));
    }

    // --- Punctuation ---

    #[test]
    fn test_normalize_rewrites_buffer() {
        let mut buf = EditorBuffer::from_text("i am happy. i am fine");
        buf.normalize_punctuation();
        assert_eq!(buf.text(), "I am happy. I am fine.");
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_normalize_clamps_selection() {
        let mut buf = EditorBuffer::from_text("a    b    c");
        buf.set_selection(Selection::new(3, 11));
        buf.normalize_punctuation();
        assert_eq!(buf.text(), "A b c.");
        assert_eq!(buf.selection(), Selection::new(3, 6));
    }

    #[test]
    fn test_normalize_already_normal_stays_clean() {
        let mut buf = EditorBuffer::from_text("Already fine.");
        buf.normalize_punctuation();
        assert!(!buf.is_dirty());
    }
}
