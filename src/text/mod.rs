//! Pure text transforms behind the editing commands.
//!
//! Nothing in here touches storage or an editing surface. Every function
//! takes the buffer by reference and returns new values, so callers decide
//! what to write back and when to persist it.
//!
//! - [`select_block`] widens a selection to the whole lines it touches.
//! - [`apply_line_transform`] maps a per-line function over that block.
//! - [`normalize_punctuation`] cleans spacing, capitalization and the
//!   terminal mark of a whole buffer.
//!
//! Offsets are counted in `char`s, matching [`ropey::Rope`] indexing.

mod block;
mod punctuation;

pub use block::{
    INDENT, LineBlock, LineEdit, Selection, apply_line_transform, indent, indent_line,
    insert_soft_tab, outdent, outdent_line, select_block, transform_block,
};
pub use punctuation::normalize_punctuation;

/// Byte offset of the `char_idx`-th char, or `text.len()` past the end.
pub(crate) fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte, _)| byte)
}
