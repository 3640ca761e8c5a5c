//! Editing surface for a single note.
//!
//! Wraps the pure transforms in [`crate::text`] around a rope-backed
//! buffer with a selection, the way a text area would hold them.

mod buffer;

pub use buffer::EditorBuffer;
pub use crate::text::Selection;
