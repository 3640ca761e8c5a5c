// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. store::StoreError)
    clippy::module_name_repetitions
)]

//! # InkWell
//!
//! A local note-taking client with one free-text note per user.
//!
//! InkWell keeps everything on the local machine:
//! - Accounts and the signed-in user
//! - One note per account
//! - Line-block indent and outdent over a selection
//! - Punctuation and capitalization cleanup
//! - Plain-text export
//!
//! ## Architecture
//!
//! The text transforms are pure functions over `&str` with no knowledge of
//! storage or of the editing surface. Everything around them is a thin
//! adapter:
//! - **Transforms**: block selection, line transforms, punctuation
//! - **Surface**: a rope buffer holding the note and its selection
//! - **Persistence**: a key-value store holding accounts and notes
//!
//! ## Modules
//!
//! - [`text`]: Block selection, line transforms, punctuation normalization
//! - [`editor`]: Rope-backed editing surface with a selection
//! - [`store`]: Local key-value storage with an in-memory fallback
//! - [`account`]: Sign-up, login and the signed-in user
//! - [`notes`]: Per-user note persistence and export
//! - [`config`]: Flag-file defaults

pub mod account;
pub mod config;
pub mod editor;
pub mod notes;
pub mod store;
pub mod text;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::account::Profile;
    pub use crate::editor::EditorBuffer;
    pub use crate::store::{Storage, open_storage};
    pub use crate::text::{Selection, normalize_punctuation};
}
