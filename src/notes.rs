//! Per-user note persistence and plain-text export.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveTime};
use thiserror::Error;
use tracing::{debug, info};

use crate::account::{Profile, current_user};
use crate::store::{Storage, StoreError};

pub const RESTORED_STATUS: &str = "Draft restored from storage.";
pub const EMPTY_STATUS: &str = "Start writing your note…";
pub const EXPORTED_STATUS: &str = "Note downloaded.";

#[derive(Debug, Error)]
pub enum NoteError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to export note to {}: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A note as opened for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedNote {
    pub text: String,
    pub title: String,
    pub status: &'static str,
}

/// Storage key of a user's note.
pub fn note_key(email: &str) -> String {
    format!("inkwell_note_{}", email.to_lowercase())
}

/// Editor heading for `profile`.
pub fn note_title(profile: &Profile) -> String {
    if profile.name.is_empty() {
        "Your notes".to_string()
    } else {
        format!("{}'s notes", profile.name)
    }
}

/// Read `profile`'s note, empty if nothing has been saved yet.
pub fn load_note(storage: &dyn Storage, profile: &Profile) -> LoadedNote {
    let text = storage.get_item(&note_key(&profile.email)).unwrap_or_default();
    let status = if text.is_empty() {
        EMPTY_STATUS
    } else {
        RESTORED_STATUS
    };
    debug!(email = %profile.email, chars = text.chars().count(), "loaded note");
    LoadedNote {
        text,
        title: note_title(profile),
        status,
    }
}

/// Save `text` as the signed-in user's note, stamped with the local time.
///
/// Returns the status line, or `None` when nobody is signed in.
///
/// # Errors
/// Returns an error if the storage cannot be written.
pub fn save_note(storage: &mut dyn Storage, text: &str) -> Result<Option<String>, NoteError> {
    save_note_at(storage, text, Local::now().time())
}

/// [`save_note`] with an explicit timestamp for the status line.
///
/// # Errors
/// Returns an error if the storage cannot be written.
pub fn save_note_at(
    storage: &mut dyn Storage,
    text: &str,
    at: NaiveTime,
) -> Result<Option<String>, NoteError> {
    let Some(profile) = current_user(storage) else {
        return Ok(None);
    };
    storage.set_item(&note_key(&profile.email), text)?;
    info!(email = %profile.email, chars = text.chars().count(), "saved note");
    Ok(Some(format!("Saved at {}", at.format("%H:%M:%S"))))
}

/// File name of a note exported on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("inkwell-note-{}.txt", date.format("%Y-%m-%d"))
}

/// Write `text` verbatim to a dated file in `dir` and return its path.
///
/// # Errors
/// Returns an error if the directory or file cannot be written.
pub fn export_note(text: &str, dir: &Path, date: NaiveDate) -> Result<PathBuf, NoteError> {
    let path = dir.join(export_file_name(date));
    fs::create_dir_all(dir)
        .and_then(|()| fs::write(&path, text))
        .map_err(|source| NoteError::Export {
            path: path.clone(),
            source,
        })?;
    info!(path = %path.display(), "exported note");
    Ok(path)
}
