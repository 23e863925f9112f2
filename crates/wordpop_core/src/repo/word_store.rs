//! Saved-word, settings and export-history operations over the store.

use crate::model::history::ExportHistoryEntry;
use crate::model::saved_word::{EntryValidationError, SavedWordEntry};
use crate::model::settings::{SaveSettings, SettingField};
use crate::repo::storage::{
    StorageAccessor, StorageError, StorageResult, EXPORT_HISTORY, SAVED_WORDS, SAVE_SETTINGS,
};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Failure of a save request.
#[derive(Debug)]
pub enum SaveError {
    Invalid(EntryValidationError),
    /// An entry with the same `word` already exists.
    AlreadySaved(String),
    Storage(StorageError),
}

impl Display for SaveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::AlreadySaved(word) => write!(f, "word already saved: {word}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SaveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::AlreadySaved(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<EntryValidationError> for SaveError {
    fn from(value: EntryValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl From<StorageError> for SaveError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Cloneable handle for saved-word use cases.
#[derive(Clone)]
pub struct WordStore {
    storage: Arc<StorageAccessor>,
}

impl WordStore {
    pub fn new(storage: Arc<StorageAccessor>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<StorageAccessor> {
        &self.storage
    }

    /// Returns all saved entries in insertion order.
    pub fn saved_words(&self) -> StorageResult<Vec<SavedWordEntry>> {
        self.storage.get(&SAVED_WORDS)
    }

    /// Appends `entry` unless its word is already present.
    ///
    /// Existence is checked by a linear scan inside the same transform as the
    /// write, so concurrent saves of one word produce exactly one entry.
    pub fn insert_unique(&self, entry: SavedWordEntry) -> Result<(), SaveError> {
        entry.validate()?;
        self.storage.transform(|txn| {
            let mut words = txn.get(&SAVED_WORDS)?;
            if words.iter().any(|saved| saved.word == entry.word) {
                info!("event=word_save module=store status=duplicate");
                return Err(SaveError::AlreadySaved(entry.word.clone()));
            }
            words.push(entry);
            txn.set(&SAVED_WORDS, &words)?;
            info!(
                "event=word_save module=store status=ok total={}",
                words.len()
            );
            Ok(())
        })
    }

    /// Whether an entry with `word` exists.
    pub fn contains(&self, word: &str) -> StorageResult<bool> {
        Ok(self.saved_words()?.iter().any(|saved| saved.word == word))
    }

    /// Removes the entry for `word`. Returns `false` when nothing matched.
    pub fn delete(&self, word: &str) -> StorageResult<bool> {
        self.storage.transform(|txn| {
            let mut words = txn.get(&SAVED_WORDS)?;
            let before = words.len();
            words.retain(|saved| saved.word != word);
            if words.len() == before {
                return Ok(false);
            }
            txn.set(&SAVED_WORDS, &words)?;
            info!("event=word_delete module=store status=ok");
            Ok(true)
        })
    }

    pub fn settings(&self) -> StorageResult<SaveSettings> {
        self.storage.get(&SAVE_SETTINGS)
    }

    /// Overwrites the whole settings record.
    pub fn replace_settings(&self, settings: &SaveSettings) -> StorageResult<()> {
        self.storage.set(&SAVE_SETTINGS, settings)
    }

    /// Flips one toggle and writes the full record back.
    pub fn set_setting(&self, field: SettingField, enabled: bool) -> StorageResult<SaveSettings> {
        self.storage.transform(|txn| {
            let settings = txn.get(&SAVE_SETTINGS)?.with(field, enabled);
            txn.set(&SAVE_SETTINGS, &settings)?;
            info!(
                "event=settings_update module=store status=ok field={} enabled={}",
                field.as_str(),
                enabled
            );
            Ok(settings)
        })
    }

    pub fn export_history(&self) -> StorageResult<Vec<ExportHistoryEntry>> {
        self.storage.get(&EXPORT_HISTORY)
    }
}
