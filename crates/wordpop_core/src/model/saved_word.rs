//! Saved vocabulary entry.
//!
//! # Invariants
//! - `word` is non-blank and unique across the saved collection.
//! - `exported` only ever flips from `false` to `true`, during export.

use crate::model::definition::NOT_AVAILABLE;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Meaning of one Hanja character of a saved word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HanjaMeaning {
    #[serde(rename = "char")]
    pub character: String,
    pub meaning: String,
}

impl HanjaMeaning {
    pub fn new(character: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            meaning: meaning.into(),
        }
    }
}

/// One entry of the canonical `savedWords` list.
///
/// Optional fields are `None` when the matching save setting was disabled at
/// save time; they hold `N/A` when enabled but the definition had no data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedWordEntry {
    pub word: String,
    pub title: String,
    pub topik: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hanja: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meanings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hanja_meanings: Option<Vec<HanjaMeaning>>,
    #[serde(default)]
    pub exported: bool,
}

impl SavedWordEntry {
    /// Creates an unexported entry with only the required fields set.
    pub fn new(
        word: impl Into<String>,
        title: impl Into<String>,
        topik: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            title: title.into(),
            topik: topik.into(),
            definition: definition.into(),
            importance: None,
            hanja: None,
            pronunciation: None,
            part_of_speech: None,
            meanings: None,
            hanja_meanings: None,
            exported: false,
        }
    }

    /// Builds an entry from a bare `word -> translation` pair.
    ///
    /// Used by the `saveWord` message and by the legacy map migration.
    pub fn from_translation(word: impl Into<String>, translation: impl Into<String>) -> Self {
        let translation = translation.into();
        Self::new(word, translation.clone(), NOT_AVAILABLE, translation)
    }

    /// Checks entry-level invariants before persistence.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.word.trim().is_empty() {
            return Err(EntryValidationError::BlankWord);
        }
        Ok(())
    }
}

/// Entry validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    BlankWord,
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankWord => write!(f, "saved word must not be blank"),
        }
    }
}

impl Error for EntryValidationError {}
