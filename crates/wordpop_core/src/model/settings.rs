//! Save/display settings and their toggle identifiers.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Flat record of boolean toggles stored under `saveSettings`.
///
/// Any toggle change rewrites the whole record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveSettings {
    pub importance: bool,
    pub hanja: bool,
    pub pronunciation: bool,
    pub part_of_speech: bool,
    pub meanings: bool,
    pub hanja_meanings: bool,
    pub show_automatically: bool,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            importance: true,
            hanja: true,
            pronunciation: true,
            part_of_speech: true,
            meanings: true,
            hanja_meanings: false,
            show_automatically: false,
        }
    }
}

impl SaveSettings {
    pub fn get(&self, field: SettingField) -> bool {
        match field {
            SettingField::Importance => self.importance,
            SettingField::Hanja => self.hanja,
            SettingField::Pronunciation => self.pronunciation,
            SettingField::PartOfSpeech => self.part_of_speech,
            SettingField::Meanings => self.meanings,
            SettingField::HanjaMeanings => self.hanja_meanings,
            SettingField::ShowAutomatically => self.show_automatically,
        }
    }

    /// Returns a copy with one toggle replaced.
    pub fn with(mut self, field: SettingField, enabled: bool) -> Self {
        let slot = match field {
            SettingField::Importance => &mut self.importance,
            SettingField::Hanja => &mut self.hanja,
            SettingField::Pronunciation => &mut self.pronunciation,
            SettingField::PartOfSpeech => &mut self.part_of_speech,
            SettingField::Meanings => &mut self.meanings,
            SettingField::HanjaMeanings => &mut self.hanja_meanings,
            SettingField::ShowAutomatically => &mut self.show_automatically,
        };
        *slot = enabled;
        self
    }
}

/// Identifier of one toggle in `SaveSettings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingField {
    Importance,
    Hanja,
    Pronunciation,
    PartOfSpeech,
    Meanings,
    HanjaMeanings,
    ShowAutomatically,
}

impl SettingField {
    pub const ALL: [SettingField; 7] = [
        Self::Importance,
        Self::Hanja,
        Self::Pronunciation,
        Self::PartOfSpeech,
        Self::Meanings,
        Self::HanjaMeanings,
        Self::ShowAutomatically,
    ];

    /// Stable key, identical to the persisted field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Importance => "importance",
            Self::Hanja => "hanja",
            Self::Pronunciation => "pronunciation",
            Self::PartOfSpeech => "partOfSpeech",
            Self::Meanings => "meanings",
            Self::HanjaMeanings => "hanjaMeanings",
            Self::ShowAutomatically => "showAutomatically",
        }
    }

    /// Options-page label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Importance => "Importance",
            Self::Hanja => "Hanja",
            Self::Pronunciation => "Pronunciation",
            Self::PartOfSpeech => "Part of Speech",
            Self::Meanings => "Meanings",
            Self::HanjaMeanings => "Hanja Meanings",
            Self::ShowAutomatically => "Show Automatically",
        }
    }

    /// Whether the toggle controls a saved/exported field.
    pub fn is_entry_field(self) -> bool {
        !matches!(self, Self::ShowAutomatically)
    }
}

/// Parses a setting key as stored (`partOfSpeech`) or typed on a command line
/// (`part-of-speech`).
pub fn parse_setting_field(value: &str) -> Result<SettingField, SettingFieldError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(SettingFieldError::EmptyField);
    }
    let folded: String = normalized
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();

    SettingField::ALL
        .into_iter()
        .find(|field| field.as_str().to_ascii_lowercase() == folded)
        .ok_or_else(|| SettingFieldError::UnknownField(normalized.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingFieldError {
    EmptyField,
    UnknownField(String),
}

impl Display for SettingFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField => write!(f, "setting name must not be empty"),
            Self::UnknownField(value) => write!(f, "unknown setting: {value}"),
        }
    }
}

impl Error for SettingFieldError {}
