//! CSV export of unexported vocabulary entries.
//!
//! # Responsibility
//! - Serialize every entry with `exported == false` into one CSV document
//!   whose optional columns follow the enabled save settings.
//! - Hand the document to a caller-supplied delivery step.
//! - Mark the exported entries and append one history record.
//!
//! # Invariants
//! - With no unexported entry nothing is delivered and nothing is written.
//! - Delivery, flag updates and the history append share one storage
//!   transform: a failed delivery leaves storage untouched.

use crate::model::history::ExportHistoryEntry;
use crate::model::saved_word::SavedWordEntry;
use crate::model::settings::{SaveSettings, SettingField};
use crate::repo::storage::{StorageError, EXPORT_HISTORY, SAVED_WORDS, SAVE_SETTINGS};
use crate::repo::word_store::WordStore;
use crate::service::csv::format_document;
use chrono::{DateTime, Local, TimeZone};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

/// Columns present in every export, before the optional ones.
pub const BASE_COLUMNS: [&str; 4] = ["Word", "Title", "TOPIK", "Definition"];

#[derive(Debug)]
pub enum ExportError {
    /// Every saved entry has already been exported.
    NothingToExport,
    Storage(StorageError),
    /// The delivery step failed; no entry was marked.
    Delivery(io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NothingToExport => write!(f, "no new words to export"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Delivery(err) => write!(f, "failed to deliver export file: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NothingToExport => None,
            Self::Storage(err) => Some(err),
            Self::Delivery(err) => Some(err),
        }
    }
}

impl From<StorageError> for ExportError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Generated export document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
    pub count: usize,
}

/// `korean_words_YYYYMMDD_HHMMSS.csv` for the given instant.
pub fn export_filename<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("korean_words_%Y%m%d_%H%M%S.csv").to_string()
}

/// Enabled optional columns, in settings order.
pub fn export_columns(settings: &SaveSettings) -> Vec<SettingField> {
    SettingField::ALL
        .into_iter()
        .filter(|field| field.is_entry_field() && settings.get(*field))
        .collect()
}

pub fn header_row(columns: &[SettingField]) -> Vec<String> {
    BASE_COLUMNS
        .iter()
        .map(|name| name.to_string())
        .chain(columns.iter().map(|field| field.label().to_string()))
        .collect()
}

pub fn entry_row(entry: &SavedWordEntry, columns: &[SettingField]) -> Vec<String> {
    let mut row = vec![
        entry.word.clone(),
        entry.title.clone(),
        entry.topik.clone(),
        entry.definition.clone(),
    ];
    row.extend(columns.iter().map(|field| entry_value(entry, *field)));
    row
}

fn entry_value(entry: &SavedWordEntry, field: SettingField) -> String {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    match field {
        SettingField::Importance => text(&entry.importance),
        SettingField::Hanja => text(&entry.hanja),
        SettingField::Pronunciation => text(&entry.pronunciation),
        SettingField::PartOfSpeech => text(&entry.part_of_speech),
        SettingField::Meanings => text(&entry.meanings),
        SettingField::HanjaMeanings => entry
            .hanja_meanings
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|item| format!("{}: {}", item.character, item.meaning))
            .collect::<Vec<_>>()
            .join("; "),
        SettingField::ShowAutomatically => String::new(),
    }
}

/// Builds the CSV document for `entries`, header first.
pub fn render_export(entries: &[&SavedWordEntry], settings: &SaveSettings) -> String {
    let columns = export_columns(settings);
    let mut rows = Vec::with_capacity(entries.len() + 1);
    rows.push(header_row(&columns));
    rows.extend(entries.iter().map(|entry| entry_row(entry, &columns)));
    format_document(&rows)
}

/// Options-page export action.
#[derive(Clone)]
pub struct ExportController {
    words: WordStore,
}

impl ExportController {
    pub fn new(words: WordStore) -> Self {
        Self { words }
    }

    /// Entries that the next export would include.
    pub fn pending(&self) -> Result<Vec<SavedWordEntry>, ExportError> {
        Ok(self
            .words
            .saved_words()?
            .into_iter()
            .filter(|entry| !entry.exported)
            .collect())
    }

    /// Exports every unexported entry through `deliver`.
    ///
    /// `deliver` runs inside the storage transaction, with the store locked:
    /// every other storage call blocks until it returns, and calling back into
    /// the same [`WordStore`] or storage from `deliver` deadlocks. Keep it to
    /// writing `file` out.
    pub fn export<F>(&self, deliver: F) -> Result<ExportHistoryEntry, ExportError>
    where
        F: FnOnce(&ExportFile) -> io::Result<()>,
    {
        self.export_at(&Local::now(), deliver)
    }

    /// Exports as of `now`, which names the file and stamps the history.
    ///
    /// Same locking rules for `deliver` as [`ExportController::export`].
    pub fn export_at<Tz, F>(
        &self,
        now: &DateTime<Tz>,
        deliver: F,
    ) -> Result<ExportHistoryEntry, ExportError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
        F: FnOnce(&ExportFile) -> io::Result<()>,
    {
        let result = self.words.storage().transform(|txn| {
            let mut words = txn.get(&SAVED_WORDS)?;
            let settings = txn.get(&SAVE_SETTINGS)?;
            let pending: Vec<&SavedWordEntry> =
                words.iter().filter(|entry| !entry.exported).collect();
            if pending.is_empty() {
                return Err(ExportError::NothingToExport);
            }

            let file = ExportFile {
                filename: export_filename(now),
                contents: render_export(&pending, &settings),
                count: pending.len(),
            };
            deliver(&file).map_err(ExportError::Delivery)?;

            for entry in words.iter_mut().filter(|entry| !entry.exported) {
                entry.exported = true;
            }
            txn.set(&SAVED_WORDS, &words)?;

            let record = ExportHistoryEntry {
                filename: file.filename,
                timestamp: now.to_rfc3339(),
                count: file.count,
            };
            let mut history = txn.get(&EXPORT_HISTORY)?;
            history.push(record.clone());
            txn.set(&EXPORT_HISTORY, &history)?;
            Ok(record)
        });

        match &result {
            Ok(record) => info!(
                "event=export module=export status=ok count={} file={}",
                record.count, record.filename
            ),
            Err(ExportError::NothingToExport) => {
                info!("event=export module=export status=empty")
            }
            Err(err) => warn!("event=export module=export status=error error={err}"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::{entry_row, export_columns, export_filename, header_row};
    use crate::model::saved_word::{HanjaMeaning, SavedWordEntry};
    use crate::model::settings::{SaveSettings, SettingField};
    use chrono::{TimeZone, Utc};

    #[test]
    fn filename_uses_compact_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(export_filename(&now), "korean_words_20240309_070501.csv");
    }

    #[test]
    fn header_follows_enabled_settings() {
        let settings = SaveSettings::default()
            .with(SettingField::Hanja, false)
            .with(SettingField::HanjaMeanings, true)
            .with(SettingField::ShowAutomatically, true);
        let header = header_row(&export_columns(&settings));
        assert_eq!(
            header,
            vec![
                "Word",
                "Title",
                "TOPIK",
                "Definition",
                "Importance",
                "Pronunciation",
                "Part of Speech",
                "Meanings",
                "Hanja Meanings",
            ]
        );
    }

    #[test]
    fn hanja_meanings_are_joined() {
        let mut entry = SavedWordEntry::new("학교", "school", "1", "school");
        entry.hanja_meanings = Some(vec![
            HanjaMeaning::new("學", "learn"),
            HanjaMeaning::new("校", "school"),
        ]);
        let row = entry_row(&entry, &[SettingField::Importance, SettingField::HanjaMeanings]);
        assert_eq!(row[4], "");
        assert_eq!(row[5], "學: learn; 校: school");
    }
}
