//! Assembly of a [`SavedWordEntry`] from a fetched definition.
//!
//! # Invariants
//! - Required fields fall back to `N/A` (`topik`) or an empty string
//!   (`title`, `definition`).
//! - A disabled setting leaves its field absent; an enabled one with no data
//!   stores `N/A` (`No definition available.` for meanings).
//! - `hanjaMeanings` is only set when enabled and at least one meaning is
//!   supplied.

use crate::model::definition::{DefinitionRecord, NOT_AVAILABLE, NO_MEANINGS};
use crate::model::saved_word::{HanjaMeaning, SavedWordEntry};
use crate::model::settings::SaveSettings;

pub fn build_saved_entry(
    word: &str,
    record: &DefinitionRecord,
    settings: &SaveSettings,
    hanja_meanings: Option<Vec<HanjaMeaning>>,
) -> SavedWordEntry {
    let english = DefinitionRecord::present(&record.endef).unwrap_or_default();
    let mut entry = SavedWordEntry::new(
        word,
        english,
        DefinitionRecord::or_not_available(&record.topik),
        english,
    );

    let optional = |enabled: bool, value: &Option<String>, fallback: &str| {
        enabled.then(|| {
            DefinitionRecord::present(value)
                .unwrap_or(fallback)
                .to_string()
        })
    };
    entry.importance = optional(settings.importance, &record.importance, NOT_AVAILABLE);
    entry.hanja = optional(settings.hanja, &record.hanja, NOT_AVAILABLE);
    entry.pronunciation = optional(settings.pronunciation, &record.pronun, NOT_AVAILABLE);
    entry.part_of_speech = optional(settings.part_of_speech, &record.part_speech, NOT_AVAILABLE);
    entry.meanings = optional(settings.meanings, &record.meanings, NO_MEANINGS);
    entry.hanja_meanings = hanja_meanings.filter(|meanings| {
        settings.hanja_meanings && !meanings.is_empty()
    });
    entry
}

/// Hanja characters whose meanings should be fetched before saving.
///
/// Empty when the setting is off or the definition carries no Hanja.
pub fn hanja_to_fetch(record: &DefinitionRecord, settings: &SaveSettings) -> Vec<char> {
    if !settings.hanja_meanings {
        return Vec::new();
    }
    record
        .hanja_text()
        .map(crate::hanja::hanja_chars)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{build_saved_entry, hanja_to_fetch};
    use crate::model::definition::DefinitionRecord;
    use crate::model::saved_word::HanjaMeaning;
    use crate::model::settings::{SaveSettings, SettingField};

    fn school() -> DefinitionRecord {
        DefinitionRecord {
            title: Some("학교".to_string()),
            topik: Some("1".to_string()),
            hanja: Some("學校".to_string()),
            endef: Some("school".to_string()),
            ..DefinitionRecord::default()
        }
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let entry = build_saved_entry("학교", &school(), &SaveSettings::default(), None);
        assert_eq!(entry.title, "school");
        assert_eq!(entry.definition, "school");
        assert_eq!(entry.topik, "1");
        assert_eq!(entry.importance.as_deref(), Some("N/A"));
        assert_eq!(entry.hanja.as_deref(), Some("學校"));
        assert_eq!(entry.meanings.as_deref(), Some("No definition available."));
        assert!(entry.hanja_meanings.is_none());
        assert!(!entry.exported);
    }

    #[test]
    fn disabled_settings_leave_fields_absent() {
        let settings = SaveSettings::default()
            .with(SettingField::Pronunciation, false)
            .with(SettingField::Meanings, false);
        let entry = build_saved_entry("학교", &school(), &settings, None);
        assert!(entry.pronunciation.is_none());
        assert!(entry.meanings.is_none());
        assert!(entry.part_of_speech.is_some());
    }

    #[test]
    fn empty_definition_has_blank_title() {
        let entry = build_saved_entry(
            "없다",
            &DefinitionRecord::default(),
            &SaveSettings::default(),
            None,
        );
        assert_eq!(entry.title, "");
        assert_eq!(entry.topik, "N/A");
    }

    #[test]
    fn hanja_meanings_follow_the_setting() {
        let meanings = vec![HanjaMeaning::new("學", "learn")];
        let off = build_saved_entry(
            "학교",
            &school(),
            &SaveSettings::default(),
            Some(meanings.clone()),
        );
        assert!(off.hanja_meanings.is_none());

        let settings = SaveSettings::default().with(SettingField::HanjaMeanings, true);
        let on = build_saved_entry("학교", &school(), &settings, Some(meanings.clone()));
        assert_eq!(on.hanja_meanings, Some(meanings));
    }

    #[test]
    fn hanja_to_fetch_requires_setting_and_characters() {
        let settings = SaveSettings::default().with(SettingField::HanjaMeanings, true);
        assert!(hanja_to_fetch(&school(), &SaveSettings::default()).is_empty());
        assert_eq!(hanja_to_fetch(&school(), &settings), vec!['學', '校']);

        let na = DefinitionRecord {
            hanja: Some("N/A".to_string()),
            ..DefinitionRecord::default()
        };
        assert!(hanja_to_fetch(&na, &settings).is_empty());
    }
}
