use chrono::{TimeZone, Utc};
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use wordpop_core::service::csv::parse_document;
use wordpop_core::{
    ExportController, ExportError, HanjaMeaning, SavedWordEntry, SettingField,
    StorageAccessor, WordStore,
};

fn store_with(entries: Vec<SavedWordEntry>) -> WordStore {
    let store = WordStore::new(Arc::new(StorageAccessor::open_in_memory().unwrap()));
    for entry in entries {
        store.insert_unique(entry).unwrap();
    }
    store
}

fn entry(word: &str, definition: &str) -> SavedWordEntry {
    let mut entry = SavedWordEntry::new(word, definition, "1", definition);
    entry.importance = Some("★★".to_string());
    entry.hanja = Some("N/A".to_string());
    entry.pronunciation = Some(format!("[{word}]"));
    entry.part_of_speech = Some("명사".to_string());
    entry.meanings = Some(format!("{definition}, in general"));
    entry
}

#[test]
fn nothing_to_export_does_no_io() {
    let store = store_with(Vec::new());
    let controller = ExportController::new(store.clone());
    let mut delivered = false;

    let err = controller
        .export(|_| {
            delivered = true;
            Ok(())
        })
        .unwrap_err();

    assert!(matches!(err, ExportError::NothingToExport));
    assert!(!delivered);
    assert!(store.export_history().unwrap().is_empty());
}

#[test]
fn export_writes_header_plus_one_row_per_pending_entry() {
    let store = store_with(vec![
        entry("학교", "school"),
        entry("사랑", "love \"eternal\""),
        entry("줄", "line\nbreak"),
    ]);
    let controller = ExportController::new(store.clone());
    let now = Utc.with_ymd_and_hms(2024, 11, 2, 9, 30, 5).unwrap();
    let mut contents = String::new();

    let record = controller
        .export_at(&now, |file| {
            assert_eq!(file.count, 3);
            contents = file.contents.clone();
            Ok(())
        })
        .unwrap();

    assert_eq!(record.filename, "korean_words_20241102_093005.csv");
    assert_eq!(record.timestamp, "2024-11-02T09:30:05+00:00");
    assert_eq!(record.count, 3);

    let rows = parse_document(&contents).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows[0],
        [
            "Word",
            "Title",
            "TOPIK",
            "Definition",
            "Importance",
            "Hanja",
            "Pronunciation",
            "Part of Speech",
            "Meanings",
        ]
    );
    assert_eq!(rows[2][3], "love \"eternal\"");
    assert_eq!(rows[3][1], "line\nbreak");
    assert_eq!(rows[1][8], "school, in general");

    assert!(store.saved_words().unwrap().iter().all(|entry| entry.exported));
    assert_eq!(store.export_history().unwrap(), vec![record]);
}

#[test]
fn second_export_only_includes_new_entries() {
    let store = store_with(vec![entry("학교", "school")]);
    let controller = ExportController::new(store.clone());
    controller.export(|_| Ok(())).unwrap();

    assert!(matches!(
        controller.export(|_| Ok(())),
        Err(ExportError::NothingToExport)
    ));

    store.insert_unique(entry("사랑", "love")).unwrap();
    let mut words_in_file = Vec::new();
    let record = controller
        .export(|file| {
            let rows = parse_document(&file.contents).unwrap();
            words_in_file = rows[1..].iter().map(|row| row[0].clone()).collect();
            Ok(())
        })
        .unwrap();

    assert_eq!(record.count, 1);
    assert_eq!(words_in_file, ["사랑"]);
    assert_eq!(store.export_history().unwrap().len(), 2);
}

#[test]
fn columns_follow_settings_and_join_hanja_meanings() {
    let mut school = entry("학교", "school");
    school.hanja = Some("學校".to_string());
    school.hanja_meanings = Some(vec![
        HanjaMeaning::new("學", "learn"),
        HanjaMeaning::new("校", "school"),
    ]);
    let store = store_with(vec![school]);
    store.set_setting(SettingField::Meanings, false).unwrap();
    store.set_setting(SettingField::HanjaMeanings, true).unwrap();
    let controller = ExportController::new(store);

    let mut rows = Vec::new();
    controller
        .export(|file| {
            rows = parse_document(&file.contents).unwrap();
            Ok(())
        })
        .unwrap();

    assert_eq!(rows[0].last().map(String::as_str), Some("Hanja Meanings"));
    assert!(!rows[0].iter().any(|column| column == "Meanings"));
    assert_eq!(rows[1].last().map(String::as_str), Some("學: learn; 校: school"));
}

#[test]
fn failed_delivery_marks_nothing() {
    let store = store_with(vec![entry("학교", "school")]);
    let controller = ExportController::new(store.clone());

    let err = controller
        .export(|_| Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only")))
        .unwrap_err();

    assert!(matches!(err, ExportError::Delivery(_)));
    assert!(!store.saved_words().unwrap()[0].exported);
    assert!(store.export_history().unwrap().is_empty());
    assert_eq!(controller.pending().unwrap().len(), 1);
}

#[test]
fn saves_during_delivery_wait_for_the_export() {
    let store = store_with(vec![entry("학교", "school")]);
    let controller = ExportController::new(store.clone());
    let mut writer = None;

    let record = controller
        .export(|_| {
            let store = store.clone();
            let handle = thread::spawn(move || {
                store.insert_unique(entry("사랑", "love")).unwrap();
            });
            thread::sleep(Duration::from_millis(100));
            assert!(!handle.is_finished());
            writer = Some(handle);
            Ok(())
        })
        .unwrap();
    writer.unwrap().join().unwrap();

    assert_eq!(record.count, 1);
    let saved = store.saved_words().unwrap();
    assert_eq!(saved.len(), 2);
    assert!(saved[0].exported);
    assert_eq!(saved[1].word, "사랑");
    assert!(!saved[1].exported);
}
