mod common;

use common::{fixture, fixture_with, FakeDictionary, FakeModel, Fixture, Prompt};
use std::sync::Arc;
use wordpop_core::popup::{PanelContent, PanelState, Rect, Viewport};
use wordpop_core::{
    BackgroundHost, HanjaMeaning, MessageChannel, PopupController, SaveFeedback, SettingField,
    Tab, Trigger,
};

fn controller(fx: &Fixture) -> PopupController {
    let channel: Arc<dyn MessageChannel> = Arc::new(fx.router.clone());
    PopupController::new(channel, fx.translator.clone(), fx.words.clone(), "de")
}

#[test]
fn opening_translates_phrase_and_loads_first_definition() {
    let fx = fixture();
    let mut popup = controller(&fx);

    assert!(popup.show(Trigger::ContextMenu, " 학교  사랑 ", None));

    let session = popup.session().unwrap();
    assert_eq!(session.words(), ["학교", "사랑"]);
    assert_eq!(session.last_translation(), "T:학교  사랑");
    let view = popup.render().unwrap();
    assert_eq!(view.word, "학교");
    assert_eq!(
        view.body,
        vec![
            "Title: 학교",
            "TOPIK Level: 1",
            "Importance: ★★★",
            "Hanja: 學 校",
            "English Definition: school",
            "Pronunciation: [학꾜]",
            "Part of Speech: 명사",
            "Meanings: A place where students learn.",
        ]
    );
    assert_eq!(fx.model.count(Prompt::Translate), 1);
}

#[test]
fn blank_selection_opens_nothing() {
    let fx = fixture();
    let mut popup = controller(&fx);

    assert!(!popup.show(Trigger::Shortcut, "  \n ", None));
    assert!(!popup.is_open());
    assert!(fx.dictionary.lookups.lock().is_empty());
}

#[test]
fn navigation_stays_in_bounds() {
    let fx = fixture();
    let mut popup = controller(&fx);
    popup.show(Trigger::ContextMenu, "학교 사랑 빈", None);

    let nav = popup.render().unwrap().navigation.unwrap();
    assert_eq!(nav.position, "1 / 3");
    assert!(!nav.prev_enabled);
    assert!(nav.next_enabled);

    assert!(!popup.prev_word());
    assert!(popup.next_word());
    assert!(popup.next_word());
    assert!(!popup.next_word());
    assert!(!popup.select_word(3));
    assert_eq!(popup.session().unwrap().current_index(), 2);

    let nav = popup.render().unwrap().navigation.unwrap();
    assert!(nav.prev_enabled);
    assert!(!nav.next_enabled);

    assert!(popup.select_word(0));
    assert_eq!(popup.render().unwrap().word, "학교");
}

#[test]
fn empty_definition_renders_fallbacks_and_failure_renders_error() {
    let fx = fixture();
    let mut popup = controller(&fx);
    popup.show(Trigger::ContextMenu, "빈 없는말", None);

    let body = popup.render().unwrap().body;
    assert_eq!(body[0], "Title: 빈");
    assert!(body[1..7].iter().all(|line| line.ends_with(": N/A")));
    assert_eq!(body[7], "Meanings: No definition available.");

    popup.next_word();
    assert_eq!(
        popup.render().unwrap().body,
        vec!["Error loading definition: API error 404: not found"]
    );
}

#[test]
fn translation_tab_shows_last_translation_and_follows_navigation() {
    let fx = fixture();
    let mut popup = controller(&fx);
    popup.show(Trigger::ContextMenu, "학교 사랑", None);

    popup.select_tab(Tab::Translation);
    assert_eq!(popup.render().unwrap().body, vec!["T:학교 사랑"]);
    assert_eq!(fx.model.count(Prompt::Translate), 1);

    popup.next_word();
    assert_eq!(popup.render().unwrap().body, vec!["T:사랑"]);
    assert_eq!(popup.session().unwrap().last_translation(), "T:사랑");
}

#[test]
fn examples_tab_renders_generated_lines() {
    let fx = fixture();
    let mut popup = controller(&fx);
    popup.show(Trigger::ContextMenu, "사랑", None);

    popup.select_tab(Tab::Examples);

    assert_eq!(
        popup.render().unwrap().body,
        vec!["Easy: 사랑 1", "", "Medium: 사랑 2", "Hard: 사랑 3"]
    );
}

#[test]
fn hanja_meanings_are_cached_per_word() {
    let fx = fixture();
    let mut popup = controller(&fx);
    popup.show(Trigger::ContextMenu, "학교 사랑", None);

    popup.select_tab(Tab::Hanjas);
    assert_eq!(
        popup.render().unwrap().body,
        vec!["Hanja / 한자:", "學 = M:學", "校 = M:校"]
    );
    assert_eq!(fx.model.count(Prompt::HanjaMeaning), 2);

    popup.select_tab(Tab::Definition);
    popup.select_tab(Tab::Hanjas);
    assert_eq!(fx.model.count(Prompt::HanjaMeaning), 2);

    popup.next_word();
    assert_eq!(popup.render().unwrap().body, vec!["No Hanja available."]);
}

#[test]
fn hanja_tab_without_valid_characters() {
    let fx = fixture_with(
        FakeDictionary::default().with(
            "가",
            wordpop_core::DefinitionRecord {
                hanja: Some("(없음)".to_string()),
                ..Default::default()
            },
        ),
        FakeModel::default(),
    );
    let mut popup = controller(&fx);
    popup.show(Trigger::ContextMenu, "가", None);

    popup.select_tab(Tab::Hanjas);

    assert_eq!(
        popup.session().unwrap().panel(Tab::Hanjas),
        &PanelState::Ready(PanelContent::NoHanja("No valid Hanja characters found."))
    );
}

#[test]
fn save_reports_saved_then_already_saved() {
    let fx = fixture();
    let mut popup = controller(&fx);
    popup.show(Trigger::ContextMenu, "학교", None);

    assert_eq!(popup.save(), Some(SaveFeedback::Saved));
    let view = popup.render().unwrap();
    assert!(!view.save_enabled);
    assert_eq!(view.notification.unwrap().text, "Saved!");
    assert_eq!(popup.save(), None);

    let mut second = controller(&fx);
    second.show(Trigger::Shortcut, "학교", None);
    assert_eq!(second.save(), Some(SaveFeedback::AlreadySaved));
    assert!(!second.render().unwrap().save_enabled);

    let saved = fx.words.saved_words().unwrap();
    assert_eq!(saved.len(), 1);
    let entry = &saved[0];
    assert_eq!(entry.title, "school");
    assert_eq!(entry.definition, "school");
    assert_eq!(entry.topik, "1");
    assert_eq!(entry.hanja.as_deref(), Some("學校"));
    assert!(entry.hanja_meanings.is_none());
    assert!(!entry.exported);
}

#[test]
fn save_applies_settings_and_fetches_hanja_meanings() {
    let fx = fixture();
    fx.words.set_setting(SettingField::HanjaMeanings, true).unwrap();
    fx.words.set_setting(SettingField::Pronunciation, false).unwrap();
    let mut popup = controller(&fx);
    popup.show(Trigger::ContextMenu, "학교", None);

    assert_eq!(popup.save(), Some(SaveFeedback::Saved));

    let entry = fx.words.saved_words().unwrap().remove(0);
    assert!(entry.pronunciation.is_none());
    assert_eq!(
        entry.hanja_meanings,
        Some(vec![
            HanjaMeaning::new("學", "M:學"),
            HanjaMeaning::new("校", "M:校"),
        ])
    );
}

#[test]
fn save_of_unknown_word_stores_fallbacks() {
    let fx = fixture();
    let mut popup = controller(&fx);
    popup.show(Trigger::ContextMenu, "없는말", None);

    assert_eq!(popup.save(), Some(SaveFeedback::Saved));

    let entry = fx.words.saved_words().unwrap().remove(0);
    assert_eq!(entry.word, "없는말");
    assert_eq!(entry.topik, "N/A");
    assert_eq!(entry.importance.as_deref(), Some("N/A"));
    assert_eq!(entry.meanings.as_deref(), Some("No definition available."));
}

#[test]
fn automatic_trigger_requires_setting() {
    let fx = fixture();
    let mut popup = controller(&fx);

    assert!(!popup.show(Trigger::Automatic, "사랑", None));
    assert!(!popup.is_open());

    fx.words
        .set_setting(SettingField::ShowAutomatically, true)
        .unwrap();
    assert!(popup.show(Trigger::Automatic, "사랑", None));
}

#[test]
fn new_popup_replaces_the_open_one() {
    let fx = fixture();
    let mut popup = controller(&fx);
    popup.show(Trigger::ContextMenu, "학교 사랑", None);
    popup.next_word();

    let anchor = Rect {
        left: 100.0,
        top: 400.0,
        right: 160.0,
        bottom: 420.0,
    };
    let viewport = Viewport {
        width: 1280.0,
        scroll_x: 0.0,
        scroll_y: 0.0,
    };
    popup.show(Trigger::Shortcut, "빈", Some((anchor, viewport)));

    let session = popup.session().unwrap();
    assert_eq!(session.words(), ["빈"]);
    assert_eq!(session.current_index(), 0);
    let placement = session.placement().unwrap();
    assert_eq!(placement.top, 400.0 - 180.0 - 24.0);

    popup.close();
    assert!(popup.render().is_none());
}

#[test]
fn translation_outage_shows_placeholders() {
    let fx = fixture_with(
        FakeDictionary::default().with("사랑", common::love()),
        FakeModel::offline(),
    );
    let mut popup = controller(&fx);
    popup.show(Trigger::ContextMenu, "사랑", None);

    assert_eq!(popup.session().unwrap().last_translation(), "Translation error");
    popup.select_tab(Tab::Examples);
    assert_eq!(popup.render().unwrap().body, vec!["Error loading examples"]);
    assert!(popup.render().unwrap().notification.is_some());
}

#[test]
fn popup_works_through_background_host() {
    let fx = fixture();
    let channel: Arc<dyn MessageChannel> = Arc::new(BackgroundHost::spawn(fx.router.clone()));
    let mut popup = PopupController::new(channel, fx.translator.clone(), fx.words.clone(), "de");

    popup.show(Trigger::ContextMenu, "사랑", None);
    assert_eq!(popup.render().unwrap().body[0], "Title: 사랑");
    assert_eq!(popup.save(), Some(SaveFeedback::Saved));
    assert!(fx.words.contains("사랑").unwrap());
}
