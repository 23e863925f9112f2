//! Popup controller: opens sessions, fetches tab content, saves words.

use crate::client::translation::{
    example_lines, TranslationClient, EXAMPLES_ERROR, TRANSLATION_ERROR,
};
use crate::model::definition::DefinitionRecord;
use crate::model::saved_word::HanjaMeaning;
use crate::model::settings::SaveSettings;
use crate::popup::placement::{place_popup, Rect, Viewport};
use crate::popup::session::{
    DefinitionView, Notification, PanelContent, PanelState, PopupPhase, PopupSession,
};
use crate::popup::view::{render, PopupView};
use crate::popup::Tab;
use crate::repo::word_store::WordStore;
use crate::router::{MessageChannel, RouterRequest, ALREADY_SAVED};
use crate::service::save_service::{build_saved_entry, hanja_to_fetch};
use log::{info, warn};
use std::sync::Arc;

pub const SAVED: &str = "Saved!";
pub const SAVE_FAILED: &str = "Failed to save!";
pub const NO_HANJA: &str = "No Hanja available.";
pub const NO_VALID_HANJA: &str = "No valid Hanja characters found.";

/// What opened the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    ContextMenu,
    Shortcut,
    /// Selection made without an explicit command.
    Automatic,
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContextMenu => "context_menu",
            Self::Shortcut => "shortcut",
            Self::Automatic => "automatic",
        }
    }
}

/// Result of a save attempt, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveFeedback {
    Saved,
    AlreadySaved,
    Failed(String),
}

impl SaveFeedback {
    pub fn message(&self) -> &str {
        match self {
            Self::Saved => SAVED,
            Self::AlreadySaved => ALREADY_SAVED,
            Self::Failed(_) => SAVE_FAILED,
        }
    }
}

/// Services a session needs while fetching.
struct Fetcher<'a> {
    channel: &'a dyn MessageChannel,
    translator: &'a TranslationClient,
    target_language: &'a str,
}

impl Fetcher<'_> {
    fn refresh(&self, session: &mut PopupSession) {
        let tab = session.active_tab;
        session.phase = PopupPhase::Fetching(tab);
        match tab {
            Tab::Definition => {
                self.definition(session);
            }
            Tab::Examples => self.examples(session),
            Tab::Hanjas => self.hanjas(session),
            Tab::Translation => {
                let word = session.current_word().to_string();
                self.translate(session, &word);
            }
        }
        session.phase = PopupPhase::Idle;
    }

    fn translate(&self, session: &mut PopupSession, text: &str) {
        session.set_panel(Tab::Translation, PanelState::Loading(TRANSLATION_LOADING));
        match self.translator.try_translate(text, self.target_language) {
            Ok(translation) => {
                session.last_translation = translation.clone();
                session.set_panel(
                    Tab::Translation,
                    PanelState::Ready(PanelContent::Text(translation)),
                );
            }
            Err(err) => {
                warn!("event=popup_translate module=popup status=error error={err}");
                session.last_translation = TRANSLATION_ERROR.to_string();
                session.set_panel(
                    Tab::Translation,
                    PanelState::Failed(TRANSLATION_ERROR.to_string()),
                );
                session.notification = Some(Notification::error(format!(
                    "Translation service unavailable: {err}"
                )));
            }
        }
    }

    /// Fetches the definition of the current word through the router.
    fn definition(&self, session: &mut PopupSession) -> Option<DefinitionRecord> {
        let index = session.current;
        let word = session.current_word().to_string();
        session.set_panel(Tab::Definition, PanelState::Loading(DEFINITION_LOADING));

        let response = self.channel.request(RouterRequest::GetDefinition { word: word.clone() });
        if !response.success {
            let text = format!("Error loading definition: {}", response.error_text());
            session.set_panel(Tab::Definition, PanelState::Failed(text));
            return None;
        }

        let record = response.data.map(|data| data.message).unwrap_or_default();
        session.set_panel(
            Tab::Definition,
            PanelState::Ready(PanelContent::Definition(DefinitionView::from_record(
                &word, &record,
            ))),
        );
        session.definition = Some((index, record.clone()));
        Some(record)
    }

    fn current_definition(&self, session: &mut PopupSession) -> Option<DefinitionRecord> {
        if let Some(record) = session.cached_definition(session.current) {
            return Some(record.clone());
        }
        self.definition(session)
    }

    fn examples(&self, session: &mut PopupSession) {
        session.set_panel(Tab::Examples, PanelState::Loading(EXAMPLES_LOADING));
        match self.translator.try_generate_examples(session.current_word()) {
            Ok(text) => session.set_panel(
                Tab::Examples,
                PanelState::Ready(PanelContent::Examples(example_lines(&text))),
            ),
            Err(err) => {
                warn!("event=popup_examples module=popup status=error error={err}");
                session.set_panel(Tab::Examples, PanelState::Failed(EXAMPLES_ERROR.to_string()));
                session.notification =
                    Some(Notification::error("Example service unavailable"));
            }
        }
    }

    fn hanjas(&self, session: &mut PopupSession) {
        let index = session.current;
        session.set_panel(Tab::Hanjas, PanelState::Loading(HANJAS_LOADING));
        let Some(record) = self.current_definition(session) else {
            let text = match session.panel(Tab::Definition) {
                PanelState::Failed(text) => text.clone(),
                _ => "Error loading definition".to_string(),
            };
            session.set_panel(Tab::Hanjas, PanelState::Failed(text));
            return;
        };

        let Some(hanja) = record.hanja_text() else {
            session.set_panel(Tab::Hanjas, PanelState::Ready(PanelContent::NoHanja(NO_HANJA)));
            return;
        };
        let characters = crate::hanja::hanja_chars(hanja);
        if characters.is_empty() {
            session.set_panel(
                Tab::Hanjas,
                PanelState::Ready(PanelContent::NoHanja(NO_VALID_HANJA)),
            );
            return;
        }

        let meanings = self.hanja_meanings(session, index, &characters);
        session.set_panel(Tab::Hanjas, PanelState::Ready(PanelContent::Hanjas(meanings)));
    }

    /// Meanings for `characters` of word `index`, cached for the session.
    fn hanja_meanings(
        &self,
        session: &mut PopupSession,
        index: usize,
        characters: &[char],
    ) -> Vec<HanjaMeaning> {
        if let Some(cached) = session.cached_hanja_meanings(index) {
            return cached.to_vec();
        }
        let (meanings, failed) = self.translator.lookup_hanja_meanings(characters);
        if failed {
            session.notification = Some(Notification::error("Hanja meaning lookup failed"));
        } else {
            session.hanja_meanings.insert(index, meanings.clone());
        }
        meanings
    }
}

const DEFINITION_LOADING: &str = "Loading definition...";
const EXAMPLES_LOADING: &str = "Loading examples...";
const HANJAS_LOADING: &str = "Loading hanjas...";
const TRANSLATION_LOADING: &str = "Loading translation...";

/// Owns the single popup session of one page.
pub struct PopupController {
    channel: Arc<dyn MessageChannel>,
    translator: TranslationClient,
    words: WordStore,
    target_language: String,
    session: Option<PopupSession>,
}

impl PopupController {
    pub fn new(
        channel: Arc<dyn MessageChannel>,
        translator: TranslationClient,
        words: WordStore,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            translator,
            words,
            target_language: target_language.into(),
            session: None,
        }
    }

    pub fn session(&self) -> Option<&PopupSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn close(&mut self) {
        if self.session.take().is_some() {
            info!("event=popup_close module=popup status=ok");
        }
    }

    /// Opens a popup for `selected_text`, replacing any open one.
    ///
    /// Automatic triggers are ignored unless `showAutomatically` is enabled,
    /// and blank selections open nothing. Returns whether a popup opened.
    pub fn show(
        &mut self,
        trigger: Trigger,
        selected_text: &str,
        anchor: Option<(Rect, Viewport)>,
    ) -> bool {
        if trigger == Trigger::Automatic && !self.load_settings().show_automatically {
            info!("event=popup_open module=popup status=skipped trigger=automatic");
            return false;
        }

        self.close();
        let placement = anchor.map(|(rect, viewport)| place_popup(&rect, &viewport));
        let Some(mut session) = PopupSession::new(selected_text, placement) else {
            return false;
        };

        let fetcher = Fetcher {
            channel: self.channel.as_ref(),
            translator: &self.translator,
            target_language: &self.target_language,
        };
        let phrase = session.phrase.clone();
        fetcher.translate(&mut session, &phrase);
        fetcher.refresh(&mut session);

        info!(
            "event=popup_open module=popup status=ok trigger={} words={}",
            trigger.as_str(),
            session.word_count()
        );
        self.session = Some(session);
        true
    }

    /// Activates `tab`. Translation shows the last translation; every other
    /// tab is fetched again for the current word.
    pub fn select_tab(&mut self, tab: Tab) {
        let fetcher = Fetcher {
            channel: self.channel.as_ref(),
            translator: &self.translator,
            target_language: &self.target_language,
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.active_tab = tab;
        if tab == Tab::Translation {
            let text = session.last_translation.clone();
            session.set_panel(Tab::Translation, PanelState::Ready(PanelContent::Text(text)));
        } else {
            fetcher.refresh(session);
        }
    }

    pub fn next_word(&mut self) -> bool {
        match self.session.as_ref() {
            Some(session) if session.can_go_next() => {
                let index = session.current_index() + 1;
                self.select_word(index)
            }
            _ => false,
        }
    }

    pub fn prev_word(&mut self) -> bool {
        match self.session.as_ref() {
            Some(session) if session.can_go_prev() => {
                let index = session.current_index() - 1;
                self.select_word(index)
            }
            _ => false,
        }
    }

    /// Moves to word `index` and refreshes the active tab. Out-of-range
    /// indices are ignored.
    pub fn select_word(&mut self, index: usize) -> bool {
        let fetcher = Fetcher {
            channel: self.channel.as_ref(),
            translator: &self.translator,
            target_language: &self.target_language,
        };
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.move_to(index) {
            return false;
        }
        session.save_enabled = true;
        session.notification = None;
        fetcher.refresh(session);
        true
    }

    /// Saves the current word with the stored settings applied.
    ///
    /// Returns `None` when no popup is open or the save button is disabled.
    pub fn save(&mut self) -> Option<SaveFeedback> {
        let settings = self.load_settings();
        let fetcher = Fetcher {
            channel: self.channel.as_ref(),
            translator: &self.translator,
            target_language: &self.target_language,
        };
        let session = self.session.as_mut()?;
        if !session.save_enabled {
            return None;
        }

        let index = session.current;
        let word = session.current_word().to_string();
        let record = fetcher.current_definition(session).unwrap_or_default();
        let characters = hanja_to_fetch(&record, &settings);
        let meanings = (!characters.is_empty())
            .then(|| fetcher.hanja_meanings(session, index, &characters));
        let entry = build_saved_entry(&word, &record, &settings, meanings);

        let response = fetcher.channel.request(RouterRequest::SaveEntry { entry });
        let feedback = if response.success {
            SaveFeedback::Saved
        } else if response.error_text() == ALREADY_SAVED {
            SaveFeedback::AlreadySaved
        } else {
            SaveFeedback::Failed(response.error_text().to_string())
        };

        match &feedback {
            SaveFeedback::Failed(err) => {
                warn!("event=popup_save module=popup status=error error={err}");
                session.notification = Some(Notification::error(SAVE_FAILED));
            }
            other => {
                info!("event=popup_save module=popup status=ok outcome={}", other.message());
                session.notification = Some(Notification::info(other.message()));
                session.save_enabled = false;
            }
        }
        Some(feedback)
    }

    /// Clears the transient notification.
    pub fn dismiss_notification(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.notification = None;
        }
    }

    pub fn render(&self) -> Option<PopupView> {
        self.session.as_ref().map(render)
    }

    fn load_settings(&self) -> SaveSettings {
        self.words.settings().unwrap_or_else(|err| {
            warn!("event=settings_read module=popup status=error error={err}");
            SaveSettings::default()
        })
    }
}
