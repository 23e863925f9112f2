//! State of one open popup.

use crate::model::definition::{DefinitionRecord, NOT_AVAILABLE, NO_MEANINGS};
use crate::model::saved_word::HanjaMeaning;
use crate::popup::placement::Placement;
use crate::popup::Tab;
use std::collections::HashMap;

pub(crate) const DEFINITION_PLACEHOLDER: &str = "Definition content coming soon...";
pub(crate) const EXAMPLES_PLACEHOLDER: &str = "Examples content coming soon...";
pub(crate) const HANJAS_PLACEHOLDER: &str = "Loading hanjas...";
pub(crate) const TRANSLATION_PLACEHOLDER: &str = "Loading translation...";

/// Lifecycle of an open popup. A closed popup has no session at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupPhase {
    RenderingShell,
    Idle,
    Fetching(Tab),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

/// Transient message shown on top of the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
        }
    }
}

/// Definition fields as displayed, fallbacks already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionView {
    pub title: String,
    pub topik: String,
    pub importance: String,
    pub hanja: String,
    pub english: String,
    pub pronunciation: String,
    pub part_of_speech: String,
    pub meanings: String,
}

impl DefinitionView {
    pub fn from_record(word: &str, record: &DefinitionRecord) -> Self {
        let hanja = record
            .hanja_text()
            .map(crate::hanja::hanja_chars)
            .filter(|chars| !chars.is_empty())
            .map(|chars| {
                chars
                    .iter()
                    .map(char::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Self {
            title: DefinitionRecord::present(&record.title)
                .unwrap_or(word)
                .to_string(),
            topik: DefinitionRecord::or_not_available(&record.topik).to_string(),
            importance: DefinitionRecord::or_not_available(&record.importance).to_string(),
            hanja,
            english: DefinitionRecord::or_not_available(&record.endef).to_string(),
            pronunciation: DefinitionRecord::or_not_available(&record.pronun).to_string(),
            part_of_speech: DefinitionRecord::or_not_available(&record.part_speech).to_string(),
            meanings: DefinitionRecord::present(&record.meanings)
                .unwrap_or(NO_MEANINGS)
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    Definition(DefinitionView),
    Examples(Vec<String>),
    Hanjas(Vec<HanjaMeaning>),
    /// Hanja tab for a word whose definition has no usable characters.
    NoHanja(&'static str),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    Placeholder(&'static str),
    Loading(&'static str),
    Ready(PanelContent),
    Failed(String),
}

/// One popup instance. Every cache here is dropped with the session.
#[derive(Debug, Clone)]
pub struct PopupSession {
    pub(crate) phrase: String,
    pub(crate) words: Vec<String>,
    pub(crate) current: usize,
    pub(crate) active_tab: Tab,
    pub(crate) phase: PopupPhase,
    pub(crate) panels: [PanelState; 4],
    pub(crate) definition: Option<(usize, DefinitionRecord)>,
    pub(crate) hanja_meanings: HashMap<usize, Vec<HanjaMeaning>>,
    pub(crate) last_translation: String,
    pub(crate) save_enabled: bool,
    pub(crate) notification: Option<Notification>,
    pub(crate) placement: Option<Placement>,
}

impl PopupSession {
    /// Returns `None` when the phrase has no tokens.
    pub fn new(phrase: &str, placement: Option<Placement>) -> Option<Self> {
        let phrase = phrase.trim();
        let words: Vec<String> = phrase.split_whitespace().map(str::to_string).collect();
        if words.is_empty() {
            return None;
        }
        Some(Self {
            phrase: phrase.to_string(),
            words,
            current: 0,
            active_tab: Tab::Definition,
            phase: PopupPhase::RenderingShell,
            panels: [
                PanelState::Placeholder(DEFINITION_PLACEHOLDER),
                PanelState::Placeholder(EXAMPLES_PLACEHOLDER),
                PanelState::Placeholder(HANJAS_PLACEHOLDER),
                PanelState::Placeholder(TRANSLATION_PLACEHOLDER),
            ],
            definition: None,
            hanja_meanings: HashMap::new(),
            last_translation: String::new(),
            save_enabled: true,
            notification: None,
            placement,
        })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_word(&self) -> &str {
        &self.words[self.current]
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn phase(&self) -> PopupPhase {
        self.phase
    }

    pub fn panel(&self, tab: Tab) -> &PanelState {
        &self.panels[tab.slot()]
    }

    pub fn last_translation(&self) -> &str {
        &self.last_translation
    }

    pub fn save_enabled(&self) -> bool {
        self.save_enabled
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn can_go_prev(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.current + 1 < self.words.len()
    }

    /// Cached definition for `index`, if it was the last one fetched.
    pub fn cached_definition(&self, index: usize) -> Option<&DefinitionRecord> {
        self.definition
            .as_ref()
            .filter(|(cached, _)| *cached == index)
            .map(|(_, record)| record)
    }

    pub fn cached_hanja_meanings(&self, index: usize) -> Option<&[HanjaMeaning]> {
        self.hanja_meanings.get(&index).map(Vec::as_slice)
    }

    pub(crate) fn set_panel(&mut self, tab: Tab, state: PanelState) {
        self.panels[tab.slot()] = state;
    }

    /// Moves to `index`; out-of-range requests leave the session untouched.
    pub(crate) fn move_to(&mut self, index: usize) -> bool {
        if index >= self.words.len() {
            return false;
        }
        self.current = index;
        true
    }
}
