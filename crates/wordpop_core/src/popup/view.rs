//! Rendering of a [`PopupSession`] into display lines, one function per tab.

use crate::model::saved_word::HanjaMeaning;
use crate::popup::placement::Placement;
use crate::popup::session::{DefinitionView, Notification, PanelContent, PanelState, PopupSession};
use crate::popup::Tab;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordOption {
    pub index: usize,
    pub word: String,
    pub selected: bool,
}

/// Prev/next controls. Only present for phrases with more than one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationView {
    pub position: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub options: Vec<WordOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabButton {
    pub tab: Tab,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    pub word: String,
    pub navigation: Option<NavigationView>,
    pub tabs: Vec<TabButton>,
    pub body: Vec<String>,
    pub save_enabled: bool,
    pub notification: Option<Notification>,
    pub placement: Option<Placement>,
}

pub fn render(session: &PopupSession) -> PopupView {
    let navigation = (session.word_count() > 1).then(|| NavigationView {
        position: format!("{} / {}", session.current_index() + 1, session.word_count()),
        prev_enabled: session.can_go_prev(),
        next_enabled: session.can_go_next(),
        options: session
            .words()
            .iter()
            .enumerate()
            .map(|(index, word)| WordOption {
                index,
                word: word.clone(),
                selected: index == session.current_index(),
            })
            .collect(),
    });

    let tabs = Tab::ALL
        .into_iter()
        .map(|tab| TabButton {
            tab,
            label: tab.label(),
            active: tab == session.active_tab(),
        })
        .collect();

    PopupView {
        word: session.current_word().to_string(),
        navigation,
        tabs,
        body: render_panel(session.panel(session.active_tab())),
        save_enabled: session.save_enabled(),
        notification: session.notification().cloned(),
        placement: session.placement(),
    }
}

pub fn render_panel(state: &PanelState) -> Vec<String> {
    match state {
        PanelState::Placeholder(text) | PanelState::Loading(text) => vec![(*text).to_string()],
        PanelState::Failed(text) => vec![text.clone()],
        PanelState::Ready(content) => match content {
            PanelContent::Definition(view) => render_definition(view),
            PanelContent::Examples(lines) => lines.clone(),
            PanelContent::Hanjas(meanings) => render_hanjas(meanings),
            PanelContent::NoHanja(text) => vec![(*text).to_string()],
            PanelContent::Text(text) => vec![text.clone()],
        },
    }
}

fn render_definition(view: &DefinitionView) -> Vec<String> {
    vec![
        format!("Title: {}", view.title),
        format!("TOPIK Level: {}", view.topik),
        format!("Importance: {}", view.importance),
        format!("Hanja: {}", view.hanja),
        format!("English Definition: {}", view.english),
        format!("Pronunciation: {}", view.pronunciation),
        format!("Part of Speech: {}", view.part_of_speech),
        format!("Meanings: {}", view.meanings),
    ]
}

fn render_hanjas(meanings: &[HanjaMeaning]) -> Vec<String> {
    let mut lines = vec!["Hanja / 한자:".to_string()];
    lines.extend(
        meanings
            .iter()
            .map(|item| format!("{} = {}", item.character, item.meaning)),
    );
    lines
}
